use serde::{Deserialize, Serialize};
use std::fmt;

/// A message about the compiled graph, optionally tied to one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub node_id: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(node_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            node_id: node_id.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node_id {
            Some(id) => write!(f, "[{}] {}", id, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Fatal errors and non-fatal warnings collected over one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, node_id: Option<&str>, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(node_id, message);
        tracing::warn!("[sakusen] {}", diagnostic);
        self.warnings.push(diagnostic);
    }

    pub fn error(&mut self, node_id: Option<&str>, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(node_id, message);
        tracing::error!("[sakusen] {}", diagnostic);
        self.errors.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Appends another collection, keeping order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}
