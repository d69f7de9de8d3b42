use crate::diagnostics::{Diagnostic, Diagnostics};
use thiserror::Error;

/// Structural problems that make a graph impossible to compile.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("The graph has no nodes")]
    EmptyGraph,

    #[error("The graph has no start node")]
    MissingEntry,

    #[error("The graph has more than one start node ('{first}' and '{second}')")]
    DuplicateEntry { first: String, second: String },

    #[error("Entry node '{entry_node_id}' is not the graph's start node")]
    EntryMismatch { entry_node_id: String },

    #[error("Node id '{node_id}' is used more than once")]
    DuplicateNodeId { node_id: String },

    #[error("Node '{node_id}' has an unregistered node kind: '{kind}'")]
    UnknownNodeKind { node_id: String, kind: String },

    #[error(
        "Node '{missing_node_id}' not found, which is required by a connection from node '{source_node_id}'"
    )]
    NodeNotFound {
        missing_node_id: String,
        source_node_id: String,
    },

    #[error("Node '{node_id}' has an invalid connection port '{port}'")]
    InvalidPort { node_id: String, port: String },

    #[error("Task definition '{node_id}' has no name")]
    MissingTaskName { node_id: String },

    #[error("Task '{name}' is defined more than once")]
    DuplicateTask { name: String },

    #[error("Node '{node_id}' calls unknown task '{task}'")]
    UnknownTask { node_id: String, task: String },
}

impl BuildError {
    /// The node the error is about, if any.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            BuildError::EmptyGraph | BuildError::MissingEntry | BuildError::DuplicateTask { .. } => {
                None
            }
            BuildError::DuplicateEntry { second, .. } => Some(second),
            BuildError::EntryMismatch { entry_node_id } => Some(entry_node_id),
            BuildError::DuplicateNodeId { node_id }
            | BuildError::UnknownNodeKind { node_id, .. }
            | BuildError::InvalidPort { node_id, .. }
            | BuildError::MissingTaskName { node_id }
            | BuildError::UnknownTask { node_id, .. } => Some(node_id),
            BuildError::NodeNotFound { source_node_id, .. } => Some(source_node_id),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.node_id(), self.to_string())
    }
}

/// Errors that prevent a compilation from producing a program.
#[derive(Error, Debug, Clone)]
pub enum CompileError {
    #[error("Failed to parse graph JSON: {0}")]
    JsonParseError(String),

    #[error("Failed to convert graph: {0}")]
    Conversion(#[from] GraphConversionError),

    #[error("Graph rejected with {} error(s); first: {}", .errors.len(), first_error(.errors))]
    Rejected {
        errors: Vec<BuildError>,
        warnings: Vec<Diagnostic>,
    },
}

fn first_error(errors: &[BuildError]) -> String {
    errors
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string())
}

impl CompileError {
    /// The error and warning lists of a failed compilation.
    pub fn diagnostics(&self) -> Diagnostics {
        match self {
            CompileError::Rejected { errors, warnings } => Diagnostics {
                errors: errors.iter().map(BuildError::to_diagnostic).collect(),
                warnings: warnings.clone(),
            },
            other => Diagnostics {
                errors: vec![Diagnostic::new(None, other.to_string())],
                warnings: Vec::new(),
            },
        }
    }
}

/// Errors that can occur when saving or loading a compiled artifact.
#[derive(Error, Debug, Clone)]
pub enum ArtifactError {
    #[error("Artifact error: {0}")]
    Generic(String),
}

/// Errors that can occur when converting a custom editor format into a `GraphDefinition`.
#[derive(Error, Debug, Clone)]
pub enum GraphConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}
