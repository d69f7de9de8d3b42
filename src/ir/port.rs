use super::Literal;
use serde::{Deserialize, Serialize};

/// Where a node input gets its value from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PortRef {
    /// The value produced by another node.
    #[serde(rename_all = "camelCase")]
    Edge { from_node_id: String, port: String },
    /// An inline constant.
    Literal { value: Literal },
}

impl PortRef {
    pub fn edge(from_node_id: impl Into<String>, port: impl Into<String>) -> Self {
        PortRef::Edge {
            from_node_id: from_node_id.into(),
            port: port.into(),
        }
    }

    pub fn literal(value: impl Into<Literal>) -> Self {
        PortRef::Literal {
            value: value.into(),
        }
    }

    pub fn source_node(&self) -> Option<&str> {
        match self {
            PortRef::Edge { from_node_id, .. } => Some(from_node_id),
            PortRef::Literal { .. } => None,
        }
    }
}
