use crate::error::{CompileError, GraphConversionError};
use crate::graph::{GraphDefinition, GraphEdgeDefinition, GraphNodeDefinition, IntoGraph, Position};
use serde::{Deserialize, Serialize};

/// File id used when the snapshot carries no name.
pub const DEFAULT_GRAPH_NAME: &str = "main";

/// UI node as saved by the editor canvas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiNode {
    pub id: String,
    #[serde(rename = "type", alias = "kind")]
    pub node_type: String,
    #[serde(default)]
    pub position: Option<Position>,
    /// Node settings as edited in the property panel
    #[serde(default)]
    pub data: serde_json::Value,
}

/// UI edge connecting two node handles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiEdge {
    pub source: String,
    #[serde(default)]
    #[serde(alias = "sourceHandle")]
    pub source_handle: Option<String>,
    pub target: String,
    #[serde(default)]
    #[serde(alias = "targetHandle")]
    pub target_handle: Option<String>,
}

/// Complete editor snapshot of one graph file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiGraph {
    #[serde(default)]
    pub name: String,
    pub nodes: Vec<UiNode>,
    #[serde(default)]
    pub edges: Vec<UiEdge>,
}

impl UiGraph {
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        serde_json::from_str(json).map_err(|e| CompileError::JsonParseError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, CompileError> {
        serde_json::to_string_pretty(self).map_err(|e| CompileError::JsonParseError(e.to_string()))
    }
}

impl IntoGraph for UiGraph {
    fn into_graph(self) -> Result<GraphDefinition, GraphConversionError> {
        if let Some(node) = self.nodes.iter().find(|n| n.id.trim().is_empty()) {
            return Err(GraphConversionError::ValidationError(format!(
                "node of type '{}' has an empty id",
                node.node_type
            )));
        }
        if let Some(edge) = self
            .edges
            .iter()
            .find(|e| e.source.trim().is_empty() || e.target.trim().is_empty())
        {
            return Err(GraphConversionError::ValidationError(format!(
                "edge '{}' -> '{}' has an empty endpoint",
                edge.source, edge.target
            )));
        }

        let name = if self.name.trim().is_empty() {
            DEFAULT_GRAPH_NAME.to_string()
        } else {
            self.name
        };

        Ok(GraphDefinition {
            name,
            nodes: self
                .nodes
                .into_iter()
                .map(|node| GraphNodeDefinition {
                    id: node.id,
                    kind: node.node_type,
                    position: node.position,
                    settings: node.data,
                })
                .collect(),
            edges: self
                .edges
                .into_iter()
                .map(|edge| {
                    GraphEdgeDefinition::new(
                        edge.source,
                        edge.source_handle.unwrap_or_else(|| "flow".to_string()),
                        edge.target,
                        edge.target_handle.unwrap_or_else(|| "flow".to_string()),
                    )
                })
                .collect(),
        })
    }
}
