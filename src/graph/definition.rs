use serde::{Deserialize, Serialize};

/// The complete, canonical definition of a node graph, ready for compilation.
/// This is the target structure for any editor format conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDefinition {
    /// Used as the file id of the compiled program.
    pub name: String,
    pub nodes: Vec<GraphNodeDefinition>,
    pub edges: Vec<GraphEdgeDefinition>,
}

impl GraphDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn node(mut self, node: GraphNodeDefinition) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn edge(mut self, edge: GraphEdgeDefinition) -> Self {
        self.edges.push(edge);
        self
    }
}

/// Canvas coordinates. Carried through for tooling, ignored by the compiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A single node instance in the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNodeDefinition {
    pub id: String,
    /// Node kind name, e.g. `action.harvest`, or a user name mapped to one.
    pub kind: String,
    #[serde(default)]
    pub position: Option<Position>,
    /// Free-form node settings. An `inputs` object inside holds literal input values.
    #[serde(default)]
    pub settings: serde_json::Value,
}

impl GraphNodeDefinition {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            position: None,
            settings: serde_json::Value::Null,
        }
    }

    pub fn with_settings(mut self, settings: serde_json::Value) -> Self {
        self.settings = settings;
        self
    }
}

/// A connection between two node ports.
///
/// Source ports are `flow`/`out`, `slot:<name>` or `data:<name>`; target ports are
/// `flow`/`in` or `data:<name>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdgeDefinition {
    pub source: String,
    pub source_port: String,
    pub target: String,
    pub target_port: String,
}

impl GraphEdgeDefinition {
    pub fn new(
        source: impl Into<String>,
        source_port: impl Into<String>,
        target: impl Into<String>,
        target_port: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            source_port: source_port.into(),
            target: target.into(),
            target_port: target_port.into(),
        }
    }

    /// Flow output of `source` into `target`.
    pub fn flow(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(source, "flow", target, "flow")
    }

    /// Slot `slot` of `source` starting with `target`.
    pub fn slot(source: impl Into<String>, slot: &str, target: impl Into<String>) -> Self {
        Self::new(source, format!("slot:{}", slot), target, "flow")
    }

    /// Value of `source` feeding the `input` of `target`.
    pub fn data(source: impl Into<String>, target: impl Into<String>, input: &str) -> Self {
        Self::new(source, "data:value", target, format!("data:{}", input))
    }
}
