use super::definition::GraphDefinition;
use crate::error::GraphConversionError;

/// A trait for editor formats that can be converted into a sakusen `GraphDefinition`.
///
/// This is the extension point that keeps the compiler independent of any one
/// editor. Implement it on the structs your editor saves, and hand the result to
/// [`Compiler::builder`](crate::compiler::Compiler::builder).
///
/// # Example
///
/// ```rust,no_run
/// use sakusen::error::GraphConversionError;
/// use sakusen::graph::{GraphDefinition, GraphNodeDefinition, IntoGraph};
///
/// struct MyNode { id: String, op: String }
/// struct MyGraph { nodes: Vec<MyNode> }
///
/// impl IntoGraph for MyGraph {
///     fn into_graph(self) -> Result<GraphDefinition, GraphConversionError> {
///         let mut graph = GraphDefinition::new("my-graph");
///         for node in self.nodes {
///             graph = graph.node(GraphNodeDefinition::new(node.id, node.op));
///         }
///         Ok(graph)
///     }
/// }
/// ```
pub trait IntoGraph {
    /// Consumes the object and converts it into a compilable graph.
    fn into_graph(self) -> Result<GraphDefinition, GraphConversionError>;
}

impl IntoGraph for GraphDefinition {
    fn into_graph(self) -> Result<GraphDefinition, GraphConversionError> {
        Ok(self)
    }
}
