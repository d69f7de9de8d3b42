//! # Sakusen - Node Graph to Script Compiler
//!
//! **Sakusen** compiles node graphs built in a visual editor into plain script
//! source for a tick-driven unit-automation runtime. A graph mixes control-flow
//! constructs, world queries, unit actions, structure commands, memory accesses
//! and reusable tasks; the compiler threads control and data through them and
//! emits one readable program per graph.
//!
//! ## Core Workflow
//!
//! The compiler is format-agnostic. It operates on a canonical `GraphDefinition`:
//!
//! 1.  **Load Your Data**: Parse the editor's snapshot (the bundled `UiGraph`, or your own format).
//! 2.  **Convert**: Implement `IntoGraph` for your structs to translate them into a `GraphDefinition`.
//! 3.  **Compile**: Use `Compiler::builder` to configure the compiler (type mappings, custom emitters) and call `compile`.
//! 4.  **Ship**: Write `CompiledProgram::source` next to the runtime's helper modules, or save the whole program as a bincode artifact.
//!
//! Hard problems (a missing start node, dangling edges, unknown kinds, broken task
//! references) reject the graph with every error found. Everything else compiles,
//! with warnings tagged by node id.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sakusen::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let graph = GraphDefinition::new("harvester")
//!         .node(GraphNodeDefinition::new("start", "start"))
//!         .node(
//!             GraphNodeDefinition::new("harvest", "action.harvest")
//!                 .with_settings(json!({ "moveCloser": true })),
//!         )
//!         .edge(GraphEdgeDefinition::flow("start", "harvest"));
//!
//!     let program = Compiler::builder(graph).build().compile()?;
//!     for warning in &program.warnings {
//!         eprintln!("warning: {}", warning);
//!     }
//!     println!("{}", program.source);
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod graph;
pub mod ir;
pub mod prelude;
pub mod ui;
