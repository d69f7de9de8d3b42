//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the sakusen crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use sakusen::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let ui_json = std::fs::read_to_string("path/to/graph.json")?;
//! let program = Compiler::from_json(&ui_json)?.compile()?;
//! std::fs::write("main.js", &program.source)?;
//! # Ok(())
//! # }
//! ```

// Compilation
pub use crate::compiler::{Compiler, CompilerBuilder};
pub use crate::emit::{Continuation, EmissionContext, NodeEmitter, Walker};

// Graph model
pub use crate::graph::{
    CompiledProgram, GraphDefinition, GraphEdgeDefinition, GraphNodeDefinition, IntoGraph,
};
pub use crate::ir::{FileIr, Literal, NodeIr, NodeKind, PortRef};
pub use crate::ui::UiGraph;

// Diagnostics and errors
pub use crate::diagnostics::{Diagnostic, Diagnostics};
pub use crate::error::{ArtifactError, BuildError, CompileError, GraphConversionError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
