//! Code generation: turns a validated [`FileIr`] into program text.
//!
//! The [`Walker`] traverses the node graph depth-first, handing each node to its
//! emitter. Emitters write statements into the shared [`EmissionContext`], which
//! also tracks temporaries, produced values, imports and warnings. The assembler
//! lays out the final file.

mod assembler;
pub mod context;
mod emitters;
pub mod literal;
pub mod registry;
pub mod walker;

pub use assembler::{EMPTY_BODY, ENTRY_FUNCTION};
pub use context::EmissionContext;
pub use emitters::{MOVEMENT_MODULE, POSITION_MODULE};
pub use registry::{EmitterRegistry, NodeEmitter};
pub use walker::{Continuation, Walker};

use crate::error::CompileError;
use crate::graph::CompiledProgram;
use crate::ir::FileIr;

/// Validates `file` and emits it.
///
/// Structural problems are returned as [`CompileError::Rejected`]; anything the
/// emitters can recover from ends up in [`CompiledProgram::warnings`].
pub fn emit_file(file: &FileIr, registry: &EmitterRegistry) -> Result<CompiledProgram, CompileError> {
    if let Err(errors) = file.validate() {
        return Err(CompileError::Rejected {
            errors,
            warnings: Vec::new(),
        });
    }

    tracing::info!(
        "[sakusen] emitting '{}' ({} nodes, {} tasks)",
        file.file_id,
        file.nodes.len(),
        file.task_defs.len()
    );
    let program = assembler::assemble(file, registry);
    tracing::info!(
        "[sakusen] emitted '{}' with {} warning(s)",
        file.file_id,
        program.warnings.len()
    );
    Ok(program)
}
