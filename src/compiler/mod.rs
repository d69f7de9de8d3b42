use crate::diagnostics::Diagnostic;
use crate::emit::{self, EmitterRegistry, NodeEmitter};
use crate::error::CompileError;
use crate::graph::{CompiledProgram, GraphDefinition, IntoGraph};
use crate::ir::{FileIr, NodeKind};
use crate::ui::UiGraph;
use ahash::AHashMap;

#[cfg(feature = "debug-tools")]
use std::fs;

mod builder;

use builder::IrBuilder;

pub struct Compiler {
    graph: GraphDefinition,
    type_map: AHashMap<String, String>,
    registry: EmitterRegistry,
}

pub struct CompilerBuilder {
    graph: GraphDefinition,
    type_map: AHashMap<String, String>,
    registry: EmitterRegistry,
}

impl CompilerBuilder {
    pub fn new(graph: GraphDefinition) -> Self {
        Self {
            graph,
            type_map: AHashMap::new(),
            registry: EmitterRegistry::new(),
        }
    }

    /// Treats nodes of kind `user_type_name` as the built-in `builtin_type_name`.
    /// Ignored when `builtin_type_name` is not a built-in kind.
    pub fn with_type_mapping(mut self, user_type_name: &str, builtin_type_name: &str) -> Self {
        if NodeKind::is_builtin(builtin_type_name) {
            self.type_map
                .insert(user_type_name.to_string(), builtin_type_name.to_string());
        } else {
            tracing::warn!(
                "[sakusen] ignoring type mapping '{}' -> '{}': not a built-in kind",
                user_type_name,
                builtin_type_name
            );
        }
        self
    }

    pub fn with_custom_emitter(mut self, emitter: Box<dyn NodeEmitter>) -> Self {
        self.registry.register(emitter);
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            graph: self.graph,
            type_map: self.type_map,
            registry: self.registry,
        }
    }
}

impl Compiler {
    pub fn builder(graph: GraphDefinition) -> CompilerBuilder {
        CompilerBuilder::new(graph)
    }

    /// Creates a compiler with default settings from an editor JSON snapshot.
    pub fn from_json(ui_json: &str) -> Result<Self, CompileError> {
        let ui = UiGraph::from_json(ui_json)?;
        Ok(Self::builder(ui.into_graph()?).build())
    }

    pub fn graph(&self) -> &GraphDefinition {
        &self.graph
    }

    /// Builds the IR without emitting it. Returns the IR and the warnings raised
    /// while building it.
    pub fn build_ir(&self) -> Result<(FileIr, Vec<Diagnostic>), CompileError> {
        tracing::info!(
            "[sakusen] building IR for '{}' ({} nodes, {} edges)",
            self.graph.name,
            self.graph.nodes.len(),
            self.graph.edges.len()
        );
        IrBuilder::new(&self.graph, &self.type_map, &self.registry).build()
    }

    /// Compiles the graph into a program.
    ///
    /// Warnings from the IR build come first, followed by those raised while emitting.
    pub fn compile(&self) -> Result<CompiledProgram, CompileError> {
        let (file, mut warnings) = self.build_ir()?;

        #[cfg(feature = "debug-tools")]
        self.write_debug_ir(&file);

        let mut program = match emit::emit_file(&file, &self.registry) {
            Ok(program) => program,
            Err(CompileError::Rejected {
                errors,
                warnings: emit_warnings,
            }) => {
                warnings.extend(emit_warnings);
                return Err(CompileError::Rejected { errors, warnings });
            }
            Err(other) => return Err(other),
        };

        warnings.append(&mut program.warnings);
        program.warnings = warnings;
        tracing::info!(
            "[sakusen] compiled '{}': {} line(s), {} warning(s)",
            program.file_id,
            program.source.lines().count(),
            program.warnings.len()
        );
        Ok(program)
    }

    #[cfg(feature = "debug-tools")]
    fn sanitize_filename(&self, name: &str) -> String {
        name.chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
            .collect::<String>()
    }

    /// Dumps the IR as JSON under `tmp/`. Failures are logged, never fatal.
    #[cfg(feature = "debug-tools")]
    fn write_debug_ir(&self, file: &FileIr) {
        let path = format!("tmp/{}_ir.json", self.sanitize_filename(&file.file_id));
        let result = fs::create_dir_all("tmp")
            .map_err(|e| e.to_string())
            .and_then(|_| serde_json::to_string_pretty(file).map_err(|e| e.to_string()))
            .and_then(|json| fs::write(&path, json).map_err(|e| e.to_string()));
        match result {
            Ok(()) => tracing::debug!("[sakusen] wrote IR to {}", path),
            Err(e) => tracing::warn!("[sakusen] could not write debug IR to {}: {}", path, e),
        }
    }
}
