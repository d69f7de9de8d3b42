use super::context::{EmissionContext, INDENT_STEP};
use super::literal::{property_key, task_identifier};
use super::registry::EmitterRegistry;
use super::walker::Walker;
use crate::diagnostics::Diagnostics;
use crate::graph::CompiledProgram;
use crate::ir::{FileIr, TaskDef};

/// Comment written in place of an empty function body.
pub const EMPTY_BODY: &str = "// no statements";

/// Name of the primary exported function.
pub const ENTRY_FUNCTION: &str = "run";

/// A function body plus the signature line it goes under.
struct FunctionBlock {
    header: String,
    preamble: Vec<String>,
    body: Vec<String>,
}

impl FunctionBlock {
    fn render(&self, out: &mut Vec<String>) {
        let pad = " ".repeat(INDENT_STEP);
        out.push(format!("{} {{", self.header));
        for line in &self.preamble {
            out.push(format!("{}{}", pad, line));
        }
        if self.body.is_empty() {
            out.push(format!("{}{}", pad, EMPTY_BODY));
        }
        for line in &self.body {
            out.push(format!("{}{}", pad, line));
        }
        out.push("}".to_string());
    }
}

fn param_comment(def: &TaskDef) -> Option<String> {
    if def.params.is_empty() {
        return None;
    }
    let params = def
        .params
        .iter()
        .map(|p| match &p.default {
            Some(default) => format!("{}: {} = {}", property_key(&p.key), p.ty, default),
            None => format!("{}: {}", property_key(&p.key), p.ty),
        })
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("// params: {}", params))
}

/// Compiles one task body in its own child context.
fn emit_task(
    file: &FileIr,
    def: &TaskDef,
    registry: &EmitterRegistry,
    parent: &mut EmissionContext,
) -> FunctionBlock {
    let mut ctx = parent.child();
    match def.entry_node_id.as_deref() {
        Some(entry) => {
            let mut walker = Walker::new(&file.nodes, registry, &mut ctx);
            walker.walk(entry);
        }
        None => ctx.warn(
            &def.define_node_id,
            format!("task '{}' has an empty body", def.name),
        ),
    }

    let body = ctx.take_lines();
    tracing::debug!(
        "[sakusen] task '{}' emitted {} line(s)",
        def.name,
        body.len()
    );
    parent.absorb(ctx);

    FunctionBlock {
        header: format!("function {}(args)", task_identifier(&def.name)),
        preamble: param_comment(def).into_iter().collect(),
        body,
    }
}

/// Walks the main graph and every task body, then lays the file out.
///
/// The IR must already be valid; see [`FileIr::validate`].
pub fn assemble(file: &FileIr, registry: &EmitterRegistry) -> CompiledProgram {
    let mut ctx = EmissionContext::new();
    {
        let mut walker = Walker::new(&file.nodes, registry, &mut ctx);
        walker.walk(&file.entry_node_id);
    }
    let main = FunctionBlock {
        header: format!("export function {}(creep)", ENTRY_FUNCTION),
        preamble: Vec::new(),
        body: ctx.take_lines(),
    };

    let tasks: Vec<FunctionBlock> = file
        .task_defs
        .iter()
        .map(|def| emit_task(file, def, registry, &mut ctx))
        .collect();

    let (_, imports, diagnostics) = ctx.into_parts();

    let mut out = vec![format!(
        "// @generated by sakusen from graph {} -- do not edit",
        super::literal::js_string(&file.file_id)
    )];
    out.push(String::new());
    if !imports.is_empty() {
        out.extend(imports.lines());
        out.push(String::new());
    }
    main.render(&mut out);
    for task in &tasks {
        out.push(String::new());
        task.render(&mut out);
    }

    let mut source = out.join("\n");
    source.push('\n');

    let Diagnostics { warnings, .. } = diagnostics;
    CompiledProgram {
        file_id: file.file_id.clone(),
        source,
        warnings,
    }
}
