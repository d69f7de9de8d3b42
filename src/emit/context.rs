use super::literal::js_string;
use crate::diagnostics::Diagnostics;
use crate::ir::{Literal, NodeIr, PortRef};
use ahash::AHashMap;
use itertools::Itertools;
use std::collections::BTreeMap;

/// Spaces added per nesting level.
pub const INDENT_STEP: usize = 2;

/// Expression used when a data reference cannot be resolved.
pub const UNRESOLVED: &str = "undefined";

/// Actor expression inside the primary function.
pub const MAIN_ACTOR: &str = "creep";

/// Actor expression inside task functions, which receive a single arguments object.
pub const TASK_ACTOR: &str = "args.creep";

/// Deduplicated imports, keyed by module path and then by imported symbol.
#[derive(Debug, Clone, Default)]
pub struct ImportRegistry {
    modules: BTreeMap<String, BTreeMap<String, String>>,
    taken: AHashMap<String, (String, String)>,
}

impl ImportRegistry {
    /// Returns the alias under which `symbol` from `module` is available,
    /// registering it on first use.
    pub fn require(&mut self, symbol: &str, module: &str) -> String {
        if let Some(alias) = self.modules.get(module).and_then(|s| s.get(symbol)) {
            return alias.clone();
        }

        let mut alias = symbol.to_string();
        let mut suffix = 0;
        while self.taken.contains_key(&alias) {
            suffix += 1;
            alias = format!("{}_{}", symbol, suffix);
        }
        self.insert(module, symbol, alias.clone());
        alias
    }

    fn insert(&mut self, module: &str, symbol: &str, alias: String) {
        self.taken
            .insert(alias.clone(), (module.to_string(), symbol.to_string()));
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(symbol.to_string(), alias);
    }

    /// Adds every import of `other`, keeping its aliases where they are still free.
    pub fn merge(&mut self, other: &ImportRegistry) {
        for (module, symbols) in &other.modules {
            for (symbol, alias) in symbols {
                let known = self.modules.get(module).is_some_and(|s| s.contains_key(symbol));
                if known {
                    continue;
                }
                if self.taken.contains_key(alias) {
                    self.require(symbol, module);
                } else {
                    self.insert(module, symbol, alias.clone());
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    /// One import statement per module, sorted by module path.
    pub fn lines(&self) -> Vec<String> {
        self.modules
            .iter()
            .map(|(module, symbols)| {
                let names = symbols
                    .iter()
                    .map(|(symbol, alias)| {
                        if symbol == alias {
                            symbol.clone()
                        } else {
                            format!("{} as {}", symbol, alias)
                        }
                    })
                    .join(", ");
                format!("import {{ {} }} from {};", names, js_string(module))
            })
            .collect()
    }
}

/// Mutable state of one compilation unit: emitted lines, indentation, temporary
/// names, produced values, imports and diagnostics.
#[derive(Debug)]
pub struct EmissionContext {
    lines: Vec<String>,
    indent: usize,
    next_temp: u32,
    values: AHashMap<String, String>,
    imports: ImportRegistry,
    diagnostics: Diagnostics,
    actor: String,
}

impl Default for EmissionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EmissionContext {
    pub fn new() -> Self {
        Self::with_actor(MAIN_ACTOR)
    }

    pub fn with_actor(actor: &str) -> Self {
        Self {
            lines: Vec::new(),
            indent: 0,
            next_temp: 0,
            values: AHashMap::new(),
            imports: ImportRegistry::default(),
            diagnostics: Diagnostics::new(),
            actor: actor.to_string(),
        }
    }

    /// A fresh context for a task body. It starts from a copy of this context's
    /// imports so the aliases it picks never clash with the parent's.
    pub fn child(&self) -> Self {
        let mut child = Self::with_actor(TASK_ACTOR);
        child.imports = self.imports.clone();
        child
    }

    /// Merges a finished child's imports and diagnostics into this context.
    pub fn absorb(&mut self, child: EmissionContext) {
        self.imports.merge(&child.imports);
        self.diagnostics.extend(child.diagnostics);
    }

    // --- Names ---

    /// `"{prefix}_{n}"` with `n` unique within this context.
    pub fn new_temp(&mut self, prefix: &str) -> String {
        self.next_temp += 1;
        format!("{}_{}", prefix, self.next_temp)
    }

    /// Expression for the implicit current actor.
    pub fn actor(&self) -> &str {
        &self.actor
    }

    // --- Statements ---

    pub fn push_statement(&mut self, line: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", " ".repeat(self.indent), line.as_ref()));
    }

    pub fn enter_scope(&mut self) {
        self.indent += INDENT_STEP;
    }

    /// Leaves one nesting level; a no-op at the outermost level.
    pub fn exit_scope(&mut self) {
        self.indent = self.indent.saturating_sub(INDENT_STEP);
    }

    /// Emits `header {`, the body one level deeper, and the closing `}`.
    pub fn with_block(&mut self, header: &str, body: impl FnOnce(&mut Self)) {
        self.push_statement(format!("{} {{", header));
        self.enter_scope();
        body(self);
        self.exit_scope();
        self.push_statement("}");
    }

    /// Binds `expr` to a new constant unless it is already cheap to repeat.
    pub fn bind(&mut self, prefix: &str, expr: String) -> String {
        if super::literal::is_simple(&expr) {
            return expr;
        }
        let name = self.new_temp(prefix);
        self.push_statement(format!("const {} = {};", name, expr));
        name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    // --- Values ---

    /// Records that `node_id`'s output is available as `expr`.
    pub fn set_value(&mut self, node_id: &str, expr: &str) {
        self.values.insert(node_id.to_string(), expr.to_string());
    }

    pub fn value_of(&self, node_id: &str) -> Option<&str> {
        self.values.get(node_id).map(String::as_str)
    }

    /// Resolves an input to an expression. Never fails: unresolvable references
    /// produce a warning tagged with `consumer` and the `undefined` placeholder.
    pub fn resolve_port(
        &mut self,
        consumer: &str,
        port: Option<&PortRef>,
        fallback: &Literal,
    ) -> String {
        match port {
            None => fallback.to_string(),
            Some(PortRef::Literal { value }) => value.to_string(),
            Some(PortRef::Edge { from_node_id, port }) => match self.values.get(from_node_id) {
                Some(expr) => expr.clone(),
                None => {
                    self.warn(
                        consumer,
                        format!(
                            "input references node '{}' (port '{}') which has not produced a value",
                            from_node_id, port
                        ),
                    );
                    UNRESOLVED.to_string()
                }
            },
        }
    }

    /// Shorthand for resolving one of `node`'s named inputs.
    pub fn input(&mut self, node: &NodeIr, name: &str, fallback: &Literal) -> String {
        self.resolve_port(&node.id, node.input(name), fallback)
    }

    // --- Imports ---

    pub fn require_import(&mut self, symbol: &str, module: &str) -> String {
        self.imports.require(symbol, module)
    }

    pub fn imports(&self) -> &ImportRegistry {
        &self.imports
    }

    // --- Diagnostics ---

    pub fn warn(&mut self, node_id: &str, message: impl Into<String>) {
        self.diagnostics.warn(Some(node_id), message);
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (Vec<String>, ImportRegistry, Diagnostics) {
        (self.lines, self.imports, self.diagnostics)
    }
}
