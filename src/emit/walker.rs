use super::context::EmissionContext;
use super::emitters;
use super::registry::EmitterRegistry;
use crate::ir::{NodeIr, NodeKind};
use ahash::{AHashMap, AHashSet};
use std::collections::BTreeMap;

/// What the walker does after a node has been emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Keep going through the node's flow outputs.
    Outputs,
    /// The node ends its chain (return, break, task definitions...).
    Stop,
}

/// Depth-first traversal of the node graph that emits every reachable node once.
///
/// Slots of a control node are emitted before its outputs. While the slots are
/// being emitted, the control node's outputs and any node reachable from more
/// than one of its slots (following flow outputs only) are pending join points:
/// a branch that flows into one stops there, so the shared continuation is
/// written once, after the whole construct. Any other node reached twice is
/// written where the first branch reaches it.
pub struct Walker<'a> {
    nodes: &'a BTreeMap<String, NodeIr>,
    registry: &'a EmitterRegistry,
    ctx: &'a mut EmissionContext,
    visited: AHashSet<String>,
    joins: Vec<String>,
}

impl<'a> Walker<'a> {
    pub fn new(
        nodes: &'a BTreeMap<String, NodeIr>,
        registry: &'a EmitterRegistry,
        ctx: &'a mut EmissionContext,
    ) -> Self {
        Self {
            nodes,
            registry,
            ctx,
            visited: AHashSet::new(),
            joins: Vec::new(),
        }
    }

    pub fn ctx(&mut self) -> &mut EmissionContext {
        &mut *self.ctx
    }

    pub fn registry(&self) -> &'a EmitterRegistry {
        self.registry
    }

    /// Emits the node `id` and everything reachable through its outputs.
    pub fn walk(&mut self, id: &str) {
        if self.visited.contains(id) || self.joins.iter().any(|j| j == id) {
            return;
        }
        self.visited.insert(id.to_string());

        let nodes = self.nodes;
        let Some(node) = nodes.get(id) else {
            tracing::debug!("[sakusen] skipping missing node '{}'", id);
            return;
        };

        let pending = self.joins.len();
        let shared = if node.has_branches() {
            self.joins.extend(node.outputs.iter().cloned());
            let shared = self.shared_continuations(node);
            self.joins.extend(shared.iter().cloned());
            shared
        } else {
            Vec::new()
        };

        tracing::debug!(
            "[sakusen] emitting {} node '{}' ({})",
            node.kind.family(),
            node.id,
            node.kind
        );
        let continuation = self.dispatch(node);
        self.joins.truncate(pending);

        if continuation == Continuation::Outputs {
            self.emit_branch(&node.outputs);
            self.emit_branch(&shared);
        }
    }

    /// Nodes reachable from more than one non-empty slot of `node` through flow
    /// outputs, in discovery order. Slots of nested constructs are not searched:
    /// a node inside one stays there. Already emitted nodes and `node` itself are
    /// not traversed.
    fn shared_continuations(&self, node: &NodeIr) -> Vec<String> {
        let nodes = self.nodes;
        let branches: Vec<&Vec<String>> =
            node.slots.values().filter(|c| !c.is_empty()).collect();
        if branches.len() < 2 {
            return Vec::new();
        }

        let mut reached_by: AHashMap<&str, usize> = AHashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for children in branches {
            let mut reached: AHashSet<&str> = AHashSet::new();
            let mut stack: Vec<&str> = children.iter().rev().map(String::as_str).collect();
            while let Some(id) = stack.pop() {
                if id == node.id || self.visited.contains(id) || !reached.insert(id) {
                    continue;
                }
                let count = reached_by.entry(id).or_insert(0);
                if *count == 0 {
                    order.push(id);
                }
                *count += 1;

                if let Some(next) = nodes.get(id) {
                    stack.extend(next.outputs.iter().rev().map(String::as_str));
                }
            }
        }

        order
            .into_iter()
            .filter(|id| reached_by.get(id).is_some_and(|count| *count > 1))
            .map(str::to_string)
            .collect()
    }

    fn dispatch(&mut self, node: &NodeIr) -> Continuation {
        match &node.kind {
            NodeKind::Custom(custom) => {
                let registry = self.registry;
                match registry.get(&custom.kind) {
                    Some(emitter) => emitter.emit(node, &custom.settings, self),
                    None => {
                        self.ctx.warn(
                            &node.id,
                            format!("no emitter implemented for kind {}", custom.kind),
                        );
                        Continuation::Outputs
                    }
                }
            }
            _ => emitters::dispatch(node, self),
        }
    }

    pub fn emit_next(&mut self, id: &str) {
        self.walk(id);
    }

    /// Walks a list of chain heads, left to right.
    pub fn emit_branch(&mut self, ids: &[String]) {
        for id in ids {
            self.walk(id);
        }
    }

    pub fn emit_slot(&mut self, node: &NodeIr, slot: &str) {
        self.emit_branch(node.slot(slot));
    }

    /// Emits `header {`, then `body` one level deeper, then `}`.
    pub fn with_block(&mut self, header: &str, body: impl FnOnce(&mut Self)) {
        self.ctx.push_statement(format!("{} {{", header));
        self.indented(body);
        self.ctx.push_statement("}");
    }

    pub fn indented(&mut self, body: impl FnOnce(&mut Self)) {
        self.ctx.enter_scope();
        body(self);
        self.ctx.exit_scope();
    }
}
