use super::{actor_input, actor_member};
use crate::emit::literal::{js_string, split_path};
use crate::emit::walker::{Continuation, Walker};
use crate::ir::config::{MemoryConfig, MemoryScope};
use crate::ir::{Literal, NodeIr};

/// A memory location: a base expression plus bracketed key expressions.
struct MemoryPath {
    base: String,
    segments: Vec<String>,
    /// Number of segments that came from the configured path, not the scope.
    user_segments: usize,
}

impl MemoryPath {
    fn resolve(node: &NodeIr, cfg: &MemoryConfig, w: &mut Walker<'_>) -> Self {
        let mut segments = Vec::new();
        let base = match cfg.scope {
            MemoryScope::Global => "Memory".to_string(),
            MemoryScope::Room => {
                let fallback = actor_member(w, "room");
                let room = w.ctx().input(node, "room", &fallback);
                let room = w.ctx().bind("room", room);
                segments.push(js_string("rooms"));
                segments.push(format!("{}.name", room));
                "Memory".to_string()
            }
            MemoryScope::Actor => format!("{}.memory", actor_input(node, w)),
        };

        let user = split_path(&cfg.path);
        let user_segments = user.len();
        segments.extend(user.iter().map(|s| js_string(s)));
        Self {
            base,
            segments,
            user_segments,
        }
    }

    /// `base?.[a]?.[b]`
    fn optional(&self) -> String {
        self.segments
            .iter()
            .fold(self.base.clone(), |acc, s| format!("{}?.[{}]", acc, s))
    }

    /// `base[a][b]` over the first `len` segments.
    fn direct(&self, len: usize) -> String {
        self.segments[..len]
            .iter()
            .fold(self.base.clone(), |acc, s| format!("{}[{}]", acc, s))
    }
}

pub(super) fn emit_read(node: &NodeIr, cfg: &MemoryConfig, w: &mut Walker<'_>) -> Continuation {
    let path = MemoryPath::resolve(node, cfg, w);
    let default = w.ctx().input(node, "default", &cfg.default);

    let read = if node.input("default").is_none() && cfg.default.is_undefined() {
        path.optional()
    } else {
        format!("{} ?? {}", path.optional(), default)
    };
    let value = w.ctx().new_temp("mem");
    w.ctx().push_statement(format!("const {} = {};", value, read));
    w.ctx().set_value(&node.id, &value);
    Continuation::Outputs
}

pub(super) fn emit_write(node: &NodeIr, cfg: &MemoryConfig, w: &mut Walker<'_>) -> Continuation {
    let path = MemoryPath::resolve(node, cfg, w);
    if path.user_segments == 0 {
        w.ctx().warn(&node.id, "memory write has an empty path");
        return Continuation::Outputs;
    }

    let value = w.ctx().input(node, "value", &cfg.value);
    let value = w.ctx().bind("value", value);

    let depth = path.segments.len();
    for len in 1..depth {
        let parent = path.direct(len);
        w.ctx()
            .push_statement(format!("if ({} == null) {} = {{}};", parent, parent));
    }

    let slot = path.direct(depth);
    if cfg.merge {
        let prev = w.ctx().new_temp("prev");
        w.ctx().push_statement(format!("const {} = {};", prev, slot));
        w.ctx().push_statement(format!(
            "{slot} = {p} !== null && typeof {p} === \"object\" && !Array.isArray({p}) \
             ? Object.assign({{}}, {p}, {v}) : {v};",
            slot = slot,
            p = prev,
            v = value
        ));
    } else {
        w.ctx().push_statement(format!("{} = {};", slot, value));
    }
    w.ctx().set_value(&node.id, &value);
    Continuation::Outputs
}

pub(super) fn emit_delete(node: &NodeIr, cfg: &MemoryConfig, w: &mut Walker<'_>) -> Continuation {
    let path = MemoryPath::resolve(node, cfg, w);
    if path.user_segments == 0 {
        w.ctx().warn(&node.id, "memory delete has an empty path");
        return Continuation::Outputs;
    }
    w.ctx()
        .push_statement(format!("delete {};", path.optional()));
    w.ctx().set_value(&node.id, &Literal::Bool(true).to_string());
    Continuation::Outputs
}
