use super::{POSITION_MODULE, actor_member};
use crate::emit::literal::{atom, js_string, member_path};
use crate::emit::walker::{Continuation, Walker};
use crate::ir::config::{
    BestConfig, BestStrategy, ByIdConfig, FilterOp, LookConfig, LookMode, SearchConfig,
    SearchFilter, SearchMode,
};
use crate::ir::{Literal, NodeIr};

/// One filter clause; anything incomplete matches everything.
fn predicate(object: &str, filter: &SearchFilter) -> String {
    let (Some(field), Some(op)) = (filter.field.as_deref(), filter.op) else {
        return "true".to_string();
    };
    if field.trim().is_empty() {
        return "true".to_string();
    }

    let lhs = member_path(object, field);
    let value = filter.value.to_string();
    let operator = match op {
        FilterOp::Eq => "===",
        FilterOp::Ne => "!==",
        FilterOp::Lt => "<",
        FilterOp::Lte => "<=",
        FilterOp::Gt => ">",
        FilterOp::Gte => ">=",
        FilterOp::In => return format!("{}.includes({})", atom(&value), lhs),
        FilterOp::Unknown => return "true".to_string(),
    };
    format!("{} {} {}", lhs, operator, value)
}

pub(super) fn emit_search(node: &NodeIr, cfg: &SearchConfig, w: &mut Walker<'_>) -> Continuation {
    let fallback = actor_member(w, "room");
    let room = w.ctx().input(node, "room", &fallback);

    let mut expr = if cfg.filters.is_empty() {
        format!("{}.find({})", atom(&room), cfg.find)
    } else {
        let object = w.ctx().new_temp("o");
        let clauses = cfg
            .filters
            .iter()
            .map(|f| predicate(&object, f))
            .collect::<Vec<_>>()
            .join(" && ");
        format!(
            "{}.find({}, {{ filter: ({}) => {} }})",
            atom(&room),
            cfg.find,
            object,
            clauses
        )
    };
    if let Some(limit) = cfg.limit {
        expr.push_str(&format!(".slice(0, {})", limit));
    }
    if cfg.mode == SearchMode::First {
        expr.push_str("[0] ?? null");
    }

    let found = w.ctx().new_temp("found");
    w.ctx().push_statement(format!("const {} = {};", found, expr));
    w.ctx().set_value(&node.id, &found);
    Continuation::Outputs
}

pub(super) fn emit_by_id(node: &NodeIr, cfg: &ByIdConfig, w: &mut Walker<'_>) -> Continuation {
    let fallback = cfg
        .id
        .as_deref()
        .map(|id| Literal::expr(js_string(id)))
        .unwrap_or_default();
    let id = w.ctx().input(node, "id", &fallback);

    let object = w.ctx().new_temp("obj");
    w.ctx()
        .push_statement(format!("const {} = Game.getObjectById({});", object, id));
    w.ctx().set_value(&node.id, &object);
    Continuation::Outputs
}

pub(super) fn emit_look(node: &NodeIr, cfg: &LookConfig, w: &mut Walker<'_>) -> Continuation {
    let fallback = actor_member(w, "pos");
    let pos = w.ctx().input(node, "pos", &fallback);
    let look = w.ctx().new_temp("look");

    match cfg.mode {
        LookMode::Point => {
            w.ctx().push_statement(format!(
                "const {} = {}.lookFor({});",
                look,
                atom(&pos),
                cfg.look
            ));
        }
        LookMode::Area => {
            let radius = w
                .ctx()
                .input(node, "radius", &Literal::Number(f64::from(cfg.radius)));
            let radius = atom(&radius);
            let pos = w.ctx().bind("pos", pos);
            w.ctx().push_statement(format!(
                "const {look} = Game.rooms[{p}.roomName].lookForAtArea({kind}, \
                 Math.max(0, {p}.y - {r}), Math.max(0, {p}.x - {r}), \
                 Math.min(49, {p}.y + {r}), Math.min(49, {p}.x + {r}), true);",
                look = look,
                p = pos,
                kind = cfg.look,
                r = radius
            ));
        }
    }
    w.ctx().set_value(&node.id, &look);
    Continuation::Outputs
}

pub(super) fn emit_best(node: &NodeIr, cfg: &BestConfig, w: &mut Walker<'_>) -> Continuation {
    let list = w.ctx().input(node, "list", &Literal::List(Vec::new()));

    let best = match cfg.strategy {
        BestStrategy::Range | BestStrategy::Path => {
            let fallback = actor_member(w, "pos");
            let origin = w.ctx().input(node, "origin", &fallback);
            let helper = match cfg.strategy {
                BestStrategy::Path => "findClosestByPath",
                _ => "findClosestByRange",
            };
            let helper = w.ctx().require_import(helper, POSITION_MODULE);
            let best = w.ctx().new_temp("best");
            w.ctx().push_statement(format!(
                "const {} = {}({}, {});",
                best, helper, origin, list
            ));
            best
        }
        BestStrategy::Min | BestStrategy::Max => {
            let ctx = w.ctx();
            let best = ctx.new_temp("best");
            let score = ctx.new_temp("score");
            let candidate = ctx.new_temp("c");
            let value = ctx.new_temp("v");
            let key = cfg
                .key
                .as_deref()
                .map(|k| member_path(&candidate, k))
                .unwrap_or_else(|| candidate.clone());
            let better = if cfg.strategy == BestStrategy::Min { "<" } else { ">" };

            ctx.push_statement(format!("let {} = null;", best));
            ctx.push_statement(format!("let {} = null;", score));
            ctx.with_block(
                &format!("for (const {} of {})", candidate, list),
                |ctx| {
                    ctx.push_statement(format!("if ({} == null) continue;", candidate));
                    ctx.push_statement(format!("const {} = {};", value, key));
                    ctx.with_block(
                        &format!(
                            "if ({s} === null || {v} {op} {s})",
                            s = score,
                            v = value,
                            op = better
                        ),
                        |ctx| {
                            ctx.push_statement(format!("{} = {};", best, candidate));
                            ctx.push_statement(format!("{} = {};", score, value));
                        },
                    );
                },
            );
            best
        }
    };

    w.ctx().set_value(&node.id, &best);
    Continuation::Outputs
}
