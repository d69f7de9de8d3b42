//! Built-in emitters, one function per node kind.
//!
//! `dispatch` matches every `NodeKind` variant, so adding a kind without an
//! emitter is a compile error rather than a runtime warning.

use super::walker::{Continuation, Walker};
use crate::ir::{Literal, NodeIr, NodeKind};

mod action;
mod flow;
mod memory;
mod query;
mod spawn;
mod structure;
mod task;

/// Helper module providing `travelTo`.
pub const MOVEMENT_MODULE: &str = "./lib/movement";
/// Helper module providing `findClosestByRange` and `findClosestByPath`.
pub const POSITION_MODULE: &str = "./lib/position";

pub(super) fn dispatch(node: &NodeIr, w: &mut Walker<'_>) -> Continuation {
    match &node.kind {
        NodeKind::Start(_) | NodeKind::Merge(_) => Continuation::Outputs,
        NodeKind::If(_) => flow::emit_if(node, w),
        NodeKind::Switch(cfg) => flow::emit_switch(node, cfg, w),
        NodeKind::Loop(cfg) => flow::emit_loop(node, cfg, w),
        NodeKind::Try(_) => flow::emit_try(node, w),
        NodeKind::Tick(cfg) => flow::emit_tick(node, cfg, w),
        NodeKind::FanOut(_) => flow::emit_fanout(node, w),
        NodeKind::Return(cfg) => flow::emit_return(node, cfg, w),
        NodeKind::Break(_) => flow::emit_jump(w, "break;"),
        NodeKind::Continue(_) => flow::emit_jump(w, "continue;"),

        NodeKind::Search(cfg) => query::emit_search(node, cfg, w),
        NodeKind::ById(cfg) => query::emit_by_id(node, cfg, w),
        NodeKind::Look(cfg) => query::emit_look(node, cfg, w),
        NodeKind::Best(cfg) => query::emit_best(node, cfg, w),

        NodeKind::Move(cfg) => action::emit_move(node, cfg, w),
        NodeKind::Harvest(cfg) => action::emit_work(node, cfg, action::HARVEST, w),
        NodeKind::Build(cfg) => action::emit_work(node, cfg, action::BUILD, w),
        NodeKind::Repair(cfg) => action::emit_work(node, cfg, action::REPAIR, w),
        NodeKind::Transfer(cfg) => action::emit_transfer(node, cfg, w),
        NodeKind::Withdraw(cfg) => action::emit_withdraw(node, cfg, w),
        NodeKind::Upgrade(cfg) => action::emit_targeted(node, &cfg.target, action::UPGRADE, w),
        NodeKind::Attack(cfg) => action::emit_targeted(node, &cfg.target, action::ATTACK, w),
        NodeKind::Heal(cfg) => action::emit_targeted(node, &cfg.target, action::HEAL, w),

        NodeKind::Spawn(cfg) => spawn::emit_spawn(node, cfg, w),
        NodeKind::Link(cfg) => structure::emit_link(node, cfg, w),
        NodeKind::Market(cfg) => structure::emit_market(node, cfg, w),
        NodeKind::Tower(cfg) => structure::emit_tower(node, cfg, w),

        NodeKind::MemoryRead(cfg) => memory::emit_read(node, cfg, w),
        NodeKind::MemoryWrite(cfg) => memory::emit_write(node, cfg, w),
        NodeKind::MemoryDelete(cfg) => memory::emit_delete(node, cfg, w),

        // Task bodies are compiled into their own functions.
        NodeKind::TaskDefine(_) => Continuation::Stop,
        NodeKind::TaskCall(cfg) => task::emit_call(node, cfg, w),

        // Routed to the registry by the walker before reaching here.
        NodeKind::Custom(_) => Continuation::Outputs,
    }
}

/// The implicit actor, unless the node's `actor` input says otherwise.
fn actor_input(node: &NodeIr, w: &mut Walker<'_>) -> String {
    let fallback = Literal::expr(w.ctx().actor());
    w.ctx().input(node, "actor", &fallback)
}

/// `{actor}.{suffix}` as a fallback literal.
fn actor_member(w: &mut Walker<'_>, suffix: &str) -> Literal {
    Literal::expr(format!("{}.{}", w.ctx().actor(), suffix))
}

/// Resolves an input to a literal expression, `Undefined` when it resolved to nothing.
fn optional_input(node: &NodeIr, name: &str, fallback: &Literal, w: &mut Walker<'_>) -> Literal {
    let expr = w.ctx().input(node, name, fallback);
    if expr == super::context::UNRESOLVED {
        Literal::Undefined
    } else {
        Literal::expr(expr)
    }
}
