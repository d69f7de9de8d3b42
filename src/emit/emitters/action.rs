use super::{MOVEMENT_MODULE, actor_input};
use crate::emit::literal::atom;
use crate::emit::walker::{Continuation, Walker};
use crate::ir::config::{MoveConfig, TransferConfig, TransferFallback, WithdrawConfig, WorkConfig};
use crate::ir::{Literal, NodeIr};

/// How an action is called and what it targets when nothing is configured.
pub(super) struct ActionSpec {
    /// Prefix of the temporary holding the result code.
    name: &'static str,
    method: &'static str,
    /// Default target relative to the actor, `None` when the target must be supplied.
    default_target: Option<&'static str>,
}

pub(super) const HARVEST: ActionSpec = ActionSpec {
    name: "harvest",
    method: "harvest",
    default_target: Some("pos.findClosestByRange(FIND_SOURCES_ACTIVE)"),
};

pub(super) const BUILD: ActionSpec = ActionSpec {
    name: "build",
    method: "build",
    default_target: Some("pos.findClosestByRange(FIND_CONSTRUCTION_SITES)"),
};

pub(super) const REPAIR: ActionSpec = ActionSpec {
    name: "repair",
    method: "repair",
    default_target: Some(
        "pos.findClosestByRange(FIND_STRUCTURES, { filter: (s) => s.hits < s.hitsMax })",
    ),
};

pub(super) const UPGRADE: ActionSpec = ActionSpec {
    name: "upgrade",
    method: "upgradeController",
    default_target: Some("room.controller"),
};

pub(super) const ATTACK: ActionSpec = ActionSpec {
    name: "attack",
    method: "attack",
    default_target: None,
};

pub(super) const HEAL: ActionSpec = ActionSpec {
    name: "heal",
    method: "heal",
    default_target: None,
};

const STORAGE: &str = "room.storage";

/// Resolves the `target` input: configured literal first, then the actor-relative default.
fn target_input(
    node: &NodeIr,
    configured: &Literal,
    default_target: Option<&str>,
    actor: &str,
    w: &mut Walker<'_>,
) -> String {
    let fallback = match (configured, default_target) {
        (Literal::Undefined, Some(path)) => Literal::expr(format!("{}.{}", actor, path)),
        _ => configured.clone(),
    };
    w.ctx().input(node, "target", &fallback)
}

/// Binds the call's result code to a fresh temporary and records it as the node's value.
fn bind_result(node: &NodeIr, name: &str, call: String, w: &mut Walker<'_>) -> String {
    let result = w.ctx().new_temp(name);
    w.ctx().push_statement(format!("const {} = {};", result, call));
    w.ctx().set_value(&node.id, &result);
    result
}

/// `if (result === ERR_NOT_IN_RANGE) { travelTo(actor, target); }`
fn move_closer(result: &str, actor: &str, target: &str, w: &mut Walker<'_>) {
    let travel = w.ctx().require_import("travelTo", MOVEMENT_MODULE);
    w.with_block(&format!("if ({} === ERR_NOT_IN_RANGE)", result), |w| {
        w.ctx()
            .push_statement(format!("{}({}, {});", travel, actor, target));
    });
}

fn call_args(target: &str, resource: &str, amount: Option<u32>) -> String {
    match amount {
        Some(amount) => format!("{}, {}, {}", target, resource, amount),
        None => format!("{}, {}", target, resource),
    }
}

pub(super) fn emit_move(node: &NodeIr, cfg: &MoveConfig, w: &mut Walker<'_>) -> Continuation {
    let actor = actor_input(node, w);
    let target = target_input(node, &cfg.target, None, &actor, w);
    let travel = w.ctx().require_import("travelTo", MOVEMENT_MODULE);

    let call = match cfg.range {
        Some(range) => format!("{}({}, {}, {{ range: {} }})", travel, actor, target, range),
        None => format!("{}({}, {})", travel, actor, target),
    };
    bind_result(node, "move", call, w);
    Continuation::Outputs
}

/// Harvest, build and repair.
pub(super) fn emit_work(
    node: &NodeIr,
    cfg: &WorkConfig,
    spec: ActionSpec,
    w: &mut Walker<'_>,
) -> Continuation {
    let actor = actor_input(node, w);
    let mut target = target_input(node, &cfg.target, spec.default_target, &actor, w);
    if cfg.move_closer {
        target = w.ctx().bind("target", target);
    }

    let call = format!("{}.{}({})", atom(&actor), spec.method, target);
    let result = bind_result(node, spec.name, call, w);
    if cfg.move_closer {
        move_closer(&result, &actor, &target, w);
    }
    Continuation::Outputs
}

/// Upgrade, attack and heal: a single call, no fallback movement.
pub(super) fn emit_targeted(
    node: &NodeIr,
    configured: &Literal,
    spec: ActionSpec,
    w: &mut Walker<'_>,
) -> Continuation {
    let actor = actor_input(node, w);
    let target = target_input(node, configured, spec.default_target, &actor, w);
    let call = format!("{}.{}({})", atom(&actor), spec.method, target);
    bind_result(node, spec.name, call, w);
    Continuation::Outputs
}

pub(super) fn emit_transfer(
    node: &NodeIr,
    cfg: &TransferConfig,
    w: &mut Walker<'_>,
) -> Continuation {
    let actor = actor_input(node, w);
    let mut target = target_input(node, &cfg.target, Some(STORAGE), &actor, w);
    if cfg.fallback == TransferFallback::Move {
        target = w.ctx().bind("target", target);
    }

    let call = format!(
        "{}.transfer({})",
        atom(&actor),
        call_args(&target, &cfg.resource, cfg.amount)
    );
    let result = bind_result(node, "transfer", call, w);

    match cfg.fallback {
        TransferFallback::None => {}
        TransferFallback::Move => move_closer(&result, &actor, &target, w),
        TransferFallback::Drop => {
            w.with_block(&format!("if ({} === ERR_NOT_IN_RANGE)", result), |w| {
                w.ctx()
                    .push_statement(format!("{}.drop({});", atom(&actor), cfg.resource));
            });
        }
    }
    Continuation::Outputs
}

pub(super) fn emit_withdraw(
    node: &NodeIr,
    cfg: &WithdrawConfig,
    w: &mut Walker<'_>,
) -> Continuation {
    let actor = actor_input(node, w);
    let target = target_input(node, &cfg.target, Some(STORAGE), &actor, w);
    let target = w.ctx().bind("target", target);

    let call = format!(
        "{}.withdraw({})",
        atom(&actor),
        call_args(&target, &cfg.resource, cfg.amount)
    );
    let result = bind_result(node, "withdraw", call, w);
    move_closer(&result, &actor, &target, w);
    Continuation::Outputs
}
