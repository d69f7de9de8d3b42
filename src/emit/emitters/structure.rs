use super::{actor_member, optional_input};
use crate::emit::literal::{atom, js_string, list, settings_object};
use crate::emit::walker::{Continuation, Walker};
use crate::ir::config::{LinkConfig, MarketConfig, MarketMode, TowerAction, TowerConfig};
use crate::ir::literal::format_number;
use crate::ir::{Literal, NodeIr};

fn object_by_id(id: Option<&str>) -> Literal {
    id.map(|id| Literal::expr(format!("Game.getObjectById({})", js_string(id))))
        .unwrap_or_default()
}

pub(super) fn emit_link(node: &NodeIr, cfg: &LinkConfig, w: &mut Walker<'_>) -> Continuation {
    let source = w
        .ctx()
        .input(node, "source", &object_by_id(cfg.source.as_deref()));
    let target = w
        .ctx()
        .input(node, "target", &object_by_id(cfg.target.as_deref()));
    let source = w.ctx().bind("link", source);

    let args = match cfg.amount {
        Some(amount) => format!("{}, {}", target, amount),
        None => target,
    };
    let result = w.ctx().new_temp("linked");
    w.ctx().push_statement(format!(
        "const {r} = {s} && {s}.cooldown === 0 ? {s}.transferEnergy({a}) : ERR_TIRED;",
        r = result,
        s = source,
        a = args
    ));
    w.ctx().set_value(&node.id, &result);
    Continuation::Outputs
}

pub(super) fn emit_market(node: &NodeIr, cfg: &MarketConfig, w: &mut Walker<'_>) -> Continuation {
    let fallback = actor_member(w, "room.terminal");
    let terminal = w.ctx().input(node, "terminal", &fallback);
    let terminal = w.ctx().bind("terminal", terminal);

    let amount_fallback = cfg
        .amount
        .map(|a| Literal::Number(f64::from(a)))
        .unwrap_or_default();
    let amount = optional_input(node, "amount", &amount_fallback, w);

    let call = match cfg.mode {
        MarketMode::Buy | MarketMode::Sell => {
            let order_type = if cfg.mode == MarketMode::Buy {
                "ORDER_BUY"
            } else {
                "ORDER_SELL"
            };
            let price_fallback = cfg.price.map(Literal::Number).unwrap_or_default();
            let price = optional_input(node, "price", &price_fallback, w);
            let order = settings_object(&[
                ("type".to_string(), Literal::expr(order_type)),
                ("resourceType".to_string(), Literal::expr(cfg.resource.as_str())),
                ("price".to_string(), price),
                ("totalAmount".to_string(), amount),
                (
                    "roomName".to_string(),
                    Literal::expr(format!("{}.room.name", terminal)),
                ),
            ]);
            format!("Game.market.createOrder({})", order)
        }
        MarketMode::Deal => {
            let order_fallback = cfg
                .order_id
                .as_deref()
                .map(|id| Literal::expr(js_string(id)))
                .unwrap_or_default();
            let order = optional_input(node, "orderId", &order_fallback, w);
            if order.is_undefined() {
                w.ctx().warn(&node.id, "market deal has no order id");
            }
            format!(
                "Game.market.deal({}, {}, {}.room.name)",
                order, amount, terminal
            )
        }
    };

    let result = w.ctx().new_temp("market");
    w.ctx()
        .push_statement(format!("let {} = ERR_NOT_FOUND;", result));
    w.with_block(&format!("if ({})", terminal), |w| {
        w.ctx().push_statement(format!("{} = {};", result, call));
    });
    w.ctx().set_value(&node.id, &result);
    Continuation::Outputs
}

pub(super) fn emit_tower(node: &NodeIr, cfg: &TowerConfig, w: &mut Walker<'_>) -> Continuation {
    let fallback = actor_member(w, "room");
    let room = w.ctx().input(node, "room", &fallback);

    let mut priorities: Vec<TowerAction> = Vec::new();
    for action in &cfg.priorities {
        if !priorities.contains(action) {
            priorities.push(*action);
        }
    }
    if priorities.is_empty() {
        w.ctx().warn(&node.id, "tower has no priorities configured");
    }

    let ctx = w.ctx();
    let towers = ctx.new_temp("towers");
    let tower = ctx.new_temp("tower");
    let action = ctx.new_temp("action");
    let target = ctx.new_temp("target");
    ctx.push_statement(format!(
        "const {} = {}.find(FIND_MY_STRUCTURES, {{ filter: (s) => s.structureType === STRUCTURE_TOWER }});",
        towers,
        atom(&room)
    ));

    let order = list(priorities.iter().map(|a| js_string(a.as_str())));
    ctx.with_block(&format!("for (const {} of {})", tower, towers), |ctx| {
        ctx.with_block(&format!("for (const {} of {})", action, order), |ctx| {
            for priority in &priorities {
                let header = format!("if ({} === {})", action, js_string(priority.as_str()));
                ctx.with_block(&header, |ctx| {
                    let (find, method) = match priority {
                        TowerAction::Heal => (
                            format!(
                                "{}.pos.findClosestByRange(FIND_MY_CREEPS, {{ filter: (c) => c.hits < c.hitsMax * {} }})",
                                tower,
                                format_number(cfg.heal_below)
                            ),
                            "heal",
                        ),
                        TowerAction::Attack => (
                            format!("{}.pos.findClosestByRange(FIND_HOSTILE_CREEPS)", tower),
                            "attack",
                        ),
                        TowerAction::Repair => {
                            ctx.push_statement(format!(
                                "if ({}.store[RESOURCE_ENERGY] < {}) continue;",
                                tower, cfg.min_repair_energy
                            ));
                            (
                                format!(
                                    "{}.pos.findClosestByRange(FIND_STRUCTURES, {{ filter: (s) => s.hits < s.hitsMax * {} }})",
                                    tower,
                                    format_number(cfg.repair_below)
                                ),
                                "repair",
                            )
                        }
                    };
                    ctx.push_statement(format!("const {} = {};", target, find));
                    ctx.push_statement(format!(
                        "if ({t} && {tw}.{m}({t}) === OK) break;",
                        t = target,
                        tw = tower,
                        m = method
                    ));
                });
            }
        });
    });

    w.ctx().set_value(&node.id, &towers);
    Continuation::Outputs
}
