use crate::emit::literal::{atom, js_string, list, quote_strings};
use crate::emit::walker::{Continuation, Walker};
use crate::ir::config::{BodyPart, BodyStrategy, SpawnConfig};
use crate::ir::{Literal, NodeIr};

/// Hard cap on body size.
const MAX_BODY_PARTS: u32 = 50;

fn parts_list(parts: &[BodyPart]) -> String {
    list(parts.iter().map(|p| p.constant()))
}

/// The configured fixed body, or the default one when none is configured.
fn fixed_parts(cfg: &SpawnConfig) -> &[BodyPart] {
    if cfg.parts.is_empty() {
        &BodyPart::DEFAULT_BODY
    } else {
        &cfg.parts
    }
}

/// Highest tier not above `level`, or the lowest tier when all are above it.
fn select_tier(tiers: &[u32], level: u32) -> Option<u32> {
    tiers
        .iter()
        .copied()
        .filter(|tier| *tier <= level)
        .max()
        .or_else(|| tiers.iter().copied().min())
}

fn emit_weighted(node: &NodeIr, cfg: &SpawnConfig, spawn: &str, w: &mut Walker<'_>) -> String {
    let weights: Vec<(BodyPart, u32)> = BodyPart::PRIORITY
        .iter()
        .filter_map(|part| cfg.weights.get(part).map(|weight| (*part, *weight)))
        .filter(|(_, weight)| *weight > 0)
        .collect();
    if weights.is_empty() {
        w.ctx()
            .warn(&node.id, "weighted body has no positive weights; using fixed parts");
        return emit_fixed(cfg, w);
    }

    let max_parts = cfg.max_parts.clamp(1, MAX_BODY_PARTS);
    let table = list(
        weights
            .iter()
            .map(|(part, weight)| format!("[{}, {}]", part.constant(), weight)),
    );

    let ctx = w.ctx();
    let body = ctx.new_temp("body");
    let budget = ctx.new_temp("budget");
    let added = ctx.new_temp("added");
    ctx.push_statement(format!("const {} = [];", body));
    ctx.push_statement(format!(
        "let {} = {}.room.energyAvailable;",
        budget,
        atom(spawn)
    ));
    ctx.push_statement(format!("let {} = true;", added));
    ctx.with_block(
        &format!(
            "while ({} && {}.length < {})",
            added, body, max_parts
        ),
        |ctx| {
            ctx.push_statement(format!("{} = false;", added));
            ctx.with_block(&format!("for (const [part, weight] of {})", table), |ctx| {
                ctx.with_block(
                    &format!(
                        "for (let k = 0; k < weight && {}.length < {}; k++)",
                        body, max_parts
                    ),
                    |ctx| {
                        ctx.push_statement(format!("if (BODYPART_COST[part] > {}) break;", budget));
                        ctx.push_statement(format!("{}.push(part);", body));
                        ctx.push_statement(format!("{} -= BODYPART_COST[part];", budget));
                        ctx.push_statement(format!("{} = true;", added));
                    },
                );
            });
        },
    );
    let fallback = fixed_parts(cfg)
        .iter()
        .map(|p| p.constant())
        .collect::<Vec<_>>()
        .join(", ");
    ctx.push_statement(format!(
        "if ({}.length === 0) {}.push({});",
        body, body, fallback
    ));
    body
}

fn emit_preset(node: &NodeIr, cfg: &SpawnConfig, spawn: &str, w: &mut Walker<'_>) -> String {
    if cfg.presets.is_empty() {
        w.ctx()
            .warn(&node.id, "preset body has no presets; using fixed parts");
        return emit_fixed(cfg, w);
    }
    let tiers: Vec<u32> = cfg.presets.keys().copied().collect();

    // Configured level with nothing wired in: pick the tier now.
    if let (Some(level), None) = (cfg.level, node.input("level")) {
        let parts = select_tier(&tiers, level)
            .and_then(|tier| cfg.presets.get(&tier))
            .map(Vec::as_slice)
            .unwrap_or(fixed_parts(cfg));
        let body = w.ctx().new_temp("body");
        w.ctx()
            .push_statement(format!("const {} = {};", body, parts_list(parts)));
        return body;
    }

    let fallback = Literal::expr(format!("{}.room.controller.level", atom(spawn)));
    let level = w.ctx().input(node, "level", &fallback);
    let table = Literal::Map(
        cfg.presets
            .iter()
            .map(|(tier, parts)| (tier.to_string(), Literal::expr(parts_list(parts))))
            .collect(),
    );

    let ctx = w.ctx();
    let presets = ctx.new_temp("presets");
    let tier = ctx.new_temp("tier");
    let body = ctx.new_temp("body");
    ctx.push_statement(format!("const {} = {};", presets, table));
    ctx.push_statement(format!("let {} = {};", tier, tiers[0]));
    ctx.with_block(
        &format!("for (const t of {})", list(tiers.iter().map(u32::to_string))),
        |ctx| ctx.push_statement(format!("if (t <= {}) {} = t;", atom(&level), tier)),
    );
    ctx.push_statement(format!("const {} = {}[{}];", body, presets, tier));
    body
}

fn emit_fixed(cfg: &SpawnConfig, w: &mut Walker<'_>) -> String {
    let body = w.ctx().new_temp("body");
    w.ctx()
        .push_statement(format!("const {} = {};", body, parts_list(fixed_parts(cfg))));
    body
}

/// The memory template with strings quoted and the legacy `type` key copied to `role`.
fn memory_template(template: &Literal) -> Literal {
    match template {
        Literal::Map(entries) => {
            let mut entries = entries.clone();
            let has_role = entries.iter().any(|(k, _)| k == "role");
            if !has_role {
                if let Some(kind) = template.get("type") {
                    entries.push(("role".to_string(), kind.clone()));
                }
            }
            quote_strings(&Literal::Map(entries))
        }
        Literal::Undefined | Literal::Null => Literal::Map(Vec::new()),
        other => other.clone(),
    }
}

pub(super) fn emit_spawn(node: &NodeIr, cfg: &SpawnConfig, w: &mut Walker<'_>) -> Continuation {
    let fallback = match cfg.spawn.as_deref() {
        Some(name) => Literal::expr(format!("Game.spawns[{}]", js_string(name))),
        None => Literal::expr("Object.values(Game.spawns)[0]"),
    };
    let spawn = w.ctx().input(node, "spawn", &fallback);
    let spawn = w.ctx().bind("spawn", spawn);

    let body = match cfg.body {
        BodyStrategy::Fixed => emit_fixed(cfg, w),
        BodyStrategy::Weighted => emit_weighted(node, cfg, &spawn, w),
        BodyStrategy::Preset => emit_preset(node, cfg, &spawn, w),
    };

    let name_fallback = Literal::expr(format!("{} + Game.time", js_string(&cfg.name)));
    let name = w.ctx().input(node, "name", &name_fallback);
    let memory = w.ctx().input(node, "memory", &memory_template(&cfg.memory));

    let result = w.ctx().new_temp("spawned");
    w.ctx().push_statement(format!(
        "const {} = {}.spawnCreep({}, {}, {{ memory: {} }});",
        result,
        atom(&spawn),
        body,
        name,
        memory
    ));
    w.ctx().set_value(&node.id, &result);
    Continuation::Outputs
}
