use crate::emit::literal::is_identifier;
use crate::emit::walker::{Continuation, Walker};
use crate::ir::config::{LoopConfig, LoopMode, ReturnConfig, SwitchConfig, TickConfig, TickMode};
use crate::ir::{Literal, NodeIr};

pub(super) fn emit_if(node: &NodeIr, w: &mut Walker<'_>) -> Continuation {
    let condition = w.ctx().input(node, "condition", &Literal::Bool(false));

    w.ctx().push_statement(format!("if ({}) {{", condition));
    w.indented(|w| w.emit_slot(node, "true"));
    if !node.slot("false").is_empty() {
        w.ctx().push_statement("} else {");
        w.indented(|w| w.emit_slot(node, "false"));
    }
    w.ctx().push_statement("}");
    Continuation::Outputs
}

pub(super) fn emit_switch(node: &NodeIr, cfg: &SwitchConfig, w: &mut Walker<'_>) -> Continuation {
    let key = w.ctx().input(node, "value", &Literal::Undefined);

    w.with_block(&format!("switch ({})", key), |w| {
        let mut seen: Vec<&Literal> = Vec::new();
        for (index, case) in cfg.cases.iter().enumerate() {
            if seen.contains(&&case.value) {
                w.ctx().warn(
                    &node.id,
                    format!("duplicate case value {} ignored (case {})", case.value, index),
                );
                continue;
            }
            seen.push(&case.value);

            let slot = format!("case-{}", index);
            w.with_block(&format!("case {}:", case.value), |w| {
                w.emit_slot(node, &slot);
                w.ctx().push_statement("break;");
            });
        }
        w.with_block("default:", |w| {
            w.emit_slot(node, "default");
            w.ctx().push_statement("break;");
        });
    });
    Continuation::Outputs
}

pub(super) fn emit_loop(node: &NodeIr, cfg: &LoopConfig, w: &mut Walker<'_>) -> Continuation {
    let max = cfg.max_iterations();
    let ran = w.ctx().new_temp("ran");
    w.ctx().push_statement(format!("let {} = false;", ran));

    match cfg.mode {
        LoopMode::Counted => {
            let index = match cfg.iterator.as_deref() {
                Some(name) if is_identifier(name) => name.to_string(),
                _ => w.ctx().new_temp("i"),
            };
            let header = format!(
                "for (let {i} = 0; {i} < {max}; {i}++)",
                i = index,
                max = max
            );
            w.with_block(&header, |w| {
                w.ctx().push_statement(format!("{} = true;", ran));
                w.ctx().set_value(&node.id, &index);
                w.emit_slot(node, "body");
            });
        }
        LoopMode::Conditional => {
            let condition = w.ctx().input(node, "condition", &Literal::Bool(true));
            let guard = w.ctx().new_temp("guard");
            w.ctx().push_statement(format!("let {} = 0;", guard));
            w.with_block(&format!("while ({})", condition), |w| {
                w.ctx()
                    .push_statement(format!("if ({} >= {}) break;", guard, max));
                w.ctx().push_statement(format!("{}++;", guard));
                w.ctx().push_statement(format!("{} = true;", ran));
                w.ctx().set_value(&node.id, &guard);
                w.emit_slot(node, "body");
            });
        }
    }

    if !node.slot("else").is_empty() {
        w.with_block(&format!("if (!{})", ran), |w| w.emit_slot(node, "else"));
    }
    Continuation::Outputs
}

pub(super) fn emit_try(node: &NodeIr, w: &mut Walker<'_>) -> Continuation {
    w.ctx().push_statement("try {");
    w.indented(|w| w.emit_slot(node, "try"));

    let error = w.ctx().new_temp("err");
    w.ctx().push_statement(format!("}} catch ({}) {{", error));
    w.indented(|w| {
        w.ctx().set_value(&node.id, &error);
        if node.slot("catch").is_empty() {
            w.ctx().push_statement("// error suppressed");
        } else {
            w.emit_slot(node, "catch");
        }
    });

    if !node.slot("finally").is_empty() {
        w.ctx().push_statement("} finally {");
        w.indented(|w| w.emit_slot(node, "finally"));
    }
    w.ctx().push_statement("}");
    Continuation::Outputs
}

/// The gate expression of a tick node.
fn tick_condition(cfg: &TickConfig) -> String {
    let interval = if cfg.interval <= 0 { 1 } else { cfg.interval };
    match cfg.mode {
        TickMode::Multiple => match cfg.offset {
            0 => format!("Game.time % {} === 0", interval),
            n if n < 0 => format!(
                "(Game.time - {}) % {} === 0",
                n.unsigned_abs(),
                interval
            ),
            n => format!("(Game.time + {}) % {} === 0", n, interval),
        },
        TickMode::Modulo => format!(
            "Game.time % {} === {}",
            interval,
            cfg.offset.rem_euclid(interval)
        ),
    }
}

pub(super) fn emit_tick(node: &NodeIr, cfg: &TickConfig, w: &mut Walker<'_>) -> Continuation {
    let gate = w.ctx().new_temp("tick");
    w.ctx()
        .push_statement(format!("const {} = {};", gate, tick_condition(cfg)));
    w.ctx().set_value(&node.id, &gate);
    w.with_block(&format!("if ({})", gate), |w| w.emit_slot(node, "body"));
    Continuation::Outputs
}

pub(super) fn emit_fanout(node: &NodeIr, w: &mut Walker<'_>) -> Continuation {
    for (name, children) in &node.slots {
        w.ctx().push_statement(format!("// branch: {}", name));
        w.emit_branch(children);
    }
    Continuation::Outputs
}

pub(super) fn emit_return(node: &NodeIr, cfg: &ReturnConfig, w: &mut Walker<'_>) -> Continuation {
    if node.input("value").is_none() && cfg.value.is_undefined() {
        w.ctx().push_statement("return;");
    } else {
        let value = w.ctx().input(node, "value", &cfg.value);
        w.ctx().push_statement(format!("return {};", value));
    }
    Continuation::Stop
}

pub(super) fn emit_jump(w: &mut Walker<'_>, statement: &str) -> Continuation {
    w.ctx().push_statement(statement);
    Continuation::Stop
}
