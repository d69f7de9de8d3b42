use super::actor_input;
use crate::emit::literal::task_identifier;
use crate::emit::walker::{Continuation, Walker};
use crate::ir::config::TaskCallConfig;
use crate::ir::{Literal, NodeIr};

/// The arguments object: configured entries with the current actor passed as
/// `creep` unless the configuration already names one.
fn default_args(configured: &Literal, actor: &str) -> Literal {
    let creep = ("creep".to_string(), Literal::expr(actor));
    match configured {
        Literal::Undefined | Literal::Null => Literal::Map(vec![creep]),
        Literal::Map(entries) => {
            if entries.iter().any(|(key, _)| key == "creep") {
                configured.clone()
            } else {
                let mut entries = entries.clone();
                entries.insert(0, creep);
                Literal::Map(entries)
            }
        }
        other => other.clone(),
    }
}

pub(super) fn emit_call(node: &NodeIr, cfg: &TaskCallConfig, w: &mut Walker<'_>) -> Continuation {
    let name = cfg.task.as_deref().unwrap_or_default();
    let actor = actor_input(node, w);
    let fallback = default_args(&cfg.args, &actor);
    let args = w.ctx().input(node, "args", &fallback);

    let result = w.ctx().new_temp("task");
    w.ctx().push_statement(format!(
        "const {} = {}({});",
        result,
        task_identifier(name),
        args
    ));
    w.ctx().set_value(&node.id, &result);
    Continuation::Outputs
}
