use super::config::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad grouping of node kinds, used for logging and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Flow,
    Query,
    Action,
    Structure,
    Memory,
    Task,
    Custom,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Family::Flow => "flow",
            Family::Query => "query",
            Family::Action => "action",
            Family::Structure => "structure",
            Family::Memory => "memory",
            Family::Task => "task",
            Family::Custom => "custom",
        };
        write!(f, "{}", name)
    }
}

/// A node kind the built-in emitters do not know about. Only accepted when a
/// custom emitter has been registered for `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomNode {
    pub kind: String,
    pub settings: serde_json::Value,
}

/// Defines the closed set of built-in node kinds, their wire names, families and
/// configuration records.
macro_rules! define_node_kinds {
    ( $( ($variant:ident, $name:literal, $family:ident, $config:ty) ),* $(,)? ) => {
        /// The kind of a node together with its typed configuration.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "kind", content = "config")]
        pub enum NodeKind {
            $( #[serde(rename = $name)] $variant($config), )*
            #[serde(rename = "custom")]
            Custom(CustomNode),
        }

        /// Wire names of every built-in kind.
        pub const BUILTIN_KINDS: &[&str] = &[ $( $name ),* ];

        impl NodeKind {
            /// The wire name of this kind.
            pub fn name(&self) -> &str {
                match self {
                    $( NodeKind::$variant(_) => $name, )*
                    NodeKind::Custom(custom) => &custom.kind,
                }
            }

            pub fn family(&self) -> Family {
                match self {
                    $( NodeKind::$variant(_) => Family::$family, )*
                    NodeKind::Custom(_) => Family::Custom,
                }
            }

            /// Coerces free-form settings into the typed configuration of a built-in kind.
            /// Returns `None` when `name` is not a built-in kind.
            pub fn from_settings(
                name: &str,
                settings: serde_json::Value,
            ) -> Option<Result<NodeKind, serde_json::Error>> {
                match name {
                    $( $name => Some(
                        serde_json::from_value::<$config>(settings).map(NodeKind::$variant)
                    ), )*
                    _ => None,
                }
            }

            /// A built-in kind with its default configuration.
            pub fn with_defaults(name: &str) -> Option<NodeKind> {
                match name {
                    $( $name => Some(NodeKind::$variant(<$config>::default())), )*
                    _ => None,
                }
            }
        }
    };
}

define_node_kinds! {
    // Flow control
    (Start, "start", Flow, EmptyConfig),
    (If, "flow.if", Flow, EmptyConfig),
    (Switch, "flow.switch", Flow, SwitchConfig),
    (Loop, "flow.loop", Flow, LoopConfig),
    (Try, "flow.try", Flow, EmptyConfig),
    (Tick, "flow.tick", Flow, TickConfig),
    (FanOut, "flow.fanout", Flow, EmptyConfig),
    (Merge, "flow.merge", Flow, EmptyConfig),
    (Return, "flow.return", Flow, ReturnConfig),
    (Break, "flow.break", Flow, EmptyConfig),
    (Continue, "flow.continue", Flow, EmptyConfig),

    // Queries
    (Search, "query.search", Query, SearchConfig),
    (ById, "query.byId", Query, ByIdConfig),
    (Look, "query.look", Query, LookConfig),
    (Best, "query.best", Query, BestConfig),

    // Unit actions
    (Move, "action.move", Action, MoveConfig),
    (Harvest, "action.harvest", Action, WorkConfig),
    (Transfer, "action.transfer", Action, TransferConfig),
    (Withdraw, "action.withdraw", Action, WithdrawConfig),
    (Build, "action.build", Action, WorkConfig),
    (Repair, "action.repair", Action, WorkConfig),
    (Upgrade, "action.upgrade", Action, TargetConfig),
    (Attack, "action.attack", Action, TargetConfig),
    (Heal, "action.heal", Action, TargetConfig),

    // Structures
    (Spawn, "structure.spawn", Structure, SpawnConfig),
    (Link, "structure.link", Structure, LinkConfig),
    (Market, "structure.market", Structure, MarketConfig),
    (Tower, "structure.tower", Structure, TowerConfig),

    // Memory
    (MemoryRead, "memory.read", Memory, MemoryConfig),
    (MemoryWrite, "memory.write", Memory, MemoryConfig),
    (MemoryDelete, "memory.delete", Memory, MemoryConfig),

    // Tasks
    (TaskDefine, "task.define", Task, TaskDefineConfig),
    (TaskCall, "task.call", Task, TaskCallConfig),
}

impl NodeKind {
    pub fn is_builtin(name: &str) -> bool {
        BUILTIN_KINDS.contains(&name)
    }

    /// Inputs that should be connected (or given a literal) because the
    /// configuration does not provide a fallback for them.
    pub fn required_inputs(&self) -> Vec<&'static str> {
        match self {
            NodeKind::If(_) => vec!["condition"],
            NodeKind::Switch(_) => vec!["value"],
            NodeKind::Best(_) => vec!["list"],
            NodeKind::ById(cfg) if cfg.id.is_none() => vec!["id"],
            NodeKind::Move(cfg) if cfg.target.is_undefined() => vec!["target"],
            NodeKind::Attack(cfg) | NodeKind::Heal(cfg) if cfg.target.is_undefined() => {
                vec!["target"]
            }
            NodeKind::Link(cfg) => {
                let mut required = Vec::new();
                if cfg.source.is_none() {
                    required.push("source");
                }
                if cfg.target.is_none() {
                    required.push("target");
                }
                required
            }
            NodeKind::MemoryWrite(cfg) if cfg.value.is_undefined() => vec!["value"],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
