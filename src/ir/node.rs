use super::config::TaskParam;
use super::{NodeKind, PortRef};
use crate::error::BuildError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One node instance of a compiled graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeIr {
    pub id: String,
    pub kind: NodeKind,
    /// Named inputs and where their values come from.
    #[serde(default)]
    pub inputs: BTreeMap<String, PortRef>,
    /// Nodes that run after this one, through its flow output.
    #[serde(default)]
    pub outputs: Vec<String>,
    /// Named sub-branches, each an independent chain of nodes.
    #[serde(default)]
    pub slots: BTreeMap<String, Vec<String>>,
}

impl NodeIr {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            inputs: BTreeMap::new(),
            outputs: Vec::new(),
            slots: BTreeMap::new(),
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, port: PortRef) -> Self {
        self.inputs.insert(name.into(), port);
        self
    }

    pub fn with_output(mut self, next: impl Into<String>) -> Self {
        self.outputs.push(next.into());
        self
    }

    pub fn with_slot(mut self, slot: impl Into<String>, children: &[&str]) -> Self {
        self.slots
            .entry(slot.into())
            .or_default()
            .extend(children.iter().map(|c| c.to_string()));
        self
    }

    pub fn input(&self, name: &str) -> Option<&PortRef> {
        self.inputs.get(name)
    }

    /// The children of a slot; empty when the slot does not exist.
    pub fn slot(&self, name: &str) -> &[String] {
        self.slots.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any slot has children, i.e. the node is a control structure.
    pub fn has_branches(&self) -> bool {
        self.slots.values().any(|children| !children.is_empty())
    }
}

/// A named sub-program compiled into its own function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDef {
    pub name: String,
    pub params: Vec<TaskParam>,
    /// First node of the task body; `None` for an empty body.
    pub entry_node_id: Option<String>,
    /// The `task.define` node the task was declared by.
    pub define_node_id: String,
}

/// One compiled unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileIr {
    pub file_id: String,
    pub entry_node_id: String,
    pub nodes: BTreeMap<String, NodeIr>,
    #[serde(default)]
    pub task_defs: Vec<TaskDef>,
}

impl FileIr {
    pub fn new(file_id: impl Into<String>, entry_node_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            entry_node_id: entry_node_id.into(),
            nodes: BTreeMap::new(),
            task_defs: Vec::new(),
        }
    }

    pub fn insert(&mut self, node: NodeIr) -> &mut Self {
        self.nodes.insert(node.id.clone(), node);
        self
    }

    pub fn node(&self, id: &str) -> Option<&NodeIr> {
        self.nodes.get(id)
    }

    /// Checks the invariants the emitter relies on: a single `start` node that is
    /// the entry point, unique task names, and task calls that resolve.
    pub fn validate(&self) -> Result<(), Vec<BuildError>> {
        let mut errors = Vec::new();

        if self.nodes.is_empty() {
            return Err(vec![BuildError::EmptyGraph]);
        }

        let starts: Vec<&str> = self
            .nodes
            .values()
            .filter(|n| matches!(n.kind, NodeKind::Start(_)))
            .map(|n| n.id.as_str())
            .collect();
        match starts.as_slice() {
            [] => errors.push(BuildError::MissingEntry),
            [only] if *only != self.entry_node_id => errors.push(BuildError::EntryMismatch {
                entry_node_id: self.entry_node_id.clone(),
            }),
            [_] => {}
            [first, second, ..] => errors.push(BuildError::DuplicateEntry {
                first: first.to_string(),
                second: second.to_string(),
            }),
        }

        let mut names = BTreeSet::new();
        for def in &self.task_defs {
            if !names.insert(def.name.as_str()) {
                errors.push(BuildError::DuplicateTask {
                    name: def.name.clone(),
                });
            }
        }

        for node in self.nodes.values() {
            if let NodeKind::TaskCall(cfg) = &node.kind {
                let task = cfg.task.as_deref().unwrap_or_default();
                if !names.contains(task) {
                    errors.push(BuildError::UnknownTask {
                        node_id: node.id.clone(),
                        task: task.to_string(),
                    });
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
