use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::emit::EmitterRegistry;
use crate::error::{BuildError, CompileError};
use crate::graph::{GraphDefinition, GraphEdgeDefinition, GraphNodeDefinition};
use crate::ir::{CustomNode, FileIr, Literal, NodeIr, NodeKind, PortRef, TaskDef};
use ahash::{AHashMap, AHashSet};
use std::collections::BTreeMap;

/// Where an edge leaves its source node.
#[derive(Debug, PartialEq)]
enum SourcePort<'p> {
    Flow,
    Slot(&'p str),
    Data(&'p str),
}

/// Where an edge enters its target node.
#[derive(Debug, PartialEq)]
enum TargetPort<'p> {
    Flow,
    Data(&'p str),
}

fn parse_source_port(port: &str) -> Option<SourcePort<'_>> {
    match port {
        "flow" | "out" => Some(SourcePort::Flow),
        _ => {
            if let Some(slot) = port.strip_prefix("slot:").filter(|s| !s.is_empty()) {
                Some(SourcePort::Slot(slot))
            } else {
                port.strip_prefix("data:")
                    .filter(|s| !s.is_empty())
                    .map(SourcePort::Data)
            }
        }
    }
}

fn parse_target_port(port: &str) -> Option<TargetPort<'_>> {
    match port {
        "flow" | "in" => Some(TargetPort::Flow),
        _ => port
            .strip_prefix("data:")
            .filter(|s| !s.is_empty())
            .map(TargetPort::Data),
    }
}

/// Splits raw settings into literal inputs (the `inputs` object) and the rest.
fn split_settings(settings: serde_json::Value) -> (BTreeMap<String, PortRef>, serde_json::Value) {
    match settings {
        serde_json::Value::Null => (BTreeMap::new(), serde_json::json!({})),
        serde_json::Value::Object(mut map) => {
            let inputs = match map.remove("inputs") {
                Some(serde_json::Value::Object(inputs)) => inputs
                    .into_iter()
                    .map(|(name, value)| (name, PortRef::literal(Literal::from(value))))
                    .collect(),
                _ => BTreeMap::new(),
            };
            (inputs, serde_json::Value::Object(map))
        }
        other => (BTreeMap::new(), other),
    }
}

/// Turns a `GraphDefinition` into a `FileIr`, collecting hard errors and warnings.
pub(super) struct IrBuilder<'a> {
    graph: &'a GraphDefinition,
    type_map: &'a AHashMap<String, String>,
    registry: &'a EmitterRegistry,
    nodes: BTreeMap<String, NodeIr>,
    /// Node ids in declaration order, including nodes that failed to build.
    declared: Vec<String>,
    errors: Vec<BuildError>,
    diagnostics: Diagnostics,
}

impl<'a> IrBuilder<'a> {
    pub(super) fn new(
        graph: &'a GraphDefinition,
        type_map: &'a AHashMap<String, String>,
        registry: &'a EmitterRegistry,
    ) -> Self {
        Self {
            graph,
            type_map,
            registry,
            nodes: BTreeMap::new(),
            declared: Vec::new(),
            errors: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub(super) fn build(mut self) -> Result<(FileIr, Vec<Diagnostic>), CompileError> {
        if self.graph.nodes.is_empty() {
            return Err(CompileError::Rejected {
                errors: vec![BuildError::EmptyGraph],
                warnings: Vec::new(),
            });
        }

        let graph = self.graph;
        for def in &graph.nodes {
            self.add_node(def);
        }
        for edge in &graph.edges {
            self.add_edge(edge);
        }
        let task_defs = self.collect_tasks();
        self.check_required_inputs();

        let entry = self
            .declared
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .find(|node| matches!(node.kind, NodeKind::Start(_)))
            .map(|node| node.id.clone())
            .unwrap_or_default();

        let mut file = FileIr::new(graph.name.clone(), entry);
        file.nodes = self.nodes;
        file.task_defs = task_defs;

        if let Err(errors) = file.validate() {
            for error in errors {
                if !self.errors.contains(&error) {
                    self.errors.push(error);
                }
            }
        }

        let warnings = self.diagnostics.warnings;
        if self.errors.is_empty() {
            Ok((file, warnings))
        } else {
            Err(CompileError::Rejected {
                errors: self.errors,
                warnings,
            })
        }
    }

    fn add_node(&mut self, def: &GraphNodeDefinition) {
        if self.declared.contains(&def.id) {
            self.errors.push(BuildError::DuplicateNodeId {
                node_id: def.id.clone(),
            });
            return;
        }
        self.declared.push(def.id.clone());

        let (inputs, settings) = split_settings(def.settings.clone());
        let Some(kind) = self.resolve_kind(def, settings) else {
            self.errors.push(BuildError::UnknownNodeKind {
                node_id: def.id.clone(),
                kind: def.kind.clone(),
            });
            return;
        };

        let mut node = NodeIr::new(def.id.clone(), kind);
        node.inputs = inputs;
        self.nodes.insert(def.id.clone(), node);
    }

    /// Maps the node's kind name through the type mappings to a built-in kind,
    /// or to a custom kind with a registered emitter.
    fn resolve_kind(
        &mut self,
        def: &GraphNodeDefinition,
        settings: serde_json::Value,
    ) -> Option<NodeKind> {
        let name = self
            .type_map
            .get(&def.kind)
            .map(String::as_str)
            .unwrap_or(def.kind.as_str());

        match NodeKind::from_settings(name, settings.clone()) {
            Some(Ok(kind)) => Some(kind),
            Some(Err(e)) => {
                self.diagnostics.warn(
                    Some(&def.id),
                    format!("invalid settings for kind {} ({}); using defaults", name, e),
                );
                NodeKind::with_defaults(name)
            }
            None if self.registry.contains(name) => Some(NodeKind::Custom(CustomNode {
                kind: name.to_string(),
                settings,
            })),
            None => None,
        }
    }

    fn add_edge(&mut self, edge: &GraphEdgeDefinition) {
        for (missing, other) in [(&edge.source, &edge.target), (&edge.target, &edge.source)] {
            if !self.declared.contains(missing) {
                self.errors.push(BuildError::NodeNotFound {
                    missing_node_id: missing.clone(),
                    source_node_id: other.clone(),
                });
                return;
            }
        }
        // Either end failed to build; that node already has an error.
        if !self.nodes.contains_key(&edge.source) || !self.nodes.contains_key(&edge.target) {
            return;
        }

        let Some(source_port) = parse_source_port(&edge.source_port) else {
            self.errors.push(BuildError::InvalidPort {
                node_id: edge.source.clone(),
                port: edge.source_port.clone(),
            });
            return;
        };
        let Some(target_port) = parse_target_port(&edge.target_port) else {
            self.errors.push(BuildError::InvalidPort {
                node_id: edge.target.clone(),
                port: edge.target_port.clone(),
            });
            return;
        };

        match (source_port, target_port) {
            (SourcePort::Flow, TargetPort::Flow) => {
                if let Some(source) = self.nodes.get_mut(&edge.source) {
                    if !source.outputs.contains(&edge.target) {
                        source.outputs.push(edge.target.clone());
                    }
                }
            }
            (SourcePort::Slot(slot), TargetPort::Flow) => {
                if let Some(source) = self.nodes.get_mut(&edge.source) {
                    let children = source.slots.entry(slot.to_string()).or_default();
                    if !children.contains(&edge.target) {
                        children.push(edge.target.clone());
                    }
                }
            }
            (SourcePort::Data(port), TargetPort::Data(input)) => {
                let Some(target) = self.nodes.get_mut(&edge.target) else {
                    return;
                };
                let previous = target
                    .inputs
                    .insert(input.to_string(), PortRef::edge(edge.source.clone(), port));
                if matches!(previous, Some(PortRef::Edge { .. })) {
                    self.diagnostics.warn(
                        Some(&edge.target),
                        format!(
                            "input '{}' has more than one connection; using the one from '{}'",
                            input, edge.source
                        ),
                    );
                }
            }
            _ => self.errors.push(BuildError::InvalidPort {
                node_id: edge.target.clone(),
                port: format!("{} -> {}", edge.source_port, edge.target_port),
            }),
        }
    }

    /// Task definitions in declaration order.
    fn collect_tasks(&mut self) -> Vec<TaskDef> {
        let mut tasks = Vec::new();
        for id in &self.declared {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let NodeKind::TaskDefine(cfg) = &node.kind else {
                continue;
            };

            let Some(name) = cfg
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
            else {
                self.errors.push(BuildError::MissingTaskName {
                    node_id: node.id.clone(),
                });
                continue;
            };

            let entries: Vec<&String> = node.outputs.iter().chain(node.slot("body")).collect();
            if entries.len() > 1 {
                self.diagnostics.warn(
                    Some(&node.id),
                    format!(
                        "task '{}' has more than one body entry; using '{}'",
                        name, entries[0]
                    ),
                );
            }

            tasks.push(TaskDef {
                name: name.to_string(),
                params: cfg.params.clone(),
                entry_node_id: entries.first().map(|e| e.to_string()),
                define_node_id: node.id.clone(),
            });
        }
        tasks
    }

    fn check_required_inputs(&mut self) {
        for id in &self.declared {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let mut seen = AHashSet::new();
            for input in node.kind.required_inputs() {
                if seen.insert(input) && !node.inputs.contains_key(input) {
                    self.diagnostics.warn(
                        Some(&node.id),
                        format!("input '{}' is not connected and has no fallback", input),
                    );
                }
            }
        }
    }
}
