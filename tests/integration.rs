//! Integration tests for sakusen
//!
//! End-to-end tests from graph definitions to emitted programs and artifacts.
//!
mod common;
use common::*;
use sakusen::ir::config::{TaskCallConfig, TaskParam, WithdrawConfig};
use sakusen::ir::{BUILTIN_KINDS, TaskDef};
use sakusen::prelude::*;
use serde_json::json;
use std::fs;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_linear_chain_program() {
        init_tracing();
        let program = compile(linear_graph());
        let expected = "\
// @generated by sakusen from graph \"linear\" -- do not edit

import { travelTo } from \"./lib/movement\";

export function run(creep) {
  const move_1 = travelTo(creep, Game.flags.home);
}
";
        assert_eq!(program.source, expected);
        assert_eq!(program.file_id, "linear");
        assert!(!program.has_warnings());
    }

    #[test]
    fn test_branch_program() {
        init_tracing();
        let program = compile(branch_graph());
        let expected = "\
// @generated by sakusen from graph \"branch\" -- do not edit

export function run(creep) {
  if (x>1) {
    const harvest_1 = creep.harvest(creep.pos.findClosestByRange(FIND_SOURCES_ACTIVE));
  } else {
    const build_2 = creep.build(creep.pos.findClosestByRange(FIND_CONSTRUCTION_SITES));
  }
  const upgrade_3 = creep.upgradeController(creep.room.controller);
}
";
        assert_eq!(program.source, expected);
        assert!(program.warnings.is_empty());
    }

    #[test]
    fn test_unresolved_input_becomes_undefined() {
        let mut file = start_ir("unresolved");
        file.nodes
            .get_mut("start")
            .expect("start node")
            .outputs
            .push("harvest".to_string());
        file.insert(
            NodeIr::new("harvest", NodeKind::with_defaults("action.harvest").unwrap())
                .with_input("target", PortRef::edge("ghost", "value")),
        );

        let program = emit(&file);
        assert_line(&program.source, "  const harvest_1 = creep.harvest(undefined);");
        assert_eq!(program.warnings.len(), 1);
        assert_eq!(program.warnings[0].node_id.as_deref(), Some("harvest"));
        assert!(program.warnings[0].message.contains("ghost"));
    }

    #[test]
    fn test_task_program() {
        init_tracing();
        let program = compile(task_graph());
        let expected = "\
// @generated by sakusen from graph \"tasks\" -- do not edit

import { travelTo } from \"./lib/movement\";

export function run(creep) {
  const task_1 = task_refill({ creep: creep });
}

function task_refill(args) {
  // params: amount: number = 50
  const withdraw_1 = args.creep.withdraw(args.creep.room.storage, RESOURCE_ENERGY);
  if (withdraw_1 === ERR_NOT_IN_RANGE) {
    travelTo(args.creep, args.creep.room.storage);
  }
}
";
        assert_eq!(program.source, expected);
        assert!(program.warnings.is_empty());
    }

    #[test]
    fn test_task_from_ir() {
        let mut file = start_ir("ir-tasks");
        file.nodes
            .get_mut("start")
            .expect("start node")
            .outputs
            .push("call".to_string());
        file.insert(NodeIr::new(
            "call",
            NodeKind::TaskCall(TaskCallConfig {
                task: Some("refill energy".to_string()),
                args: Literal::from(json!({ "amount": 20 })),
            }),
        ));
        file.insert(NodeIr::new("def", NodeKind::TaskDefine(Default::default())));
        file.insert(NodeIr::new(
            "body",
            NodeKind::Withdraw(WithdrawConfig::default()),
        ));
        file.task_defs.push(TaskDef {
            name: "refill energy".to_string(),
            params: vec![TaskParam {
                key: "amount".to_string(),
                ty: "number".to_string(),
                default: None,
            }],
            entry_node_id: Some("body".to_string()),
            define_node_id: "def".to_string(),
        });

        let source = emit(&file).source;
        assert_line(&source, "  const task_1 = task_refill_energy({ creep: creep, amount: 20 });");
        assert_line(&source, "function task_refill_energy(args) {");
        assert_line(&source, "  // params: amount: number");
        assert!(line_index(&source, "export function run(creep) {")
            < line_index(&source, "function task_refill_energy(args) {"));
    }

    #[test]
    fn test_task_without_body_warns() {
        let mut file = start_ir("empty-task");
        file.insert(NodeIr::new("def", NodeKind::TaskDefine(Default::default())));
        file.task_defs.push(TaskDef {
            name: "idle".to_string(),
            params: Vec::new(),
            entry_node_id: None,
            define_node_id: "def".to_string(),
        });

        let program = emit(&file);
        assert_eq!(count(&program.source, "// no statements"), 2);
        assert_line(&program.source, "function task_idle(args) {");
        assert_eq!(program.warnings.len(), 1);
        assert_eq!(program.warnings[0].node_id.as_deref(), Some("def"));
        assert_eq!(program.warnings[0].message, "task 'idle' has an empty body");
    }

    #[test]
    fn test_imports_shared_between_main_and_tasks() {
        let graph = task_graph()
            .node(
                GraphNodeDefinition::new("walk", "action.move")
                    .with_settings(json!({ "target": "Game.flags.home", "range": 2 })),
            )
            .edge(GraphEdgeDefinition::flow("call", "walk"));

        let program = compile(graph);
        assert_eq!(count(&program.source, "import "), 1);
        assert_line(&program.source, "import { travelTo } from \"./lib/movement\";");
        assert_line(
            &program.source,
            "  const move_2 = travelTo(creep, Game.flags.home, { range: 2 });",
        );
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let graph = || {
            task_graph()
                .node(GraphNodeDefinition::new("towers", "structure.tower"))
                .node(
                    GraphNodeDefinition::new("state", "memory.write")
                        .with_settings(json!({ "scope": "room", "path": "a.b", "value": "1" })),
                )
                .edge(GraphEdgeDefinition::flow("call", "towers"))
                .edge(GraphEdgeDefinition::flow("towers", "state"))
        };
        let first = compile(graph());
        let second = compile(graph());
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_builtin_kind_compiles_with_defaults() {
        for kind in BUILTIN_KINDS {
            if matches!(*kind, "start" | "task.define" | "task.call") {
                continue;
            }
            let program = compile_single(kind, serde_json::Value::Null);
            assert!(
                program.source.starts_with("// @generated by sakusen"),
                "kind {} produced:\n{}",
                kind,
                program.source
            );
            assert!(program.source.ends_with("}\n"));
        }
    }

    #[test]
    fn test_artifact_round_trip() {
        let program = compile(branch_graph());
        let path = std::env::temp_dir().join(format!("sakusen_artifact_{}.bin", std::process::id()));
        let path = path.to_str().expect("utf-8 temp path").to_string();

        program.save(&path).expect("artifact should save");
        let loaded = CompiledProgram::from_file(&path).expect("artifact should load");
        assert_eq!(loaded, program);
        fs::remove_file(&path).ok();

        let bytes = program.to_bytes().expect("artifact should serialize");
        assert_eq!(CompiledProgram::from_bytes(&bytes).expect("decodes"), program);
        assert!(CompiledProgram::from_bytes(&[0xff, 0xff, 0xff]).is_err());
        assert!(CompiledProgram::from_file("/nonexistent/sakusen.bin").is_err());
    }

    #[test]
    fn test_ir_serializes_to_json() {
        let compiler = Compiler::builder(linear_graph()).build();
        let (file, _) = compiler.build_ir().expect("IR should build");
        let text = serde_json::to_string(&file).expect("IR serializes");
        let back: FileIr = serde_json::from_str(&text).expect("IR deserializes");
        assert_eq!(back, file);
    }

    #[test]
    fn test_start_only_graph() {
        let program = compile(GraphDefinition::new("idle").node(start()));
        assert_eq!(
            program.source,
            "// @generated by sakusen from graph \"idle\" -- do not edit\n\nexport function run(creep) {\n  // no statements\n}\n"
        );
    }
}
