//! Tests for IR building: hard errors, warnings, type mappings and custom emitters.
mod common;
use common::*;
use sakusen::emit::literal::js_string;
use sakusen::prelude::*;
use serde_json::json;

fn rejected(graph: GraphDefinition) -> Vec<BuildError> {
    match Compiler::builder(graph).build().compile() {
        Err(CompileError::Rejected { errors, .. }) => errors,
        Err(other) => panic!("expected a rejection, got {}", other),
        Ok(program) => panic!("expected a rejection, got:\n{}", program.source),
    }
}

struct Beacon;

impl NodeEmitter for Beacon {
    fn node_type(&self) -> &str {
        "custom.beacon"
    }

    fn emit(
        &self,
        node: &NodeIr,
        settings: &serde_json::Value,
        walker: &mut Walker<'_>,
    ) -> Continuation {
        let message = settings
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("ping");
        let ctx = walker.ctx();
        ctx.push_statement(format!("console.log({});", js_string(message)));
        ctx.set_value(&node.id, "true");
        Continuation::Outputs
    }
}

#[test]
fn test_empty_graph_is_rejected() {
    assert_eq!(
        rejected(GraphDefinition::new("empty")),
        vec![BuildError::EmptyGraph]
    );
}

#[test]
fn test_missing_and_duplicate_start() {
    let graph = GraphDefinition::new("no-start")
        .node(GraphNodeDefinition::new("harvest", "action.harvest"));
    assert_eq!(rejected(graph), vec![BuildError::MissingEntry]);

    let graph = GraphDefinition::new("two-starts")
        .node(start())
        .node(GraphNodeDefinition::new("again", "start"));
    let errors = rejected(graph);
    assert!(matches!(
        errors.as_slice(),
        [BuildError::DuplicateEntry { .. }]
    ));
}

#[test]
fn test_unknown_kind_and_dangling_edge_are_all_reported() {
    let graph = GraphDefinition::new("broken")
        .node(start())
        .node(GraphNodeDefinition::new("odd", "action.dance"))
        .edge(GraphEdgeDefinition::flow("start", "ghost"));

    let errors = rejected(graph);
    assert_eq!(errors.len(), 2);
    assert!(errors.contains(&BuildError::UnknownNodeKind {
        node_id: "odd".to_string(),
        kind: "action.dance".to_string(),
    }));
    assert!(errors.contains(&BuildError::NodeNotFound {
        missing_node_id: "ghost".to_string(),
        source_node_id: "start".to_string(),
    }));
}

#[test]
fn test_duplicate_node_id() {
    let graph = GraphDefinition::new("dup")
        .node(start())
        .node(GraphNodeDefinition::new("a", "action.harvest"))
        .node(GraphNodeDefinition::new("a", "action.build"));
    assert_eq!(
        rejected(graph),
        vec![BuildError::DuplicateNodeId {
            node_id: "a".to_string()
        }]
    );
}

#[test]
fn test_invalid_ports() {
    let graph = GraphDefinition::new("ports")
        .node(start())
        .node(GraphNodeDefinition::new("a", "action.harvest"))
        .edge(GraphEdgeDefinition::new("start", "weird", "a", "flow"));
    assert_eq!(
        rejected(graph),
        vec![BuildError::InvalidPort {
            node_id: "start".to_string(),
            port: "weird".to_string(),
        }]
    );

    // A data output cannot drive control flow.
    let graph = GraphDefinition::new("mismatch")
        .node(start())
        .node(GraphNodeDefinition::new("a", "action.harvest"))
        .edge(GraphEdgeDefinition::new("start", "data:value", "a", "flow"));
    assert_eq!(
        rejected(graph),
        vec![BuildError::InvalidPort {
            node_id: "a".to_string(),
            port: "data:value -> flow".to_string(),
        }]
    );
}

#[test]
fn test_task_errors() {
    let graph = GraphDefinition::new("tasks")
        .node(start())
        .node(GraphNodeDefinition::new("def", "task.define"))
        .node(
            GraphNodeDefinition::new("call", "task.call").with_settings(json!({ "task": "nope" })),
        )
        .edge(GraphEdgeDefinition::flow("start", "call"));

    let errors = rejected(graph);
    assert!(errors.contains(&BuildError::MissingTaskName {
        node_id: "def".to_string()
    }));
    assert!(errors.contains(&BuildError::UnknownTask {
        node_id: "call".to_string(),
        task: "nope".to_string(),
    }));

    let graph = GraphDefinition::new("dup-tasks")
        .node(start())
        .node(GraphNodeDefinition::new("d1", "task.define").with_settings(json!({ "name": "t" })))
        .node(GraphNodeDefinition::new("d2", "task.define").with_settings(json!({ "name": "t" })));
    assert_eq!(
        rejected(graph),
        vec![BuildError::DuplicateTask {
            name: "t".to_string()
        }]
    );
}

#[test]
fn test_rejection_carries_warnings() {
    let graph = GraphDefinition::new("warned")
        .node(start())
        .node(GraphNodeDefinition::new("check", "flow.if"))
        .node(GraphNodeDefinition::new("odd", "nope"));

    match Compiler::builder(graph).build().compile() {
        Err(err @ CompileError::Rejected { .. }) => {
            let diagnostics = err.diagnostics();
            assert_eq!(diagnostics.errors.len(), 1);
            assert_eq!(diagnostics.warnings.len(), 1);
            assert_eq!(diagnostics.warnings[0].node_id.as_deref(), Some("check"));
        }
        other => panic!("unexpected result {:?}", other.map(|p| p.source)),
    }
}

#[test]
fn test_type_mapping() {
    let graph = GraphDefinition::new("mapped")
        .node(start())
        .node(GraphNodeDefinition::new("g", "gather"))
        .edge(GraphEdgeDefinition::flow("start", "g"));

    let program = Compiler::builder(graph.clone())
        .with_type_mapping("gather", "action.harvest")
        .build()
        .compile()
        .expect("mapped kind should compile");
    assert!(program.source.contains("creep.harvest("));

    // Mapping onto a kind that is not built in is ignored.
    let result = Compiler::builder(graph)
        .with_type_mapping("gather", "action.gather")
        .build()
        .compile();
    assert!(matches!(
        result,
        Err(CompileError::Rejected { ref errors, .. })
            if errors == &vec![BuildError::UnknownNodeKind {
                node_id: "g".to_string(),
                kind: "gather".to_string(),
            }]
    ));
}

#[test]
fn test_custom_emitter() {
    let graph = GraphDefinition::new("custom")
        .node(start())
        .node(
            GraphNodeDefinition::new("beacon", "custom.beacon")
                .with_settings(json!({ "message": "hello" })),
        )
        .node(GraphNodeDefinition::new("upgrade", "action.upgrade"))
        .edge(GraphEdgeDefinition::flow("start", "beacon"))
        .edge(GraphEdgeDefinition::flow("beacon", "upgrade"));

    // Without the emitter the kind is unknown.
    assert!(matches!(
        rejected(graph.clone()).as_slice(),
        [BuildError::UnknownNodeKind { .. }]
    ));

    let program = Compiler::builder(graph)
        .with_custom_emitter(Box::new(Beacon))
        .build()
        .compile()
        .expect("custom kind should compile");
    let beacon = line_index(&program.source, "  console.log(\"hello\");");
    let upgrade = line_index(
        &program.source,
        "  const upgrade_1 = creep.upgradeController(creep.room.controller);",
    );
    assert!(beacon < upgrade);
    assert!(program.warnings.is_empty());
}

#[test]
fn test_invalid_settings_fall_back_to_defaults() {
    let program = compile_single("flow.tick", json!({ "interval": "often" }));
    assert_line(&program.source, "  const tick_1 = Game.time % 1 === 0;");
    assert_eq!(program.warnings.len(), 1);
    assert_eq!(program.warnings[0].node_id.as_deref(), Some("node"));
    assert!(
        program.warnings[0]
            .message
            .starts_with("invalid settings for kind flow.tick")
    );
}

#[test]
fn test_unconnected_required_input_warns() {
    let program = compile_single("flow.if", json!(null));
    assert_line(&program.source, "  if (false) {");
    assert_eq!(program.warnings.len(), 1);
    assert_eq!(
        program.warnings[0].message,
        "input 'condition' is not connected and has no fallback"
    );
}

#[test]
fn test_second_data_connection_wins_with_warning() {
    let graph = GraphDefinition::new("inputs")
        .node(start())
        .node(GraphNodeDefinition::new("a", "query.search"))
        .node(GraphNodeDefinition::new("b", "query.search"))
        .node(GraphNodeDefinition::new("pick", "query.best"))
        .edge(GraphEdgeDefinition::flow("start", "a"))
        .edge(GraphEdgeDefinition::flow("a", "b"))
        .edge(GraphEdgeDefinition::flow("b", "pick"))
        .edge(GraphEdgeDefinition::data("a", "pick", "list"))
        .edge(GraphEdgeDefinition::data("b", "pick", "list"));

    let program = compile(graph);
    assert_line(
        &program.source,
        "  const best_3 = findClosestByRange(creep.pos, found_2);",
    );
    assert_eq!(program.warnings.len(), 1);
    assert_eq!(
        program.warnings[0].message,
        "input 'list' has more than one connection; using the one from 'b'"
    );
}

#[test]
fn test_build_ir_shape() {
    let compiler = Compiler::builder(branch_graph()).build();
    let (file, warnings) = compiler.build_ir().expect("IR should build");
    assert!(warnings.is_empty());
    assert_eq!(file.file_id, "branch");
    assert_eq!(file.entry_node_id, "start");

    let check = file.node("check").expect("check node");
    assert_eq!(check.slot("true"), ["harvest".to_string()]);
    assert_eq!(check.slot("false"), ["build".to_string()]);
    assert!(check.outputs.is_empty());
    assert_eq!(
        check.input("condition"),
        Some(&PortRef::literal(Literal::expr("x>1")))
    );
    assert_eq!(file.node("harvest").map(|n| n.outputs.clone()), Some(vec!["upgrade".to_string()]));
}

#[test]
fn test_task_collection() {
    let compiler = Compiler::builder(task_graph()).build();
    let (file, _) = compiler.build_ir().expect("IR should build");
    assert_eq!(file.task_defs.len(), 1);
    let task = &file.task_defs[0];
    assert_eq!(task.name, "refill");
    assert_eq!(task.entry_node_id.as_deref(), Some("withdraw"));
    assert_eq!(task.define_node_id, "refill");
    assert_eq!(task.params.len(), 1);
    assert_eq!(task.params[0].ty, "number");
}

#[test]
fn test_from_json() {
    let ui = r#"{
        "name": "ui",
        "nodes": [
            { "id": "s", "type": "start", "position": { "x": 0, "y": 0 } },
            { "id": "h", "type": "action.harvest", "data": { "moveCloser": true } }
        ],
        "edges": [
            { "source": "s", "target": "h" }
        ]
    }"#;
    let program = Compiler::from_json(ui)
        .expect("valid snapshot")
        .compile()
        .expect("graph should compile");
    assert_eq!(program.file_id, "ui");
    assert!(program.source.contains("const harvest_2 = creep.harvest(target_1);"));

    assert!(matches!(
        Compiler::from_json("{ not json"),
        Err(CompileError::JsonParseError(_))
    ));
    assert!(matches!(
        Compiler::from_json(r#"{ "nodes": [{ "id": " ", "type": "start" }] }"#),
        Err(CompileError::Conversion(_))
    ));
}

#[test]
fn test_ui_graph_defaults() {
    let ui = UiGraph::from_json(
        r#"{ "nodes": [{ "id": "s", "kind": "start" }], "edges": [{ "source": "s", "sourceHandle": "slot:body", "target": "t" }] }"#,
    )
    .expect("valid snapshot");
    let graph = ui.into_graph().expect("valid graph");
    assert_eq!(graph.name, "main");
    assert_eq!(graph.nodes[0].kind, "start");
    assert_eq!(graph.edges[0].source_port, "slot:body");
    assert_eq!(graph.edges[0].target_port, "flow");
}

#[test]
fn test_compiler_moves_across_threads() {
    fn assert_send<T: Send>(_: &T) {}
    let compiler = Compiler::builder(linear_graph())
        .with_custom_emitter(Box::new(Beacon))
        .build();
    assert_send(&compiler);

    let program = std::thread::spawn(move || compiler.compile())
        .join()
        .expect("compile thread")
        .expect("graph should compile");
    assert_eq!(program.file_id, "linear");
}
