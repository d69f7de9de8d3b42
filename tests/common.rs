//! Common test utilities for building graphs and IR.
use sakusen::emit::{self, EmitterRegistry};
use sakusen::ir::config::EmptyConfig;
use sakusen::prelude::*;
use serde_json::json;

/// Routes compiler logs to the test output. Safe to call more than once.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A `start` node with id `start`.
#[allow(dead_code)]
pub fn start() -> GraphNodeDefinition {
    GraphNodeDefinition::new("start", "start")
}

/// Compiles a graph with default settings, panicking on hard errors.
#[allow(dead_code)]
pub fn compile(graph: GraphDefinition) -> CompiledProgram {
    Compiler::builder(graph)
        .build()
        .compile()
        .expect("graph should compile")
}

/// Compiles `start -> node` where `node` has the given kind and settings.
#[allow(dead_code)]
pub fn compile_single(kind: &str, settings: serde_json::Value) -> CompiledProgram {
    let graph = GraphDefinition::new("single")
        .node(start())
        .node(GraphNodeDefinition::new("node", kind).with_settings(settings))
        .edge(GraphEdgeDefinition::flow("start", "node"));
    compile(graph)
}

/// Emits an IR file with no custom emitters, panicking on hard errors.
#[allow(dead_code)]
pub fn emit(file: &FileIr) -> CompiledProgram {
    emit::emit_file(file, &EmitterRegistry::new()).expect("IR should be valid")
}

/// An IR file containing only the `start` node.
#[allow(dead_code)]
pub fn start_ir(file_id: &str) -> FileIr {
    let mut file = FileIr::new(file_id, "start");
    file.insert(NodeIr::new("start", NodeKind::Start(EmptyConfig {})));
    file
}

/// Number of non-overlapping occurrences of `needle`.
#[allow(dead_code)]
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Position of the first line equal to `line`, panicking when absent.
#[allow(dead_code)]
pub fn line_index(source: &str, line: &str) -> usize {
    source
        .lines()
        .position(|l| l == line)
        .unwrap_or_else(|| panic!("line {:?} not found in:\n{}", line, source))
}

/// Asserts that `source` contains `line` as a whole line.
#[allow(dead_code)]
pub fn assert_line(source: &str, line: &str) {
    assert!(
        source.lines().any(|l| l == line),
        "expected line {:?} in:\n{}",
        line,
        source
    );
}

/// `start -> move` with a configured literal target.
#[allow(dead_code)]
pub fn linear_graph() -> GraphDefinition {
    GraphDefinition::new("linear")
        .node(start())
        .node(
            GraphNodeDefinition::new("move", "action.move")
                .with_settings(json!({ "target": "Game.flags.home" })),
        )
        .edge(GraphEdgeDefinition::flow("start", "move"))
}

/// `start -> if (x>1) { harvest } else { build }`, both arms continuing to `upgrade`.
#[allow(dead_code)]
pub fn branch_graph() -> GraphDefinition {
    GraphDefinition::new("branch")
        .node(start())
        .node(
            GraphNodeDefinition::new("check", "flow.if")
                .with_settings(json!({ "inputs": { "condition": "x>1" } })),
        )
        .node(GraphNodeDefinition::new("harvest", "action.harvest"))
        .node(GraphNodeDefinition::new("build", "action.build"))
        .node(GraphNodeDefinition::new("upgrade", "action.upgrade"))
        .edge(GraphEdgeDefinition::flow("start", "check"))
        .edge(GraphEdgeDefinition::slot("check", "true", "harvest"))
        .edge(GraphEdgeDefinition::slot("check", "false", "build"))
        .edge(GraphEdgeDefinition::flow("harvest", "upgrade"))
        .edge(GraphEdgeDefinition::flow("build", "upgrade"))
}

/// A main graph calling task `refill`, whose body withdraws from storage.
#[allow(dead_code)]
pub fn task_graph() -> GraphDefinition {
    GraphDefinition::new("tasks")
        .node(start())
        .node(
            GraphNodeDefinition::new("call", "task.call").with_settings(json!({ "task": "refill" })),
        )
        .node(GraphNodeDefinition::new("refill", "task.define").with_settings(json!({
            "name": "refill",
            "params": [{ "key": "amount", "type": "number", "default": 50 }]
        })))
        .node(GraphNodeDefinition::new("withdraw", "action.withdraw"))
        .edge(GraphEdgeDefinition::flow("start", "call"))
        .edge(GraphEdgeDefinition::flow("refill", "withdraw"))
}
