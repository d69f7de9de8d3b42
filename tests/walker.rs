//! Traversal tests: emission order, join points, cycles and unknown kinds.
mod common;
use common::*;
use sakusen::ir::config::{EmptyConfig, LoopConfig, LoopMode};
use sakusen::ir::CustomNode;
use sakusen::prelude::*;

fn kind(name: &str) -> NodeKind {
    NodeKind::with_defaults(name).expect("built-in kind")
}

fn start_to(file: &mut FileIr, next: &str) {
    file.insert(NodeIr::new("start", NodeKind::Start(EmptyConfig {})).with_output(next));
}

#[test]
fn test_diamond_emits_join_once_after_branches() {
    let mut file = FileIr::new("diamond", "start");
    start_to(&mut file, "check");
    file.insert(
        NodeIr::new("check", kind("flow.if"))
            .with_input("condition", PortRef::literal("x > 1"))
            .with_slot("true", &["harvest"])
            .with_slot("false", &["build"]),
    );
    file.insert(NodeIr::new("harvest", kind("action.harvest")).with_output("upgrade"));
    file.insert(NodeIr::new("build", kind("action.build")).with_output("upgrade"));
    file.insert(NodeIr::new("upgrade", kind("action.upgrade")));

    let program = emit(&file);
    let source = &program.source;
    assert_eq!(count(source, "upgradeController"), 1);

    let open = line_index(source, "  if (x > 1) {");
    let harvest = line_index(
        source,
        "    const harvest_1 = creep.harvest(creep.pos.findClosestByRange(FIND_SOURCES_ACTIVE));",
    );
    let other = line_index(source, "  } else {");
    let build = line_index(
        source,
        "    const build_2 = creep.build(creep.pos.findClosestByRange(FIND_CONSTRUCTION_SITES));",
    );
    let close = line_index(source, "  }");
    let join = line_index(
        source,
        "  const upgrade_3 = creep.upgradeController(creep.room.controller);",
    );
    assert!(open < harvest && harvest < other && other < build);
    assert!(build < close && close < join);
    assert!(program.warnings.is_empty());
}

#[test]
fn test_control_outputs_follow_the_construct() {
    let mut file = FileIr::new("after", "start");
    start_to(&mut file, "check");
    file.insert(
        NodeIr::new("check", kind("flow.if"))
            .with_input("condition", PortRef::literal("ready"))
            .with_slot("true", &["harvest"])
            .with_output("upgrade"),
    );
    file.insert(NodeIr::new("harvest", kind("action.harvest")).with_output("upgrade"));
    file.insert(NodeIr::new("upgrade", kind("action.upgrade")));

    let source = emit(&file).source;
    assert!(!source.contains("else"));
    assert_eq!(count(&source, "upgradeController"), 1);
    assert!(line_index(&source, "  }") < line_index(
        &source,
        "  const upgrade_2 = creep.upgradeController(creep.room.controller);"
    ));
}

#[test]
fn test_cycle_terminates() {
    let mut file = FileIr::new("cycle", "start");
    start_to(&mut file, "a");
    file.insert(NodeIr::new("a", kind("action.harvest")).with_output("b"));
    file.insert(NodeIr::new("b", kind("action.upgrade")).with_output("a"));

    let source = emit(&file).source;
    assert_eq!(count(&source, "creep.harvest("), 1);
    assert_eq!(count(&source, "creep.upgradeController("), 1);
}

#[test]
fn test_missing_output_is_skipped() {
    let mut file = FileIr::new("missing", "start");
    start_to(&mut file, "ghost");

    let program = emit(&file);
    assert_line(&program.source, "  // no statements");
    assert!(program.warnings.is_empty());
}

#[test]
fn test_unknown_custom_kind_warns_and_continues() {
    let mut file = FileIr::new("custom", "start");
    start_to(&mut file, "mystery");
    file.insert(
        NodeIr::new(
            "mystery",
            NodeKind::Custom(CustomNode {
                kind: "custom.mystery".to_string(),
                settings: serde_json::Value::Null,
            }),
        )
        .with_output("upgrade"),
    );
    file.insert(NodeIr::new("upgrade", kind("action.upgrade")));

    let program = emit(&file);
    assert_eq!(program.warnings.len(), 1);
    assert_eq!(program.warnings[0].node_id.as_deref(), Some("mystery"));
    assert_eq!(
        program.warnings[0].message,
        "no emitter implemented for kind custom.mystery"
    );
    assert!(program.source.contains("creep.upgradeController("));
}

#[test]
fn test_fanout_branches_in_name_order() {
    let mut file = FileIr::new("fanout", "start");
    start_to(&mut file, "split");
    file.insert(
        NodeIr::new("split", kind("flow.fanout"))
            .with_slot("b", &["upgrade"])
            .with_slot("a", &["harvest"]),
    );
    file.insert(NodeIr::new("harvest", kind("action.harvest")));
    file.insert(NodeIr::new("upgrade", kind("action.upgrade")));

    let source = emit(&file).source;
    let a = line_index(&source, "  // branch: a");
    let b = line_index(&source, "  // branch: b");
    assert!(a < b);
    assert!(line_index(&source, "  const harvest_1 = creep.harvest(creep.pos.findClosestByRange(FIND_SOURCES_ACTIVE));") < b);
}

#[test]
fn test_conditional_loop_is_bounded() {
    let mut file = FileIr::new("loop", "start");
    start_to(&mut file, "repeat");
    file.insert(
        NodeIr::new(
            "repeat",
            NodeKind::Loop(LoopConfig {
                mode: LoopMode::Conditional,
                max: None,
                iterator: None,
            }),
        )
        .with_slot("body", &["harvest"])
        .with_slot("else", &["upgrade"]),
    );
    file.insert(NodeIr::new("harvest", kind("action.harvest")));
    file.insert(NodeIr::new("upgrade", kind("action.upgrade")));

    let source = emit(&file).source;
    assert_line(&source, "  let ran_1 = false;");
    assert_line(&source, "  let guard_2 = 0;");
    assert_line(&source, "  while (true) {");
    assert_line(&source, "    if (guard_2 >= 10) break;");
    assert_line(&source, "    guard_2++;");
    assert_line(&source, "    ran_1 = true;");
    assert_line(&source, "  if (!ran_1) {");
}

#[test]
fn test_nodes_after_return_are_not_emitted() {
    let mut file = FileIr::new("return", "start");
    start_to(&mut file, "done");
    file.insert(NodeIr::new("done", kind("flow.return")).with_output("upgrade"));
    file.insert(NodeIr::new("upgrade", kind("action.upgrade")));

    let source = emit(&file).source;
    assert_line(&source, "  return;");
    assert!(!source.contains("upgradeController"));
}

#[test]
fn test_data_input_resolves_to_producer_value() {
    let mut file = FileIr::new("data", "start");
    start_to(&mut file, "find");
    file.insert(NodeIr::new("find", kind("query.search")).with_output("pick"));
    file.insert(
        NodeIr::new("pick", kind("query.best"))
            .with_input("list", PortRef::edge("find", "value")),
    );

    let program = emit(&file);
    assert_line(&program.source, "  const found_1 = creep.room.find(FIND_STRUCTURES);");
    assert_line(
        &program.source,
        "  const best_2 = findClosestByRange(creep.pos, found_1);",
    );
    assert!(program.warnings.is_empty());
}

#[test]
fn test_node_inside_nested_slot_stays_there() {
    let mut file = FileIr::new("nested", "start");
    start_to(&mut file, "check");
    file.insert(
        NodeIr::new("check", kind("flow.if"))
            .with_input("condition", PortRef::literal("x"))
            .with_slot("true", &["repeat"])
            .with_slot("false", &["upgrade"]),
    );
    file.insert(
        NodeIr::new(
            "repeat",
            NodeKind::Loop(LoopConfig {
                mode: LoopMode::Counted,
                max: Some(3),
                iterator: None,
            }),
        )
        .with_slot("body", &["upgrade"]),
    );
    file.insert(NodeIr::new("upgrade", kind("action.upgrade")));

    let source = emit(&file).source;
    assert_eq!(count(&source, "upgradeController"), 1);
    let head = line_index(&source, "    for (let i_2 = 0; i_2 < 3; i_2++) {");
    let body = line_index(
        &source,
        "      const upgrade_3 = creep.upgradeController(creep.room.controller);",
    );
    let other = line_index(&source, "  } else {");
    assert!(head < body && body < other);
}

#[test]
fn test_merge_continues_once() {
    let mut file = FileIr::new("merge", "start");
    start_to(&mut file, "check");
    file.insert(
        NodeIr::new("check", kind("flow.if"))
            .with_input("condition", PortRef::literal("x"))
            .with_slot("true", &["harvest"])
            .with_slot("false", &["build"]),
    );
    file.insert(NodeIr::new("harvest", kind("action.harvest")).with_output("merge"));
    file.insert(NodeIr::new("build", kind("action.build")).with_output("merge"));
    file.insert(NodeIr::new("merge", kind("flow.merge")).with_output("upgrade"));
    file.insert(NodeIr::new("upgrade", kind("action.upgrade")));

    let program = emit(&file);
    let source = &program.source;
    assert_eq!(count(source, "upgradeController"), 1);
    assert!(line_index(source, "  }") < line_index(
        source,
        "  const upgrade_3 = creep.upgradeController(creep.room.controller);"
    ));
    assert!(program.warnings.is_empty());
}

#[test]
fn test_break_and_continue_end_the_chain() {
    for (jump, statement) in [("flow.break", "break;"), ("flow.continue", "continue;")] {
        let mut file = FileIr::new("jump", "start");
        start_to(&mut file, "repeat");
        file.insert(
            NodeIr::new("repeat", kind("flow.loop")).with_slot("body", &["harvest"]),
        );
        file.insert(NodeIr::new("harvest", kind("action.harvest")).with_output("jump"));
        file.insert(NodeIr::new("jump", kind(jump)).with_output("upgrade"));
        file.insert(NodeIr::new("upgrade", kind("action.upgrade")));

        let source = emit(&file).source;
        let harvest = line_index(
            &source,
            "    const harvest_3 = creep.harvest(creep.pos.findClosestByRange(FIND_SOURCES_ACTIVE));",
        );
        let jumped = line_index(&source, &format!("    {}", statement));
        assert!(harvest < jumped);
        assert!(!source.contains("upgradeController"), "{}:\n{}", jump, source);
    }
}
