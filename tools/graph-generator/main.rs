use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use sakusen::graph::Position;
use sakusen::ui::{UiEdge, UiGraph, UiNode};
use serde_json::json;
use std::fs;

/// A CLI tool to generate random editor graphs for stress testing the compiler
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_graph.json")]
    output: String,

    /// Number of nodes to generate, including the start node
    #[arg(short, long, default_value_t = 50)]
    nodes: usize,

    /// Probability of adding a back edge (a cycle) after each node
    #[arg(long, default_value_t = 0.0)]
    cycles: f64,

    /// Seed for reproducible graphs
    #[arg(long)]
    seed: Option<u64>,
}

/// Kinds the generator places, with settings that make each one compile cleanly.
const KINDS: &[&str] = &[
    "action.harvest",
    "action.build",
    "action.upgrade",
    "action.transfer",
    "action.withdraw",
    "query.search",
    "query.best",
    "memory.read",
    "memory.write",
    "flow.if",
    "flow.tick",
    "flow.loop",
];

fn settings_for(kind: &str, rng: &mut StdRng) -> serde_json::Value {
    match kind {
        "action.harvest" | "action.build" => json!({ "moveCloser": rng.random_bool(0.5) }),
        "action.transfer" => json!({ "fallback": ["none", "move", "drop"].choose(rng) }),
        "query.search" => json!({
            "find": "FIND_STRUCTURES",
            "filters": [{ "field": "structureType", "op": "eq", "value": "STRUCTURE_EXTENSION" }],
            "limit": rng.random_range(1..10),
        }),
        "query.best" => json!({
            "strategy": ["range", "path"].choose(rng),
            "inputs": { "list": "creep.room.find(FIND_SOURCES)" },
        }),
        "memory.read" => json!({ "scope": "actor", "path": "state.mode", "default": "\"idle\"" }),
        "memory.write" => json!({ "scope": "actor", "path": "state.tick", "value": "Game.time" }),
        "flow.if" => json!({ "inputs": { "condition": "creep.store.getFreeCapacity() > 0" } }),
        "flow.tick" => json!({ "interval": rng.random_range(1..20) }),
        "flow.loop" => json!({ "max": rng.random_range(1..5) }),
        _ => json!({}),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    if cli.nodes == 0 {
        eprintln!("Error: --nodes must be at least 1");
        std::process::exit(1);
    }
    if !(0.0..=1.0).contains(&cli.cycles) {
        eprintln!("Error: --cycles ({}) must be between 0 and 1", cli.cycles);
        std::process::exit(1);
    }

    println!(
        "Generating a graph with {} node(s) (cycle probability {})...",
        cli.nodes, cli.cycles
    );

    let mut graph = UiGraph {
        name: "generated".to_string(),
        nodes: vec![UiNode {
            id: "n0".to_string(),
            node_type: "start".to_string(),
            position: Some(Position { x: 0.0, y: 0.0 }),
            data: json!({}),
        }],
        edges: Vec::new(),
    };
    // (node id, handle) pairs that can still take a successor.
    let mut open: Vec<(String, String)> = vec![("n0".to_string(), "flow".to_string())];
    let mut queries: Vec<String> = Vec::new();
    let mut back_edges = 0;

    for i in 1..cli.nodes {
        let id = format!("n{}", i);
        let kind = *KINDS.choose(&mut rng).unwrap_or(&"action.harvest");

        let (parent, handle) = open.swap_remove(rng.random_range(0..open.len()));
        graph.edges.push(UiEdge {
            source: parent,
            source_handle: Some(handle),
            target: id.clone(),
            target_handle: Some("flow".to_string()),
        });

        if kind.starts_with("action.") && !queries.is_empty() && rng.random_bool(0.3) {
            if let Some(query) = queries.choose(&mut rng) {
                graph.edges.push(UiEdge {
                    source: query.clone(),
                    source_handle: Some("data:value".to_string()),
                    target: id.clone(),
                    target_handle: Some("data:target".to_string()),
                });
            }
        }

        match kind {
            "flow.if" => {
                open.push((id.clone(), "slot:true".to_string()));
                open.push((id.clone(), "slot:false".to_string()));
            }
            "flow.tick" | "flow.loop" => open.push((id.clone(), "slot:body".to_string())),
            "query.search" | "query.best" => queries.push(id.clone()),
            _ => {}
        }
        open.push((id.clone(), "flow".to_string()));

        if i > 1 && rng.random_bool(cli.cycles) {
            let target = format!("n{}", rng.random_range(1..i));
            graph.edges.push(UiEdge {
                source: id.clone(),
                source_handle: Some("flow".to_string()),
                target,
                target_handle: Some("flow".to_string()),
            });
            back_edges += 1;
        }

        graph.nodes.push(UiNode {
            id,
            node_type: kind.to_string(),
            position: Some(Position {
                x: (i % 10) as f64 * 220.0,
                y: (i / 10) as f64 * 140.0,
            }),
            data: settings_for(kind, &mut rng),
        });
    }

    fs::write(&cli.output, graph.to_json()?)?;

    println!(
        "Successfully generated {} node(s), {} edge(s) ({} back edge(s)) and saved them to '{}'",
        graph.nodes.len(),
        graph.edges.len(),
        back_edges,
        cli.output
    );

    Ok(())
}
