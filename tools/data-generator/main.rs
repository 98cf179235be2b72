use clap::Parser;
use hensei::prelude::*;
use rand::Rng;
use rand::rngs::ThreadRng;
use serde_json::json;
use std::fs;

/// A CLI tool to generate sample flow documents for the hensei editor core
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// Flow identifier for the generated document
    #[arg(long, default_value = "generated")]
    flow_id: String,

    /// The minimum number of agent nodes to generate
    #[arg(long, default_value_t = 2)]
    min: usize,

    /// The maximum number of agent nodes to generate
    #[arg(long, default_value_t = 8)]
    max: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.min > cli.max {
        eprintln!(
            "Error: --min ({}) cannot be greater than --max ({})",
            cli.min, cli.max
        );
        std::process::exit(1);
    }

    println!(
        "Generating a flow document with {} to {} agent node(s)...",
        cli.min, cli.max
    );

    let document = generate_document(&mut rng, &cli.flow_id, cli.min, cli.max);
    let json_output = serde_json::to_string_pretty(&document)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated flow '{}' with {} node(s) and saved it to '{}'",
        document.id,
        document.nodes.len(),
        cli.output
    );

    Ok(())
}

/// Builds a pipeline: a couple of data sources fanning into a chain of
/// agents, ending in a reporter.
fn generate_document(
    rng: &mut ThreadRng,
    flow_id: &str,
    min_agents: usize,
    max_agents: usize,
) -> FlowDocument {
    let sources = ["market-data", "filings", "news-wire"];
    let agent_kinds = [
        "screener",
        "sentiment",
        "risk-model",
        "valuation",
        "macro-watch",
    ];

    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    let source_count = rng.random_range(1..=sources.len());
    for source in sources.iter().take(source_count) {
        nodes.push(plain_node(source));
    }

    let agent_count = rng.random_range(min_agents..=max_agents);
    let mut previous: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
    for index in 0..agent_count {
        let kind = agent_kinds[rng.random_range(0..agent_kinds.len())];
        let id = format!("{kind}-{index}");
        nodes.push(agent_node(rng, &id));
        // Wire every pending upstream output into this agent.
        for (handle, upstream) in previous.iter().enumerate() {
            edges.push(FlowEdge {
                id: None,
                source: upstream.clone(),
                source_handle: Some("output-0".to_string()),
                target: id.clone(),
                target_handle: Some(format!("input-{handle}")),
            });
        }
        previous = vec![id];
    }

    nodes.push(plain_node("reporter"));
    for upstream in &previous {
        edges.push(FlowEdge {
            id: None,
            source: upstream.clone(),
            source_handle: Some("output-0".to_string()),
            target: "reporter".to_string(),
            target_handle: Some("input-0".to_string()),
        });
    }

    FlowDocument {
        id: flow_id.to_string(),
        name: format!("Generated pipeline '{flow_id}'"),
        description: Some("Randomly generated agent pipeline".to_string()),
        nodes,
        edges,
        data: FlowRuntimeData::default(),
    }
}

fn plain_node(id: &str) -> FlowNode {
    FlowNode {
        id: id.to_string(),
        data: NodeData::default(),
        extra: serde_json::Map::new(),
    }
}

/// Roughly half of the generated agents carry persisted configuration.
fn agent_node(rng: &mut ThreadRng, id: &str) -> FlowNode {
    let internal_state = rng.random_bool(0.5).then(|| {
        json!({
            "threshold": rng.random_range(0.1..0.95),
            "lookback_days": rng.random_range(5..250),
        })
    });
    FlowNode {
        id: id.to_string(),
        data: NodeData {
            internal_state,
            extra: serde_json::Map::new(),
        },
        extra: serde_json::Map::new(),
    }
}
