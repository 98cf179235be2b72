use clap::{Parser, Subcommand};
use hensei::prelude::*;
use serde_json::json;

/// Editor-state engine CLI: inspect flow documents and demo a session
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a flow document JSON file
    Inspect {
        /// Path to the flow document JSON file
        path: String,
    },
    /// Run a scripted open -> edit -> undo -> save session in memory
    Demo {
        /// Path to a flow document JSON file to seed the session with
        path: Option<String>,
        /// Maximum number of undo snapshots to keep
        #[arg(long, default_value_t = 50)]
        history: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Inspect { path } => inspect(&path),
        Command::Demo { path, history } => demo(path.as_deref(), history),
    }
}

fn inspect(path: &str) -> Result<()> {
    let document = FlowDocument::from_file(path)?;
    println!("Flow '{}' ({})", document.name, document.id);
    if let Some(description) = &document.description {
        println!("  {description}");
    }
    println!(
        "  {} node(s), {} edge(s)",
        document.nodes.len(),
        document.edges.len()
    );
    for node in &document.nodes {
        let state = if node.data.internal_state.is_some() {
            "configured"
        } else {
            "no internal state"
        };
        println!("  - {} [{}]", node.id, state);
    }
    if document.data.node_context_data.is_some() {
        println!("  carries persisted node context data");
    }
    Ok(())
}

fn demo(path: Option<&str>, history: usize) -> Result<()> {
    let document = match path {
        Some(path) => {
            println!("Loading flow document from: {path}");
            FlowDocument::from_file(path)?
        }
        None => {
            println!("No flow document provided. Using a built-in sample.");
            sample_document()
        }
    };
    let flow_id = document.id.clone();

    let mut store = MemoryFlowStore::new();
    store.insert(document.clone());
    let mut session = EditorSession::builder(BufferCanvas::new(), store)
        .with_history_capacity(history)
        .build();

    println!("\nOpening flow '{flow_id}'...");
    session.open_flow_tab(document)?;
    session.notify_canvas_changed();
    println!("Canvas holds {} node(s)", session.canvas().nodes().len());

    println!("Adding a 'scratch-note' node...");
    let mut nodes = session.canvas().nodes();
    nodes.push(FlowNode {
        id: "scratch-note".to_string(),
        data: NodeData::default(),
        extra: serde_json::Map::new(),
    });
    session.canvas_mut().set_nodes(nodes);
    session.notify_canvas_changed();

    println!("Undoing the edit...");
    session.undo();
    session.notify_canvas_changed();
    session.run_deferred();
    println!("Canvas holds {} node(s)", session.canvas().nodes().len());

    println!("Redoing and saving...");
    session.redo();
    session.notify_canvas_changed();
    session.run_deferred();
    session
        .node_state_mut()
        .set("scratch-note", json!({ "pinned": true }));
    let saved = session.save_active_flow()?;

    println!("\nSaved document:");
    println!("{}", serde_json::to_string_pretty(&saved)?);
    Ok(())
}

fn sample_document() -> FlowDocument {
    FlowDocument {
        id: "demo".to_string(),
        name: "Demo pipeline".to_string(),
        description: Some("Market data feeding a screener agent".to_string()),
        nodes: vec![
            FlowNode {
                id: "market-data".to_string(),
                data: NodeData::default(),
                extra: serde_json::Map::new(),
            },
            FlowNode {
                id: "screener".to_string(),
                data: NodeData {
                    internal_state: Some(json!({ "threshold": 0.75 })),
                    extra: serde_json::Map::new(),
                },
                extra: serde_json::Map::new(),
            },
        ],
        edges: vec![FlowEdge {
            id: None,
            source: "market-data".to_string(),
            source_handle: Some("output-0".to_string()),
            target: "screener".to_string(),
            target_handle: Some("input-0".to_string()),
        }],
        data: FlowRuntimeData::default(),
    }
}
