//! Common test utilities for building flow documents and editor sessions.
use hensei::prelude::*;

/// Creates a bare node with no data payload.
#[allow(dead_code)]
pub fn node(id: &str) -> FlowNode {
    FlowNode {
        id: id.to_string(),
        data: NodeData::default(),
        extra: serde_json::Map::new(),
    }
}

/// Creates a node whose persisted configuration is already present.
#[allow(dead_code)]
pub fn node_with_state(id: &str, state: serde_json::Value) -> FlowNode {
    FlowNode {
        id: id.to_string(),
        data: NodeData {
            internal_state: Some(state),
            extra: serde_json::Map::new(),
        },
        extra: serde_json::Map::new(),
    }
}

/// Creates an edge between two nodes on the default handles.
#[allow(dead_code)]
pub fn edge(source: &str, target: &str) -> FlowEdge {
    FlowEdge {
        id: None,
        source: source.to_string(),
        source_handle: Some("output-0".to_string()),
        target: target.to_string(),
        target_handle: Some("input-0".to_string()),
    }
}

/// Creates a small pipeline document: a market-data source feeding a
/// screener agent feeding a reporter agent.
#[allow(dead_code)]
pub fn sample_document(flow_id: &str) -> FlowDocument {
    FlowDocument {
        id: flow_id.to_string(),
        name: format!("Pipeline {flow_id}"),
        description: None,
        nodes: vec![node("market-data"), node("screener"), node("reporter")],
        edges: vec![edge("market-data", "screener"), edge("screener", "reporter")],
        data: FlowRuntimeData::default(),
    }
}

/// Like [`sample_document`], but the screener node carries persisted
/// configuration.
#[allow(dead_code)]
pub fn document_with_state(flow_id: &str) -> FlowDocument {
    let mut document = sample_document(flow_id);
    document.nodes[1] = node_with_state(
        "screener",
        serde_json::json!({ "threshold": 0.75, "universe": "sp500" }),
    );
    document
}

/// Builds a session over in-memory collaborators, seeded with `documents`.
#[allow(dead_code)]
pub fn seeded_session(
    documents: Vec<FlowDocument>,
) -> EditorSession<BufferCanvas, MemoryFlowStore> {
    let mut store = MemoryFlowStore::new();
    for document in documents {
        store.insert(document);
    }
    EditorSession::builder(BufferCanvas::new(), store).build()
}
