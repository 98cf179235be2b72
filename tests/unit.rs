//! Unit tests for core hensei functionality.
mod common;
use common::*;
use hensei::prelude::*;
use serde_json::json;

#[test]
fn test_error_display() {
    let err = LifecycleError::FlowUnavailable {
        flow_id: "f1".to_string(),
        reason: "connection refused".to_string(),
    };
    assert!(err.to_string().contains("f1"));
    assert!(err.to_string().contains("connection refused"));

    let storage_err = StorageError::FlowNotFound("f2".to_string());
    assert!(storage_err.to_string().contains("f2"));

    let archive_err = ArchiveError::Io {
        path: "/tmp/workspace.bin".to_string(),
        reason: "permission denied".to_string(),
    };
    assert!(archive_err.to_string().contains("/tmp/workspace.bin"));
    assert!(archive_err.to_string().contains("permission denied"));
}

#[test]
fn test_document_round_trip_preserves_opaque_fields() {
    let json = r#"{
        "id": "f1",
        "name": "Screening pipeline",
        "nodes": [
            {
                "id": "screener",
                "type": "agentNode",
                "position": { "x": 120.0, "y": 40.0 },
                "data": { "label": "Screener", "internal_state": { "threshold": 0.5 } }
            }
        ],
        "edges": [
            { "source": "a", "sourceHandle": "output-0", "target": "b", "targetHandle": "input-0" }
        ],
        "data": { "nodeContextData": { "flow_id": "f1", "entries": {} } }
    }"#;

    let document = FlowDocument::from_json(json).unwrap();
    assert_eq!(document.nodes[0].extra["type"], json!("agentNode"));
    assert_eq!(document.nodes[0].data.extra["label"], json!("Screener"));
    assert_eq!(
        document.nodes[0].data.internal_state,
        Some(json!({ "threshold": 0.5 }))
    );
    assert_eq!(document.edges[0].source_handle.as_deref(), Some("output-0"));

    let round_tripped = serde_json::to_value(&document).unwrap();
    assert_eq!(round_tripped["nodes"][0]["position"]["x"], json!(120.0));
    assert_eq!(
        round_tripped["edges"][0]["sourceHandle"],
        json!("output-0")
    );
    assert_eq!(
        round_tripped["data"]["nodeContextData"]["flow_id"],
        json!("f1")
    );
}

#[test]
#[should_panic(expected = "NodeStateStore used before set_current_flow")]
fn test_node_state_store_panics_unscoped() {
    let store = NodeStateStore::new();
    store.get("screener");
}

#[test]
#[should_panic(expected = "NodeContextStore used before set_current_flow")]
fn test_node_context_store_panics_unscoped() {
    let mut store = NodeContextStore::new();
    store.set("screener", NodeContext::default());
}

#[test]
fn test_node_state_scopes_do_not_mix() {
    let mut store = NodeStateStore::new();
    store.set_current_flow("f1");
    store.set("screener", json!({ "threshold": 1 }));

    store.set_current_flow("f2");
    assert!(store.get("screener").is_none());
    store.set("screener", json!({ "threshold": 2 }));

    // Coming back to the first flow sees its own entry, untouched.
    store.set_current_flow("f1");
    assert_eq!(store.get("screener"), Some(&json!({ "threshold": 1 })));

    store.clear_current();
    assert!(store.is_empty());
    store.set_current_flow("f2");
    assert_eq!(store.get("screener"), Some(&json!({ "threshold": 2 })));
}

#[test]
fn test_context_store_export_import_reset() {
    let mut store = NodeContextStore::new();
    store.set_current_flow("f1");
    let context = NodeContext {
        status: AgentStatus::Failed,
        messages: vec!["timeout".to_string()],
        output: None,
    };
    store.set("screener", context.clone());

    let blob = store.export_all("f1");
    assert_eq!(blob.flow_id, "f1");
    assert_eq!(blob.entries.get("screener"), Some(&context));

    // Exporting an unknown flow yields an empty blob, not an error.
    assert!(store.export_all(NO_FLOW_ID).entries.is_empty());

    store.clear_current();
    assert!(store.is_empty());
    store.import_all(blob);
    assert_eq!(store.get("screener"), Some(&context));

    store.reset_all();
    assert!(store.is_empty());
    assert_eq!(store.current_flow(), Some("f1"));
}

#[test]
fn test_context_blob_serde_round_trip() {
    let mut blob = ContextBlob {
        flow_id: "f1".to_string(),
        entries: Default::default(),
    };
    blob.entries.insert(
        "reporter".to_string(),
        NodeContext {
            status: AgentStatus::Running,
            messages: vec!["rendering".to_string()],
            output: Some(json!({ "pages": 3 })),
        },
    );

    let value = serde_json::to_value(&blob).unwrap();
    assert_eq!(value["entries"]["reporter"]["status"], json!("running"));
    let decoded: ContextBlob = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, blob);
}

#[test]
fn test_workspace_archive_round_trips_bytes() {
    let mut registry = TabRegistry::new();
    registry.open(TabRequest::flow(&document_with_state("f1")));
    registry.open(TabRequest::settings());
    registry.set_active("flow-f1");

    let archive = WorkspaceArchive::capture(&registry).unwrap();
    let bytes = archive.to_bytes().unwrap();
    let restored = WorkspaceArchive::from_bytes(&bytes)
        .unwrap()
        .restore()
        .unwrap();

    assert_eq!(restored.tabs(), registry.tabs());
    assert_eq!(restored.active_id(), Some("flow-f1"));
}

#[test]
fn test_workspace_archive_file_round_trip() {
    let mut registry = TabRegistry::new();
    registry.open(TabRequest::flow(&sample_document("f1")));

    let path = std::env::temp_dir().join("hensei-archive-test.bin");
    let path = path.to_str().unwrap().to_string();
    let archive = WorkspaceArchive::capture(&registry).unwrap();
    archive.save(&path).unwrap();

    let restored = WorkspaceArchive::from_file(&path).unwrap().restore().unwrap();
    assert_eq!(restored.tabs(), registry.tabs());
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_archive_rejects_garbage_bytes() {
    assert!(matches!(
        WorkspaceArchive::from_bytes(&[0xff, 0x00, 0x13, 0x37]),
        Err(ArchiveError::Decode(_))
    ));
}
