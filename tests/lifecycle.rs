//! Tests for the flow load/save lifecycle.
mod common;
use common::*;
use hensei::prelude::*;
use serde_json::json;

/// A store that is unreachable: every call fails.
struct OfflineStore;

impl FlowStore for OfflineStore {
    fn fetch(&self, flow_id: &str) -> std::result::Result<FlowDocument, StorageError> {
        Err(StorageError::Backend(format!(
            "connection refused fetching '{flow_id}'"
        )))
    }

    fn update(&mut self, flow_id: &str, _patch: FlowPatch) -> std::result::Result<FlowDocument, StorageError> {
        Err(StorageError::Backend(format!(
            "connection refused updating '{flow_id}'"
        )))
    }
}

/// Fetches normally, refuses every update.
struct ReadOnlyStore {
    inner: MemoryFlowStore,
}

impl FlowStore for ReadOnlyStore {
    fn fetch(&self, flow_id: &str) -> std::result::Result<FlowDocument, StorageError> {
        self.inner.fetch(flow_id)
    }

    fn update(&mut self, _flow_id: &str, _patch: FlowPatch) -> std::result::Result<FlowDocument, StorageError> {
        Err(StorageError::Backend("store is read-only".to_string()))
    }
}

/// Attaches a context blob for `node_id` to the document.
fn attach_context(document: &mut FlowDocument, node_id: &str, context: NodeContext) {
    let mut blob = ContextBlob {
        flow_id: document.id.clone(),
        entries: Default::default(),
    };
    blob.entries.insert(node_id.to_string(), context);
    document.data.node_context_data = Some(serde_json::to_value(&blob).unwrap());
}

#[test]
fn test_tab_switch_load_isolates_flows() {
    let f1 = document_with_state("f1");
    let mut f2 = sample_document("f2");
    f2.nodes = vec![node_with_state("risk-model", json!({ "var": 0.99 }))];
    f2.edges = vec![];
    let mut session = seeded_session(vec![f1.clone(), f2.clone()]);

    session.open_flow_tab(f1).unwrap();
    assert_eq!(session.node_state().current_flow(), Some("f1"));
    assert!(session.node_state().get("screener").is_some());
    session.node_state_mut().set("reporter", json!({ "fmt": "pdf" }));

    // Switching tabs is a full reset: only the incoming flow's entries
    // remain visible.
    session.open_flow_tab(f2).unwrap();
    assert_eq!(session.node_state().current_flow(), Some("f2"));
    assert!(session.node_state().get("screener").is_none());
    assert!(session.node_state().get("reporter").is_none());
    assert_eq!(
        session.node_state().get("risk-model"),
        Some(&json!({ "var": 0.99 }))
    );
    assert!(session.node_context().is_empty());
}

#[test]
fn test_preserve_configuration_keeps_state_and_skips_context() {
    let mut f1 = document_with_state("f1");
    attach_context(
        &mut f1,
        "screener",
        NodeContext {
            status: AgentStatus::Complete,
            messages: vec!["screened 500 tickers".to_string()],
            output: Some(json!({ "matches": 17 })),
        },
    );
    let mut session = seeded_session(vec![f1]);

    session
        .load_flow("f1", LoadPolicy::PreserveConfiguration)
        .unwrap();
    // Persisted configuration is replayed, runtime context is not.
    assert!(session.node_state().get("screener").is_some());
    assert!(session.node_context().is_empty());

    session
        .node_state_mut()
        .set("market-data", json!({ "venue": "nyse" }));
    session
        .load_flow("f1", LoadPolicy::PreserveConfiguration)
        .unwrap();
    assert_eq!(
        session.node_state().get("market-data"),
        Some(&json!({ "venue": "nyse" }))
    );
    assert!(session.node_state().get("screener").is_some());
    assert!(session.node_context().is_empty());
}

#[test]
fn test_full_reset_imports_persisted_context() {
    let mut f1 = sample_document("f1");
    let context = NodeContext {
        status: AgentStatus::Complete,
        messages: vec!["done".to_string()],
        output: Some(json!({ "report": "q3.pdf" })),
    };
    attach_context(&mut f1, "reporter", context.clone());
    let mut session = seeded_session(vec![f1.clone()]);

    session.open_flow_tab(f1).unwrap();
    assert_eq!(session.node_context().get("reporter"), Some(&context));
}

#[test]
fn test_fetch_failure_falls_back_to_cached_copy() {
    let document = document_with_state("f9");
    let mut session = EditorSession::builder(BufferCanvas::new(), OfflineStore).build();

    // The tab carries the last-known copy, so the editor never goes blank.
    session.open_flow_tab(document.clone()).unwrap();
    assert_eq!(session.canvas().nodes(), document.nodes);
    assert!(session.node_state().get("screener").is_some());
}

#[test]
fn test_load_without_cached_copy_errors() {
    let mut session = EditorSession::builder(BufferCanvas::new(), OfflineStore).build();
    let result = session.load_flow("ghost", LoadPolicy::FullReset);
    assert!(matches!(
        result,
        Err(LifecycleError::FlowUnavailable { flow_id, .. }) if flow_id == "ghost"
    ));
}

#[test]
fn test_save_enriches_only_nonempty_state() {
    let f1 = sample_document("f1");
    let mut session = seeded_session(vec![f1.clone()]);
    session.open_flow_tab(f1).unwrap();

    session
        .node_state_mut()
        .set("screener", json!({ "threshold": 1 }));
    session.node_state_mut().set("reporter", json!({}));
    session.node_state_mut().set("market-data", json!(null));

    let saved = session.save_active_flow().unwrap();
    let by_id = |id: &str| saved.nodes.iter().find(|n| n.id == id).unwrap();
    assert_eq!(
        by_id("screener").data.internal_state,
        Some(json!({ "threshold": 1 }))
    );
    // Empty entries never inject a placeholder field.
    assert_eq!(by_id("reporter").data.internal_state, None);
    assert_eq!(by_id("market-data").data.internal_state, None);
}

#[test]
fn test_save_restores_canvas_after_success() {
    let f1 = sample_document("f1");
    let mut session = seeded_session(vec![f1.clone()]);
    session.open_flow_tab(f1).unwrap();
    session
        .node_state_mut()
        .set("screener", json!({ "threshold": 1 }));

    let before = session.canvas().nodes();
    session.save_active_flow().unwrap();
    // The enriched list was only ever a substitution for the base save.
    assert_eq!(session.canvas().nodes(), before);
}

#[test]
fn test_save_restores_canvas_after_failure() {
    let f1 = sample_document("f1");
    let mut inner = MemoryFlowStore::new();
    inner.insert(f1.clone());
    let mut session =
        EditorSession::builder(BufferCanvas::new(), ReadOnlyStore { inner }).build();
    session.open_flow_tab(f1).unwrap();
    session
        .node_state_mut()
        .set("screener", json!({ "threshold": 1 }));

    let before = session.canvas().nodes();
    let result = session.save_active_flow();
    assert!(result.is_err());
    assert_eq!(session.canvas().nodes(), before);
}

#[test]
fn test_save_attaches_exported_context() {
    let f1 = sample_document("f1");
    let mut session = seeded_session(vec![f1.clone()]);
    session.open_flow_tab(f1).unwrap();

    let context = NodeContext {
        status: AgentStatus::Running,
        messages: vec!["pulling data".to_string()],
        output: None,
    };
    session.node_context_mut().set("screener", context.clone());

    let saved = session.save_active_flow().unwrap();
    let raw = saved.data.node_context_data.expect("context data attached");
    let blob: ContextBlob = serde_json::from_value(raw).unwrap();
    assert_eq!(blob.flow_id, "f1");
    assert_eq!(blob.entries.get("screener"), Some(&context));

    // The store holds the same attachment.
    let stored = session.flow_store().fetch("f1").unwrap();
    assert!(stored.data.node_context_data.is_some());
}

#[test]
fn test_save_without_active_flow_fails() {
    let mut session = seeded_session(vec![]);
    session.open_tab(TabRequest::settings()).unwrap();
    assert!(matches!(
        session.save_active_flow(),
        Err(LifecycleError::NoActiveFlow)
    ));
}

#[test]
fn test_closing_active_flow_tab_loads_the_neighbor() {
    let f1 = sample_document("f1");
    let mut f2 = sample_document("f2");
    f2.nodes = vec![node("risk-model")];
    let mut session = seeded_session(vec![f1.clone(), f2.clone()]);

    session.open_flow_tab(f1.clone()).unwrap();
    session.open_flow_tab(f2).unwrap();
    assert_eq!(session.active_flow_id(), Some("f2"));

    session.close_tab("flow-f2").unwrap();
    assert_eq!(session.active_flow_id(), Some("f1"));
    assert_eq!(session.canvas().nodes(), f1.nodes);
}

#[test]
fn test_activating_the_active_tab_does_not_reload() {
    let f1 = sample_document("f1");
    let mut session = seeded_session(vec![f1.clone()]);
    session.open_flow_tab(f1).unwrap();

    // Simulate an unsaved edit, then re-activate the same tab: the canvas
    // must not be clobbered by a reload.
    session.canvas_mut().set_nodes(vec![node("draft")]);
    session.activate_tab("flow-f1").unwrap();
    assert_eq!(session.canvas().nodes(), vec![node("draft")]);
}

#[test]
fn test_successful_fetch_refreshes_tab_cache() {
    let f1 = sample_document("f1");
    let mut session = seeded_session(vec![f1.clone()]);
    session.open_flow_tab(f1).unwrap();

    // The document changes behind the editor's back.
    let mut renamed = sample_document("f1");
    renamed.name = "Renamed".to_string();
    session.flow_store_mut().insert(renamed);

    session.open_tab(TabRequest::settings()).unwrap();
    session.activate_tab("flow-f1").unwrap();
    let tab = session.tabs().get("flow-f1").unwrap();
    assert_eq!(tab.flow.as_ref().unwrap().name, "Renamed");
    assert_eq!(tab.title, "Renamed");
}
