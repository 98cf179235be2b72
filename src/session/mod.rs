//! The editor session: one open editor instance.
//!
//! Owns the tab registry, the undo/redo history, both flow-scoped node
//! stores, the scheduler, and the two external collaborators (canvas and
//! flow store), and runs the flow lifecycle across them: activating a flow
//! tab fetches the authoritative document, re-points the stores, populates
//! the canvas and replays persisted per-node configuration; saving walks
//! the same path in reverse.
//!
//! Everything runs on the embedder's event loop. In-flight loads are not
//! cancelled when the active tab changes, so a load started for a
//! since-deactivated tab still writes shared state when it completes
//! (last-fetch-wins; intentional for now).

use crate::canvas::GraphCanvas;
use crate::document::{FlowDocument, FlowNode};
use crate::error::LifecycleError;
use crate::history::{DEFAULT_HISTORY_CAPACITY, FlowHistory};
use crate::scheduler::Scheduler;
use crate::storage::{FlowPatch, FlowStore};
use crate::store::{ContextBlob, NO_FLOW_ID, NodeContextStore, NodeStateStore};
use crate::tabs::{TabKind, TabRegistry, TabRequest};

/// How a flow load treats the per-node stores.
///
/// Two intentionally different policies share the same load sequence; they
/// are never merged into one behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Plain tab-switch loads: both stores are cleared for the incoming
    /// flow, then the document's persisted context data is imported.
    FullReset,
    /// Explicit load-flow actions: configuration survives, and runtime
    /// context is left untouched so a fresh view never shows stale run
    /// output.
    PreserveConfiguration,
}

/// Builds an [`EditorSession`] with non-default knobs.
pub struct EditorSessionBuilder<C, S> {
    canvas: C,
    store: S,
    history_capacity: usize,
    tabs: TabRegistry,
}

impl<C: GraphCanvas, S: FlowStore> EditorSessionBuilder<C, S> {
    pub fn new(canvas: C, store: S) -> Self {
        Self {
            canvas,
            store,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            tabs: TabRegistry::new(),
        }
    }

    /// Caps the undo/redo buffer at `capacity` snapshots.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Starts the session with a pre-populated tab registry, e.g. one
    /// restored from a [`WorkspaceArchive`](crate::document::WorkspaceArchive).
    /// No flow load runs for the registry's active tab; the embedder
    /// decides when to load.
    pub fn with_tabs(mut self, tabs: TabRegistry) -> Self {
        self.tabs = tabs;
        self
    }

    pub fn build(self) -> EditorSession<C, S> {
        EditorSession {
            canvas: self.canvas,
            store: self.store,
            tabs: self.tabs,
            history: FlowHistory::new(self.history_capacity),
            node_state: NodeStateStore::new(),
            node_context: NodeContextStore::new(),
            scheduler: Scheduler::new(),
        }
    }
}

/// One open editor instance; see the module docs.
pub struct EditorSession<C, S> {
    canvas: C,
    store: S,
    tabs: TabRegistry,
    history: FlowHistory,
    node_state: NodeStateStore,
    node_context: NodeContextStore,
    scheduler: Scheduler,
}

impl<C: GraphCanvas, S: FlowStore> EditorSession<C, S> {
    pub fn builder(canvas: C, store: S) -> EditorSessionBuilder<C, S> {
        EditorSessionBuilder::new(canvas, store)
    }

    // --- Tabs ---

    /// Opens (or refreshes) a tab and activates it. Activating a flow tab
    /// runs the full-reset load for its flow.
    pub fn open_tab(&mut self, request: TabRequest) -> Result<String, LifecycleError> {
        let previous = self.tabs.active_id().map(str::to_string);
        let id = self.tabs.open(request);
        self.sync_active_flow(previous.as_deref())?;
        Ok(id)
    }

    /// Opens a flow tab carrying `document` as its cached copy.
    pub fn open_flow_tab(&mut self, document: FlowDocument) -> Result<String, LifecycleError> {
        self.open_tab(TabRequest::flow(&document))
    }

    /// Activates an open tab; unknown ids are silently ignored. When the
    /// activation lands on a different flow tab, its flow is loaded with
    /// the full-reset policy.
    pub fn activate_tab(&mut self, tab_id: &str) -> Result<(), LifecycleError> {
        let previous = self.tabs.active_id().map(str::to_string);
        self.tabs.set_active(tab_id);
        self.sync_active_flow(previous.as_deref())
    }

    /// Closes a tab; if the active tab moves to a flow tab as a result,
    /// that flow is loaded with the full-reset policy.
    pub fn close_tab(&mut self, tab_id: &str) -> Result<(), LifecycleError> {
        let previous = self.tabs.active_id().map(str::to_string);
        self.tabs.close(tab_id);
        self.sync_active_flow(previous.as_deref())
    }

    pub fn close_all_tabs(&mut self) {
        self.tabs.close_all();
    }

    /// The flow identifier of the active tab, when it is a flow tab.
    pub fn active_flow_id(&self) -> Option<&str> {
        self.tabs.active_tab().and_then(|tab| tab.flow_id())
    }

    fn sync_active_flow(&mut self, previous: Option<&str>) -> Result<(), LifecycleError> {
        if self.tabs.active_id() == previous {
            return Ok(());
        }
        let Some(flow_id) = self.active_flow_id().map(str::to_string) else {
            return Ok(());
        };
        self.load_flow(&flow_id, LoadPolicy::FullReset)
    }

    // --- Flow lifecycle ---

    /// Loads flow `flow_id` into the editor.
    ///
    /// Fetches the authoritative document (falling back to the tab's cached
    /// copy when the store fails), re-points both node stores at the flow,
    /// pushes the graph into the canvas and replays persisted per-node
    /// configuration. Only the [`LoadPolicy::FullReset`] path also imports
    /// the document's persisted runtime context.
    pub fn load_flow(&mut self, flow_id: &str, policy: LoadPolicy) -> Result<(), LifecycleError> {
        log::debug!("Loading flow '{flow_id}' ({policy:?})");
        let document = self.fetch_with_fallback(flow_id)?;

        // Stores must be re-scoped before any dependent read below.
        self.node_state.set_current_flow(flow_id);
        self.node_context.set_current_flow(flow_id);
        if policy == LoadPolicy::FullReset {
            self.node_state.clear_current();
            self.node_context.clear_current();
        }

        self.canvas.set_nodes(document.nodes.clone());
        self.canvas.set_edges(document.edges.clone());

        for node in &document.nodes {
            if let Some(state) = &node.data.internal_state {
                self.node_state.set(node.id.clone(), state.clone());
            }
        }

        if policy == LoadPolicy::FullReset
            && let Some(raw) = &document.data.node_context_data
        {
            let blob: ContextBlob =
                serde_json::from_value(raw.clone()).map_err(|e| {
                    LifecycleError::InvalidContextData {
                        flow_id: flow_id.to_string(),
                        reason: e.to_string(),
                    }
                })?;
            self.node_context.import_all(blob);
        }
        Ok(())
    }

    /// Saves the active flow.
    ///
    /// Reads the canvas graph, enriches each node with its non-empty
    /// internal-state entry, substitutes the enriched list into the canvas
    /// for the base save, and restores the original list no matter how the
    /// save went. On success a follow-up update attaches the exported
    /// runtime context under `data.nodeContextData` and the final document
    /// is returned.
    pub fn save_active_flow(&mut self) -> Result<FlowDocument, LifecycleError> {
        let flow_id = self.active_flow_id().map(str::to_string);
        let context_blob = self
            .node_context
            .export_all(flow_id.as_deref().unwrap_or(NO_FLOW_ID));

        let original_nodes = self.canvas.nodes();
        let enriched = self.enrich_nodes(original_nodes.clone());
        self.canvas.set_nodes(enriched);
        let base_result = self.base_save(flow_id.as_deref());
        // The canvas comes back to the un-enriched list no matter how the
        // base save went.
        self.canvas.set_nodes(original_nodes);
        let saved = base_result?;

        let context_value =
            serde_json::to_value(&context_blob).map_err(|e| LifecycleError::InvalidContextData {
                flow_id: saved.id.clone(),
                reason: e.to_string(),
            })?;
        let mut data = saved.data.clone();
        data.node_context_data = Some(context_value);
        let updated = self.store.update(
            &saved.id,
            FlowPatch {
                data: Some(data),
                ..Default::default()
            },
        )?;

        if let Some(tab) = self
            .tabs
            .find_by_identifier_mut(&updated.id, &TabKind::Flow)
        {
            tab.flow = Some(updated.clone());
        }
        log::debug!("Saved flow '{}'", updated.id);
        Ok(updated)
    }

    /// The base save: pushes whatever graph the canvas currently shows into
    /// the stored document.
    fn base_save(&mut self, flow_id: Option<&str>) -> Result<FlowDocument, LifecycleError> {
        let flow_id = flow_id.ok_or(LifecycleError::NoActiveFlow)?;
        let patch = FlowPatch {
            nodes: Some(self.canvas.nodes()),
            edges: Some(self.canvas.edges()),
            ..Default::default()
        };
        Ok(self.store.update(flow_id, patch)?)
    }

    fn fetch_with_fallback(&mut self, flow_id: &str) -> Result<FlowDocument, LifecycleError> {
        match self.store.fetch(flow_id) {
            Ok(document) => {
                if let Some(tab) = self.tabs.find_by_identifier_mut(flow_id, &TabKind::Flow) {
                    tab.flow = Some(document.clone());
                    tab.title = document.name.clone();
                }
                Ok(document)
            }
            Err(err) => {
                log::warn!("Fetch of flow '{flow_id}' failed, falling back to cached copy: {err}");
                self.tabs
                    .find_by_identifier(flow_id, &TabKind::Flow)
                    .and_then(|tab| tab.flow.clone())
                    .ok_or_else(|| LifecycleError::FlowUnavailable {
                        flow_id: flow_id.to_string(),
                        reason: err.to_string(),
                    })
            }
        }
    }

    /// Attaches each node's internal-state entry as its `internal_state`
    /// field. Nodes whose entry is absent or empty are left untouched; an
    /// empty placeholder is never injected.
    fn enrich_nodes(&self, mut nodes: Vec<FlowNode>) -> Vec<FlowNode> {
        if self.node_state.current_flow().is_none() {
            return nodes;
        }
        for node in &mut nodes {
            if let Some(state) = self.node_state.get(&node.id)
                && has_content(state)
            {
                node.data.internal_state = Some(state.clone());
            }
        }
        nodes
    }

    // --- History ---

    /// Records the canvas's current graph as a new undo step. Called by the
    /// embedder whenever the canvas reports a content change; replays
    /// suppress themselves through the history's guard.
    pub fn notify_canvas_changed(&mut self) {
        self.history.take_snapshot(&self.canvas);
    }

    pub fn undo(&mut self) {
        self.history.undo(&mut self.canvas, &mut self.scheduler);
    }

    pub fn redo(&mut self) {
        self.history.redo(&mut self.canvas, &mut self.scheduler);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Drains the deferred-task queue. The embedder calls this after
    /// delivering the current turn's canvas notifications; it is what
    /// lowers the replay guard.
    pub fn run_deferred(&mut self) {
        self.scheduler.run_until_idle();
    }

    // --- Accessors ---

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn flow_store(&self) -> &S {
        &self.store
    }

    pub fn flow_store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn tabs(&self) -> &TabRegistry {
        &self.tabs
    }

    pub fn history(&self) -> &FlowHistory {
        &self.history
    }

    pub fn node_state(&self) -> &NodeStateStore {
        &self.node_state
    }

    pub fn node_state_mut(&mut self) -> &mut NodeStateStore {
        &mut self.node_state
    }

    pub fn node_context(&self) -> &NodeContextStore {
        &self.node_context
    }

    pub fn node_context_mut(&mut self) -> &mut NodeContextStore {
        &mut self.node_context
    }
}

/// "Non-empty" internal state: anything but `null`, `{}` or `[]` counts as
/// real configuration.
fn has_content(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Object(map) => !map.is_empty(),
        serde_json::Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}
