use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Scope identifier the save path exports under when no flow tab is active.
pub const NO_FLOW_ID: &str = "none";

/// Execution status of the agent behind a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Idle,
    Running,
    Complete,
    Failed,
}

/// Runtime execution data attached to a single node: what the agent is
/// doing, what it said, and what it produced. Never treated as
/// configuration and never persisted implicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeContext {
    #[serde(default)]
    pub status: AgentStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
}

/// One flow's worth of node contexts in serializable form, as attached to a
/// saved document under `data.nodeContextData`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextBlob {
    pub flow_id: String,
    #[serde(default)]
    pub entries: AHashMap<String, NodeContext>,
}

/// Flow-scoped store for per-node runtime context.
///
/// Same scoping discipline as [`NodeStateStore`](crate::store::NodeStateStore),
/// plus whole-flow export/import as a single [`ContextBlob`]. Loads never
/// populate this store on their own; only an explicit run action or a
/// full-reset import does.
///
/// # Panics
///
/// Per-node reads and writes panic until [`set_current_flow`](Self::set_current_flow)
/// has been called; see [`NodeStateStore`](crate::store::NodeStateStore).
#[derive(Debug, Clone, Default)]
pub struct NodeContextStore {
    scopes: AHashMap<String, AHashMap<String, NodeContext>>,
    current: Option<String>,
}

impl NodeContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the store at `flow_id`. Must precede any per-node access.
    pub fn set_current_flow(&mut self, flow_id: impl Into<String>) {
        let flow_id = flow_id.into();
        self.scopes.entry(flow_id.clone()).or_default();
        self.current = Some(flow_id);
    }

    pub fn current_flow(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn get(&self, node_id: &str) -> Option<&NodeContext> {
        self.current_scope().get(node_id)
    }

    pub fn set(&mut self, node_id: impl Into<String>, context: NodeContext) {
        self.current_scope_mut().insert(node_id.into(), context);
    }

    pub fn remove(&mut self, node_id: &str) -> Option<NodeContext> {
        self.current_scope_mut().remove(node_id)
    }

    /// Drops every entry for the current flow; other flows are untouched.
    pub fn clear_current(&mut self) {
        self.current_scope_mut().clear();
    }

    /// Drops every entry for every flow. The scope pointer survives.
    pub fn reset_all(&mut self) {
        self.scopes.clear();
        if let Some(current) = self.current.clone() {
            self.scopes.insert(current, AHashMap::new());
        }
    }

    /// Exports the entries held for `flow_id` as one serializable blob.
    /// Exporting a flow with no entries yields an empty blob.
    pub fn export_all(&self, flow_id: &str) -> ContextBlob {
        ContextBlob {
            flow_id: flow_id.to_string(),
            entries: self.scopes.get(flow_id).cloned().unwrap_or_default(),
        }
    }

    /// Imports a blob into the scope it names, replacing that scope's
    /// entries. The current-scope pointer is not moved.
    pub fn import_all(&mut self, blob: ContextBlob) {
        self.scopes.insert(blob.flow_id, blob.entries);
    }

    /// Number of entries in the current scope.
    pub fn len(&self) -> usize {
        self.current_scope().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_scope().is_empty()
    }

    fn current_scope(&self) -> &AHashMap<String, NodeContext> {
        let Some(current) = self.current.as_ref() else {
            panic!("NodeContextStore used before set_current_flow was called");
        };
        &self.scopes[current]
    }

    fn current_scope_mut(&mut self) -> &mut AHashMap<String, NodeContext> {
        let Some(current) = self.current.as_ref() else {
            panic!("NodeContextStore used before set_current_flow was called");
        };
        self.scopes.get_mut(current).unwrap_or_else(|| {
            unreachable!("set_current_flow always creates the scope it points at")
        })
    }
}
