use ahash::AHashMap;

/// Flow-scoped store for per-node configuration ("internal state").
///
/// Entries are namespaced by flow identifier internally, so re-scoping to
/// another flow never mixes entries across flows. The session re-points the
/// scope on every flow switch; nothing is dropped implicitly.
///
/// # Panics
///
/// Per-node reads and writes panic until [`set_current_flow`](Self::set_current_flow)
/// has been called: using the store unscoped is an integration bug and is
/// surfaced immediately rather than masked.
#[derive(Debug, Clone, Default)]
pub struct NodeStateStore {
    scopes: AHashMap<String, AHashMap<String, serde_json::Value>>,
    current: Option<String>,
}

impl NodeStateStore {
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

    pub fn get(&self, node_id: &str) -> Option<&serde_json::Value> {
        self.current_scope().get(node_id)
    }

    pub fn set(&mut self, node_id: impl Into<String>, value: serde_json::Value) {
        self.current_scope_mut().insert(node_id.into(), value);
    }

    pub fn remove(&mut self, node_id: &str) -> Option<serde_json::Value> {
        self.current_scope_mut().remove(node_id)
    }

    /// Drops every entry for the current flow; other flows are untouched.
    pub fn clear_current(&mut self) {
        self.current_scope_mut().clear();
    }

    /// Number of entries in the current scope.
    pub fn len(&self) -> usize {
        self.current_scope().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_scope().is_empty()
    }

    fn current_scope(&self) -> &AHashMap<String, serde_json::Value> {
        let Some(current) = self.current.as_ref() else {
            panic!("NodeStateStore used before set_current_flow was called");
        };
        &self.scopes[current]
    }

    fn current_scope_mut(&mut self) -> &mut AHashMap<String, serde_json::Value> {
        let Some(current) = self.current.as_ref() else {
            panic!("NodeStateStore used before set_current_flow was called");
        };
        self.scopes.get_mut(current).unwrap_or_else(|| {
            unreachable!("set_current_flow always creates the scope it points at")
        })
    }
}
