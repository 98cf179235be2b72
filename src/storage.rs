use crate::document::{FlowDocument, FlowEdge, FlowNode, FlowRuntimeData};
use crate::error::StorageError;
use ahash::AHashMap;

/// A partial flow document: only the top-level fields a client actually
/// changed. The store merges the present fields over the persisted document
/// and leaves the rest untouched.
#[derive(Debug, Clone, Default)]
pub struct FlowPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub nodes: Option<Vec<FlowNode>>,
    pub edges: Option<Vec<FlowEdge>>,
    pub data: Option<FlowRuntimeData>,
}

/// The flow storage seam.
///
/// `fetch` must be idempotent; `update` performs a partial merge of the
/// patch over the stored document and returns the merged result.
pub trait FlowStore {
    fn fetch(&self, flow_id: &str) -> Result<FlowDocument, StorageError>;
    fn update(&mut self, flow_id: &str, patch: FlowPatch) -> Result<FlowDocument, StorageError>;
}

/// An in-memory flow store.
///
/// The reference implementation backing the tests and the CLI; a production
/// embedder adapts its transport (HTTP, IPC, ...) behind [`FlowStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryFlowStore {
    flows: AHashMap<String, FlowDocument>,
}

impl MemoryFlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a document, replacing any existing entry.
    pub fn insert(&mut self, document: FlowDocument) {
        self.flows.insert(document.id.clone(), document);
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

impl FlowStore for MemoryFlowStore {
    fn fetch(&self, flow_id: &str) -> Result<FlowDocument, StorageError> {
        self.flows
            .get(flow_id)
            .cloned()
            .ok_or_else(|| StorageError::FlowNotFound(flow_id.to_string()))
    }

    fn update(&mut self, flow_id: &str, patch: FlowPatch) -> Result<FlowDocument, StorageError> {
        let document = self
            .flows
            .get_mut(flow_id)
            .ok_or_else(|| StorageError::FlowNotFound(flow_id.to_string()))?;

        if let Some(name) = patch.name {
            document.name = name;
        }
        if let Some(description) = patch.description {
            document.description = Some(description);
        }
        if let Some(nodes) = patch.nodes {
            document.nodes = nodes;
        }
        if let Some(edges) = patch.edges {
            document.edges = edges;
        }
        if let Some(data) = patch.data {
            document.data = data;
        }
        Ok(document.clone())
    }
}
