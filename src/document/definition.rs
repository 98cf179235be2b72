use serde::{Deserialize, Serialize};

/// The persisted flow document: the authoritative form of one agent pipeline
/// as the flow store holds it.
///
/// Fields the editor does not model (canvas positions, viewport, node styling)
/// are carried through untouched in the flattened `extra` maps so a
/// load-then-save round trip never drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowDocument {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub nodes: Vec<FlowNode>,
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
    #[serde(default, skip_serializing_if = "FlowRuntimeData::is_empty")]
    pub data: FlowRuntimeData,
}

/// A single node (an agent or a data source) in the flow graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    #[serde(default)]
    pub data: NodeData,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The `data` payload of a node. `internal_state` is the node's persisted
/// configuration; everything else stays opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_state: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A connection between two nodes in the flow graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    #[serde(
        default,
        rename = "sourceHandle",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_handle: Option<String>,
    pub target: String,
    #[serde(
        default,
        rename = "targetHandle",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_handle: Option<String>,
}

/// Document-level runtime payload, separate from the graph itself.
/// `nodeContextData` holds one exported context blob per flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowRuntimeData {
    #[serde(
        default,
        rename = "nodeContextData",
        skip_serializing_if = "Option::is_none"
    )]
    pub node_context_data: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FlowRuntimeData {
    pub fn is_empty(&self) -> bool {
        self.node_context_data.is_none() && self.extra.is_empty()
    }
}

impl FlowDocument {
    /// Parses a flow document from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads a flow document from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}
