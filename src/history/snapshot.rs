use crate::canvas::GraphCanvas;
use crate::document::{FlowEdge, FlowNode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// An immutable point-in-time capture of the canvas graph.
///
/// The node and edge lists are owned copies taken at capture time, so a
/// snapshot never shares mutable substructure with live canvas state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSnapshot {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    #[serde(with = "time::serde::rfc3339")]
    pub captured_at: OffsetDateTime,
}

impl FlowSnapshot {
    /// Captures the canvas's current graph.
    pub fn capture(canvas: &dyn GraphCanvas) -> Self {
        Self {
            nodes: canvas.nodes(),
            edges: canvas.edges(),
            captured_at: OffsetDateTime::now_utc(),
        }
    }
}
