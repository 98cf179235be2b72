use crate::document::{FlowEdge, FlowNode};

/// The graph canvas seam: the visual component that renders nodes and edges.
///
/// The editor session only ever reads and writes whole node/edge lists;
/// rendering, hit-testing and layout stay on the other side of this trait.
/// Accessors return owned copies, so nothing the session stores can alias
/// live canvas state.
///
/// A canvas implementation is expected to deliver its own change
/// notification (a call to
/// [`EditorSession::notify_canvas_changed`](crate::session::EditorSession::notify_canvas_changed))
/// on a later turn of the event loop after any mutation, including mutations
/// performed through `set_nodes`/`set_edges`.
pub trait GraphCanvas {
    fn nodes(&self) -> Vec<FlowNode>;
    fn edges(&self) -> Vec<FlowEdge>;
    fn set_nodes(&mut self, nodes: Vec<FlowNode>);
    fn set_edges(&mut self, edges: Vec<FlowEdge>);
}

/// A plain in-memory canvas.
///
/// The reference implementation used by the tests and the CLI; embedders
/// with a real rendering surface implement [`GraphCanvas`] themselves.
#[derive(Debug, Clone, Default)]
pub struct BufferCanvas {
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
}

impl BufferCanvas {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GraphCanvas for BufferCanvas {
    fn nodes(&self) -> Vec<FlowNode> {
        self.nodes.clone()
    }

    fn edges(&self) -> Vec<FlowEdge> {
        self.edges.clone()
    }

    fn set_nodes(&mut self, nodes: Vec<FlowNode>) {
        self.nodes = nodes;
    }

    fn set_edges(&mut self, edges: Vec<FlowEdge>) {
        self.edges = edges;
    }
}
