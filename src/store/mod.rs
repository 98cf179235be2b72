//! Flow-scoped per-node stores.
//!
//! Two stores with deliberately different lifecycles: internal state is
//! configuration and survives tab refreshes; context data is runtime output
//! and is only ever populated by an explicit run or a full-reset import.
//! Both are plain objects owned by the session and handed down explicitly.

mod node_context;
mod node_state;

pub use node_context::{AgentStatus, ContextBlob, NO_FLOW_ID, NodeContext, NodeContextStore};
pub use node_state::NodeStateStore;
