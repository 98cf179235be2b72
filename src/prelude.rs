//! Prelude module for convenient imports
//!
//! Re-exports the types an embedder touches when wiring the editor session:
//! the session itself, the two collaborator seams, the document model, and
//! the stateful components. Import this module to get access to the core
//! functionality without having to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use hensei::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let document = FlowDocument::from_file("path/to/flow.json")?;
//! let mut store = MemoryFlowStore::new();
//! store.insert(document.clone());
//!
//! let mut session = EditorSession::builder(BufferCanvas::new(), store).build();
//! session.open_flow_tab(document)?;
//! session.save_active_flow()?;
//! # Ok(())
//! # }
//! ```

// The session and its lifecycle
pub use crate::session::{EditorSession, EditorSessionBuilder, LoadPolicy};

// Collaborator seams and their in-memory reference implementations
pub use crate::canvas::{BufferCanvas, GraphCanvas};
pub use crate::storage::{FlowPatch, FlowStore, MemoryFlowStore};

// Document model and the workspace archive
pub use crate::document::{
    FlowDocument, FlowEdge, FlowNode, FlowRuntimeData, NodeData, WorkspaceArchive,
};

// Stateful components
pub use crate::history::{FlowHistory, FlowSnapshot};
pub use crate::store::{
    AgentStatus, ContextBlob, NO_FLOW_ID, NodeContext, NodeContextStore, NodeStateStore,
};
pub use crate::tabs::{Tab, TabKind, TabRegistry, TabRequest, canonical_tab_id};

// Keyboard shortcuts
pub use crate::shortcut::{Key, KeyPress, Modifiers, ShortcutBinding, ShortcutRegistry};

// Scheduling
pub use crate::scheduler::Scheduler;

// Error types
pub use crate::error::{ArchiveError, LifecycleError, StorageError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
