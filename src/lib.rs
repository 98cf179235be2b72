//! # Hensei - Editor-State Engine for Agent Pipeline Flows
//!
//! **Hensei** is the document/state core behind a visual flow editor for
//! composing financial-analysis agent pipelines. Nodes represent agents and
//! data sources, edges represent data flow; Hensei owns everything about
//! those graphs that is not pixels: the open-tab registry, the undo/redo
//! history, the flow-scoped per-node stores, and the load/save lifecycle
//! that keeps all of them consistent.
//!
//! ## Core Workflow
//!
//! The engine is rendering- and transport-agnostic. It talks to the outside
//! world through two seams:
//!
//! 1.  **Graph canvas** ([`GraphCanvas`](canvas::GraphCanvas)): the visual
//!     surface that shows nodes and edges. Hensei only ever reads and
//!     writes whole node/edge lists.
//! 2.  **Flow store** ([`FlowStore`](storage::FlowStore)): wherever flow
//!     documents live. Hensei fetches by identifier and saves partial
//!     updates.
//!
//! An [`EditorSession`](session::EditorSession) wires both seams to the
//! stateful components. Activating a flow tab loads that flow (fetch,
//! re-scope the per-node stores, populate the canvas, replay persisted
//! configuration); saving reads the canvas back, enriches nodes with their
//! configuration, and attaches exported runtime context to the stored
//! document.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hensei::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // In-memory collaborators stand in for the rendering surface and
//!     // the persistence transport.
//!     let mut store = MemoryFlowStore::new();
//!     store.insert(FlowDocument {
//!         id: "pipeline-7".to_string(),
//!         name: "Revenue screening".to_string(),
//!         ..Default::default()
//!     });
//!
//!     let mut session = EditorSession::builder(BufferCanvas::new(), store)
//!         .with_history_capacity(100)
//!         .build();
//!
//!     // Opening a flow tab activates it and runs the full-reset load.
//!     let document = session.flow_store().fetch("pipeline-7")?;
//!     session.open_flow_tab(document)?;
//!
//!     // The embedder forwards every canvas change notification so edits
//!     // become undo steps...
//!     session.notify_canvas_changed();
//!
//!     // ...and drives undo/redo plus the deferred queue once the turn's
//!     // notifications are delivered.
//!     session.undo();
//!     session.run_deferred();
//!
//!     let saved = session.save_active_flow()?;
//!     println!("Saved '{}'", saved.name);
//!     Ok(())
//! }
//! ```

pub mod canvas;
pub mod document;
pub mod error;
pub mod history;
pub mod prelude;
pub mod scheduler;
pub mod session;
pub mod shortcut;
pub mod storage;
pub mod store;
pub mod tabs;
