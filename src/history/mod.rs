//! Bounded undo/redo log of graph snapshots.
//!
//! The buffer is a linear sequence with a cursor. New snapshots prune the
//! redo branch, append, then evict from the front once the capacity is
//! exceeded. Replays set a re-entrancy guard that suppresses the snapshot
//! the canvas's own change notification would otherwise record; the guard is
//! cleared on a later scheduler turn, not synchronously.

mod snapshot;

pub use snapshot::FlowSnapshot;

use crate::canvas::GraphCanvas;
use crate::scheduler::Scheduler;
use std::cell::Cell;
use std::rc::Rc;

/// Default maximum number of snapshots a history keeps.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Per-editor-session undo/redo buffer.
pub struct FlowHistory {
    snapshots: Vec<FlowSnapshot>,
    cursor: Option<usize>,
    capacity: usize,
    replaying: Rc<Cell<bool>>,
}

impl FlowHistory {
    /// Creates an empty history bounded to `capacity` snapshots.
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            cursor: None,
            capacity: capacity.max(1),
            replaying: Rc::new(Cell::new(false)),
        }
    }

    /// Captures the canvas into a new snapshot.
    ///
    /// No-op while a replay is in progress, so the canvas change
    /// notification caused by an undo/redo is never recorded as an edit.
    /// Appending while the cursor sits before the end discards every
    /// snapshot after it; exceeding the capacity evicts the oldest one.
    pub fn take_snapshot(&mut self, canvas: &dyn GraphCanvas) {
        if self.replaying.get() {
            return;
        }
        if let Some(cursor) = self.cursor {
            self.snapshots.truncate(cursor + 1);
        }
        self.snapshots.push(FlowSnapshot::capture(canvas));
        if self.snapshots.len() > self.capacity {
            self.snapshots.remove(0);
        }
        self.cursor = Some(self.snapshots.len() - 1);
    }

    /// Replays the previous snapshot into the canvas, if there is one.
    pub fn undo(&mut self, canvas: &mut dyn GraphCanvas, scheduler: &mut Scheduler) {
        if let Some(cursor) = self.cursor
            && cursor > 0
        {
            self.restore_snapshot(cursor - 1, canvas, scheduler);
            self.cursor = Some(cursor - 1);
        }
    }

    /// Replays the next snapshot into the canvas, if there is one.
    pub fn redo(&mut self, canvas: &mut dyn GraphCanvas, scheduler: &mut Scheduler) {
        if let Some(cursor) = self.cursor
            && cursor + 1 < self.snapshots.len()
        {
            self.restore_snapshot(cursor + 1, canvas, scheduler);
            self.cursor = Some(cursor + 1);
        }
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor + 1 < self.snapshots.len())
    }

    /// Empties the buffer and resets the cursor.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = None;
    }

    /// Whether a replay is waiting for its guard to be cleared.
    pub fn is_replaying(&self) -> bool {
        self.replaying.get()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn snapshots(&self) -> &[FlowSnapshot] {
        &self.snapshots
    }

    /// Writes a stored snapshot back into the canvas.
    ///
    /// The guard goes up before the mutation and comes down via a deferred
    /// task, after the canvas has delivered the notification for this
    /// mutation on the current event-loop turn.
    fn restore_snapshot(
        &mut self,
        index: usize,
        canvas: &mut dyn GraphCanvas,
        scheduler: &mut Scheduler,
    ) {
        let snapshot = self.snapshots[index].clone();
        self.replaying.set(true);
        canvas.set_nodes(snapshot.nodes);
        canvas.set_edges(snapshot.edges);
        let guard = Rc::clone(&self.replaying);
        scheduler.defer(move || guard.set(false));
    }
}

impl Default for FlowHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl std::fmt::Debug for FlowHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowHistory")
            .field("len", &self.snapshots.len())
            .field("cursor", &self.cursor)
            .field("capacity", &self.capacity)
            .field("replaying", &self.replaying.get())
            .finish()
    }
}
