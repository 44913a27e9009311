//! Undo/Redo history over scene snapshots.
//!
//! Every tracked mutation pushes the scene as it was *before* the change.
//! Snapshots are immutable and shared (`Arc`), so undoing and redoing just
//! swaps which snapshot is current. Snapshots may carry `selected` flags,
//! but the store re-applies the live selection after every swap, so
//! selection is never restored from history.
//!
//! Drag gestures use **batching**: the scene is captured when the gesture
//! starts, and the whole gesture lands as a single undo step when it ends.

use cf_core::model::Scene;
use std::sync::Arc;

/// An immutable `(nodes, edges)` snapshot.
pub type Snapshot = Arc<Scene>;

/// Past/future snapshot stacks with batch grouping for drag gestures.
#[derive(Debug)]
pub struct History {
    past: Vec<Snapshot>,
    future: Vec<Snapshot>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Scene captured at the start of a batch.
    batch_snapshot: Option<Snapshot>,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            past: Vec::with_capacity(max_depth.min(64)),
            future: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
        }
    }

    /// Record that the scene is about to change from `before`.
    ///
    /// Inside a batch this is a no-op: the snapshot taken at
    /// `begin_batch` already covers it.
    pub fn record(&mut self, before: &Scene) {
        if self.batch_depth > 0 {
            return;
        }
        self.push_past(Arc::new(before.clone()));
    }

    /// Start a batch group. Captures `current` so that all mutations until
    /// the matching `end_batch` undo as one step.
    pub fn begin_batch(&mut self, current: &Scene) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(Arc::new(current.clone()));
        }
        self.batch_depth += 1;
    }

    /// End a batch group. When the outermost batch closes and the scene
    /// content differs from the captured one, push a single undo entry.
    /// Selection-only differences push nothing.
    pub fn end_batch(&mut self, current: &Scene) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0
            && let Some(before) = self.batch_snapshot.take()
            && !before.same_content(current)
        {
            self.push_past(before);
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Step back: returns the scene to restore, or `None` with nothing to undo.
    pub fn undo(&mut self, current: &Scene) -> Option<Snapshot> {
        let previous = self.past.pop()?;
        self.future.push(Arc::new(current.clone()));
        Some(previous)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: &Scene) -> Option<Snapshot> {
        let next = self.future.pop()?;
        self.past.push(Arc::new(current.clone()));
        Some(next)
    }

    /// Forget everything, including any open batch.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.batch_depth = 0;
        self.batch_snapshot = None;
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    fn push_past(&mut self, snapshot: Snapshot) {
        self.past.push(snapshot);
        if self.past.len() > self.max_depth {
            self.past.remove(0);
        }
        // New action invalidates the redo branch.
        self.future.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}
