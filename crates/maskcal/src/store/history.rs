//! Bounded undo/redo stacks of inverse records.

use std::collections::VecDeque;

use super::mask::{Mask, MaskId, Shape};

/// Undo records kept when no depth is configured.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// The operation that reverts one edit.
#[derive(Clone, Debug)]
pub(crate) enum Inverse {
    /// Reverts an insert.
    Remove { id: MaskId },
    /// Reverts a remove: put the mask back where it was.
    Restore { mask: Mask, index: usize },
    /// Reverts a geometry replacement (band height edits included).
    Reshape { id: MaskId, shape: Shape },
    /// Reverts a material assignment.
    Rematerial {
        id: MaskId,
        material_id: Option<String>,
    },
}

/// Undo and redo stacks, most recent last.
#[derive(Clone, Debug)]
pub(crate) struct History {
    undo: VecDeque<Inverse>,
    redo: Vec<Inverse>,
    depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl History {
    pub(crate) fn new(depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            depth: depth.max(1),
        }
    }

    /// Record a fresh edit; invalidates redo.
    pub(crate) fn record(&mut self, inverse: Inverse) {
        self.redo.clear();
        self.push_undo(inverse);
    }

    /// Push onto undo without touching redo (used by redo itself).
    pub(crate) fn push_undo(&mut self, inverse: Inverse) {
        self.undo.push_back(inverse);
        while self.undo.len() > self.depth {
            self.undo.pop_front();
        }
    }

    pub(crate) fn push_redo(&mut self, inverse: Inverse) {
        self.redo.push(inverse);
    }

    pub(crate) fn pop_undo(&mut self) -> Option<Inverse> {
        self.undo.pop_back()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Inverse> {
        self.redo.pop()
    }

    pub(crate) fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub(crate) fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub(crate) fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
