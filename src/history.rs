//! Bounded undo/redo checkpoint stacks.

use log::trace;

use crate::types::Position;

/// A restorable state: the full text plus the cursor at the time of capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub text: String,
    pub cursor: Position,
}

/// Undo stack with an auxiliary redo stack, owned by one interpreter session.
///
/// The undo stack is bounded; committing past capacity evicts the oldest
/// checkpoint. A commit clears the redo stack, an undo does not.
#[derive(Debug, Clone)]
pub struct History {
    undo: Vec<Checkpoint>,
    redo: Vec<Checkpoint>,
    capacity: usize,
}

pub const DEFAULT_CAPACITY: usize = 80;

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Pushes a checkpoint of the state about to be mutated.
    pub fn commit(&mut self, text: String, cursor: Position) {
        if self.undo.len() == self.capacity {
            trace!("undo stack full, evicting oldest checkpoint");
            self.undo.remove(0);
        }
        self.undo.push(Checkpoint { text, cursor });
        self.redo.clear();
    }

    /// Pops the most recent checkpoint, moving `current` (the state being
    /// left) to the redo stack. `None` when the stack is empty.
    pub fn undo(&mut self, current: Checkpoint) -> Option<Checkpoint> {
        let restored = self.undo.pop()?;
        self.redo.push(current);
        Some(restored)
    }

    /// Replays the most recent undone checkpoint, moving `current` back onto
    /// the undo stack without evicting or clearing anything.
    pub fn redo(&mut self, current: Checkpoint) -> Option<Checkpoint> {
        let restored = self.redo.pop()?;
        self.undo.push(current);
        Some(restored)
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}
