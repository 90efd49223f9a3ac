//! Undo/redo for the outer document.
//!
//! The outer document owns history for both editors: the embedded buffer
//! routes its undo/redo keys here, and the resulting revision flows back into
//! the buffer through the normal resync path. Revisions are immutable and
//! cheap to clone, so history stores whole states.

use crate::state::EditorState;

/// Bounded snapshot history.
#[derive(Clone, Debug)]
pub struct History {
    undo_stack: Vec<EditorState>,
    redo_stack: Vec<EditorState>,
    max_steps: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}

impl History {
    pub fn new(max_steps: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_steps,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Record the state a doc-changing transaction replaced.
    pub fn record(&mut self, before: EditorState) {
        // Clear redo stack on new edit
        self.redo_stack.clear();
        self.undo_stack.push(before);

        // Trim if over max
        while self.undo_stack.len() > self.max_steps {
            self.undo_stack.remove(0);
        }
    }

    /// Step back, returning the state to restore.
    pub fn undo(&mut self, current: EditorState) -> Option<EditorState> {
        let prev = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(prev)
    }

    /// Step forward again, returning the state to restore.
    pub fn redo(&mut self, current: EditorState) -> Option<EditorState> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }
}
