//! Host contract for the outer rich-text editor.

use crate::state::EditorState;
use crate::transaction::Transaction;
use crate::types::{Bias, Selection};

/// The outer editor as seen by embedded views and navigation handlers.
///
/// Implementations are shared handles (typically wrapping `Rc` state), so
/// every method takes `&self`. `dispatch` may call back into node views
/// synchronously before it returns; callers must not hold borrows of their
/// own state across it.
pub trait OuterEditor {
    /// Snapshot of the current state.
    fn state(&self) -> EditorState;

    /// Apply a transaction atomically.
    fn dispatch(&self, tr: Transaction);

    /// Move input focus to the outer editor.
    fn focus(&self);

    fn has_focus(&self) -> bool;

    /// Undo the last document change. Returns false if there was nothing to undo.
    fn undo(&self) -> bool;

    /// Redo the last undone change. Returns false if there was nothing to redo.
    fn redo(&self) -> bool;

    /// Nearest valid cursor position to `pos`, searching in `bias` first.
    fn selection_near(&self, pos: usize, bias: Bias) -> Option<Selection> {
        self.state().doc.selection_near(pos, bias)
    }
}
