//! Cursor movement across the edge of an embedded buffer.
//!
//! Two halves:
//! - leaving: helpers the embedded view uses to decide whether an arrow key
//!   pressed inside the buffer should move the cursor out into the outer
//!   document
//! - entering: `ArrowHandler`, bound in the outer editor's keymap, which
//!   moves the outer cursor into an adjacent code block instead of letting
//!   the default movement skip over it

use crate::actions::{KeyCombo, arrow_direction};
use crate::buffer::EmbeddedBuffer;
use crate::model::NodeType;
use crate::outer::OuterEditor;
use crate::state::EditorState;
use crate::transaction::Transaction;
use crate::types::{Direction, Selection};

/// Granularity of an escape check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeUnit {
    /// The cursor must be at the buffer's start/end.
    Char,
    /// The cursor must be on the buffer's first/last line.
    Line,
}

/// Whether a collapsed buffer cursor has no more content in `dir`.
///
/// Comparisons are inclusive: a cursor exactly on the boundary counts as
/// being at the edge.
pub fn at_buffer_edge<B: EmbeddedBuffer + ?Sized>(
    buffer: &B,
    unit: EscapeUnit,
    dir: Direction,
) -> bool {
    let sel = buffer.selection();
    if !sel.is_empty() {
        return false;
    }
    let len = buffer.len_chars();

    let (from, to) = match unit {
        EscapeUnit::Char => (sel.from(), sel.to()),
        EscapeUnit::Line => match buffer.line_range(sel.head) {
            Some(line) => (line.start, line.end),
            None => return false,
        },
    };

    if dir.is_backward() { from == 0 } else { to >= len }
}

/// Outer position to search from when leaving a block that starts at
/// `node_start` and spans `node_size`.
///
/// Leaving backward targets the position just before the block; leaving
/// forward the one just after it. Vertical exits use the same targets as
/// horizontal ones, regardless of which line the cursor was on.
pub fn escape_target(node_start: usize, node_size: usize, dir: Direction) -> usize {
    if dir.is_backward() {
        node_start
    } else {
        node_start + node_size
    }
}

/// Build the transaction that leaves a code block by inserting an empty
/// paragraph after it and placing the cursor there.
///
/// Returns `None` unless the selection is inside a single code block.
pub fn exit_code(state: &EditorState) -> Option<Transaction> {
    let head = state.doc.resolve(state.selection.head).ok()?;
    let anchor = state.doc.resolve(state.selection.anchor).ok()?;
    if !head.in_textblock() || head.index != anchor.index {
        return None;
    }
    if !state.doc.blocks()[head.index].node_type().is_code() {
        return None;
    }

    let pos = head.after()?;
    let mut tr = Transaction::new();
    tr.insert_block(pos, NodeType::Paragraph, "")
        .set_selection(Selection::cursor(pos + 1))
        .scroll_into_view();
    Some(tr)
}

/// Arrow-key handler for the outer editor.
///
/// Holds the outer editor handle it acts on.
pub struct ArrowHandler<O> {
    outer: O,
}

impl<O: OuterEditor> ArrowHandler<O> {
    pub fn new(outer: O) -> Self {
        Self { outer }
    }

    /// Move the cursor into an adjacent code block.
    ///
    /// Returns true (suppressing default movement) only when the collapsed
    /// cursor is at its textblock's edge in `dir` and the nearest position
    /// across that edge is inside a code block.
    pub fn handle(&self, dir: Direction) -> bool {
        let state = self.outer.state();
        if !state.selection.is_empty() || !state.end_of_textblock(dir) {
            return false;
        }
        let Ok(head) = state.doc.resolve(state.selection.head) else {
            return false;
        };
        let boundary = if dir.is_backward() {
            head.before()
        } else {
            head.after()
        };
        let Some(boundary) = boundary else {
            return false;
        };

        let Some(next) = self.outer.selection_near(boundary, dir.into()) else {
            return false;
        };
        let lands_in_code = state
            .doc
            .node_at(next.head)
            .is_some_and(|node| node.node_type().is_code());
        if !lands_in_code {
            return false;
        }

        tracing::trace!(?dir, from = state.selection.head, to = next.head, "entering code block");
        let mut tr = Transaction::new();
        tr.set_selection(next);
        self.outer.dispatch(tr);
        true
    }

    /// Keymap entry point: arrow keys only.
    pub fn handle_key(&self, combo: &KeyCombo) -> bool {
        arrow_direction(combo).is_some_and(|dir| self.handle(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{CodeBuffer, InnerTransaction};
    use crate::model::Document;

    fn buffer(text: &str, sel: Selection) -> CodeBuffer {
        let mut buf = CodeBuffer::from_text(text);
        buf.dispatch(InnerTransaction::new().select(sel)).unwrap();
        buf
    }

    #[test]
    fn test_char_edges() {
        let buf = buffer("hello", Selection::cursor(0));
        assert!(at_buffer_edge(&buf, EscapeUnit::Char, Direction::Left));
        assert!(!at_buffer_edge(&buf, EscapeUnit::Char, Direction::Right));

        let buf = buffer("hello", Selection::cursor(5));
        assert!(at_buffer_edge(&buf, EscapeUnit::Char, Direction::Right));
        assert!(!at_buffer_edge(&buf, EscapeUnit::Char, Direction::Backward));
    }

    #[test]
    fn test_range_selection_never_escapes() {
        let buf = buffer("hello", Selection::new(0, 5));
        assert!(!at_buffer_edge(&buf, EscapeUnit::Char, Direction::Left));
        assert!(!at_buffer_edge(&buf, EscapeUnit::Line, Direction::Down));
    }

    #[test]
    fn test_line_edges() {
        let buf = buffer("one\ntwo\nthree", Selection::cursor(2));
        assert!(at_buffer_edge(&buf, EscapeUnit::Line, Direction::Up));
        assert!(!at_buffer_edge(&buf, EscapeUnit::Line, Direction::Down));

        let buf = buffer("one\ntwo\nthree", Selection::cursor(5));
        assert!(!at_buffer_edge(&buf, EscapeUnit::Line, Direction::Up));
        assert!(!at_buffer_edge(&buf, EscapeUnit::Line, Direction::Down));

        // Anywhere on the last line, not just its end.
        let buf = buffer("one\ntwo\nthree", Selection::cursor(9));
        assert!(at_buffer_edge(&buf, EscapeUnit::Line, Direction::Down));
    }

    #[test]
    fn test_empty_buffer_is_at_every_edge() {
        let buf = buffer("", Selection::cursor(0));
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert!(at_buffer_edge(&buf, EscapeUnit::Char, dir));
            assert!(at_buffer_edge(&buf, EscapeUnit::Line, dir));
        }
    }

    #[test]
    fn test_escape_target() {
        assert_eq!(escape_target(10, 7, Direction::Right), 17);
        assert_eq!(escape_target(10, 7, Direction::Down), 17);
        assert_eq!(escape_target(10, 7, Direction::Left), 10);
        assert_eq!(escape_target(10, 7, Direction::Up), 10);
    }

    #[test]
    fn test_exit_code_inserts_paragraph_after_block() {
        // <p>a</p> 0..3, <code>xy</code> 3..7
        let doc = Document::builder().paragraph("a").code_block("xy").build();
        let state = EditorState::new(doc).with_selection(Selection::cursor(5));
        let tr = exit_code(&state).unwrap();
        let next = state.apply(&tr).unwrap();

        assert_eq!(next.doc.blocks().len(), 3);
        assert_eq!(next.doc.blocks()[2].node_type(), NodeType::Paragraph);
        assert_eq!(next.selection, Selection::cursor(8));
        assert!(tr.scrolls_into_view());
    }

    #[test]
    fn test_exit_code_outside_code_block() {
        let doc = Document::builder().paragraph("a").code_block("xy").build();
        let state = EditorState::new(doc.clone()).with_selection(Selection::cursor(1));
        assert!(exit_code(&state).is_none());

        // Selection spanning two blocks.
        let state = EditorState::new(doc).with_selection(Selection::new(1, 5));
        assert!(exit_code(&state).is_none());
    }
}
