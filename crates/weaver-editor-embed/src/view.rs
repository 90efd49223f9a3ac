//! Embedded code view: one inner buffer bound to one code block.
//!
//! `CodeBlockView` keeps a plain-text buffer in sync with the text of a
//! code block in the outer document:
//!
//! - outer → inner: `update` diffs the block's new text against the buffer
//!   and applies the smallest single replacement
//! - inner → outer: every buffer update flows through `forward_update`,
//!   which maps the change spans and selection into outer positions and
//!   dispatches them as one transaction
//!
//! Each direction runs with the view's `updating` flag raised so the
//! echo coming back from the other side is dropped.

use std::cell::{Cell, RefCell};

use crate::actions::{InnerCommand, KeyCombo, inner_command};
use crate::buffer::{CodeBuffer, EmbeddedBuffer, InnerTransaction, InnerUpdate, TextChange};
use crate::config::EmbedConfig;
use crate::diff::minimal_edit;
use crate::error::EmbedError;
use crate::model::{Node, NodeType};
use crate::navigation::{EscapeUnit, at_buffer_edge, escape_target, exit_code};
use crate::outer::OuterEditor;
use crate::transaction::Transaction;
use crate::types::{Direction, Selection};

/// Yields the tracked node's current start position in the outer document,
/// or `None` once the node is gone.
pub type PositionResolver = Box<dyn Fn() -> Option<usize>>;

/// Raises a reentrancy flag for its lifetime and restores the previous
/// value on drop, so every exit path (including early returns) resets it.
struct UpdateGuard<'a> {
    flag: &'a Cell<bool>,
    prev: bool,
}

impl<'a> UpdateGuard<'a> {
    fn new(flag: &'a Cell<bool>) -> Self {
        let prev = flag.replace(true);
        Self { flag, prev }
    }
}

impl Drop for UpdateGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(self.prev);
    }
}

/// Controller for one embedded code buffer.
pub struct CodeBlockView<O, B = CodeBuffer> {
    node: RefCell<Node>,
    outer: O,
    get_pos: PositionResolver,
    buffer: RefCell<B>,
    updating: Cell<bool>,
    config: EmbedConfig,
}

impl<O: OuterEditor> CodeBlockView<O, CodeBuffer> {
    /// Create a view for `node`, seeding a fresh buffer with its text.
    pub fn new(node: Node, outer: O, get_pos: PositionResolver, config: EmbedConfig) -> Self {
        let buffer = CodeBuffer::from_text(node.text_content());
        Self::with_buffer(node, outer, get_pos, buffer, config)
    }
}

impl<O: OuterEditor, B: EmbeddedBuffer> CodeBlockView<O, B> {
    /// Create a view around an existing buffer.
    ///
    /// The buffer is expected to already hold `node`'s text.
    pub fn with_buffer(
        node: Node,
        outer: O,
        get_pos: PositionResolver,
        buffer: B,
        config: EmbedConfig,
    ) -> Self {
        tracing::debug!(node = ?node.id(), len = node.content_size(), "creating code view");
        Self {
            node: RefCell::new(node),
            outer,
            get_pos,
            buffer: RefCell::new(buffer),
            updating: Cell::new(false),
            config,
        }
    }

    /// The node this view currently tracks.
    pub fn node(&self) -> Node {
        self.node.borrow().clone()
    }

    pub fn node_type(&self) -> NodeType {
        self.node.borrow().node_type()
    }

    /// Current buffer text.
    pub fn text(&self) -> String {
        self.buffer.borrow().text()
    }

    /// Current buffer selection, buffer-local.
    pub fn selection(&self) -> Selection {
        self.buffer.borrow().selection()
    }

    pub fn has_focus(&self) -> bool {
        self.buffer.borrow().has_focus()
    }

    pub fn is_updating(&self) -> bool {
        self.updating.get()
    }

    /// Adopt a new revision of the tracked node.
    ///
    /// Returns false when the node's type changed; the host must then
    /// destroy this view and create a new one. While this view is itself
    /// pushing an edit into the outer document, the echo is accepted
    /// without touching the buffer.
    pub fn update(&self, node: &Node) -> bool {
        if node.node_type() != self.node_type() {
            tracing::debug!(
                old = self.node_type().name(),
                new = node.node_type().name(),
                "node type changed, view must be recreated"
            );
            return false;
        }
        *self.node.borrow_mut() = node.clone();
        if self.updating.get() {
            return true;
        }

        let current = self.buffer.borrow().text();
        let Some(edit) = minimal_edit(&current, node.text_content()) else {
            return true;
        };

        tracing::trace!(from = edit.from, to = edit.to, insert = %edit.insert, "resyncing buffer");
        let _guard = UpdateGuard::new(&self.updating);
        let tr = InnerTransaction::new().change(TextChange::new(edit.from..edit.to, edit.insert));
        let result = self.buffer.borrow_mut().dispatch(tr);
        match result {
            Ok(update) => self.forward_update(&update),
            Err(e) => tracing::warn!("failed to resync code buffer: {e}"),
        }
        true
    }

    /// Forward a buffer update into the outer document.
    ///
    /// Skipped while the view is applying its own update, and while the
    /// buffer is not the focused editing target.
    pub fn forward_update(&self, update: &InnerUpdate) {
        if self.updating.get() || !self.buffer.borrow().has_focus() {
            return;
        }
        let Some(start) = (self.get_pos)() else {
            tracing::warn!(node = ?self.node.borrow().id(), "tracked node has no position");
            return;
        };

        let offset = start + 1;
        let selection = update.selection.offset_by(offset);
        if !update.doc_changed && self.outer.state().selection == selection {
            return;
        }

        // Net length change of the spans already applied. It can exceed
        // `offset` when an earlier span deleted more than the block's start.
        let mut shift: isize = 0;
        let mut tr = Transaction::new();
        tr.set_selection(selection);
        for span in update.changes.iter_changes() {
            let from = (offset + span.from_a).saturating_add_signed(shift);
            let to = (offset + span.to_a).saturating_add_signed(shift);
            if span.text.is_empty() {
                tr.delete(from, to);
            } else {
                tr.replace_with(from, to, span.text.clone());
            }
            shift += span.delta();
        }

        tracing::trace!(
            steps = tr.steps().len(),
            anchor = selection.anchor,
            head = selection.head,
            "forwarding buffer update"
        );
        let _guard = UpdateGuard::new(&self.updating);
        self.outer.dispatch(tr);
    }

    /// Apply an edit made in the buffer itself and forward it.
    pub fn dispatch_inner(&self, tr: InnerTransaction) -> Result<(), EmbedError> {
        let update = self.buffer.borrow_mut().dispatch(tr)?;
        self.forward_update(&update);
        Ok(())
    }

    /// Focus the buffer and select `anchor..head` (buffer-local).
    ///
    /// Called by the host when the outer selection moves into this block;
    /// the outer document already has this selection, so nothing is
    /// forwarded back.
    pub fn set_selection(&self, anchor: usize, head: usize) {
        let _guard = UpdateGuard::new(&self.updating);
        let result = {
            let mut buffer = self.buffer.borrow_mut();
            buffer.focus();
            buffer.dispatch(InnerTransaction::new().select(Selection::new(anchor, head)))
        };
        match result {
            Ok(update) => self.forward_update(&update),
            Err(e) => tracing::warn!("failed to set buffer selection: {e}"),
        }
    }

    /// The host selected the whole block (e.g. a click on its boundary).
    pub fn select_node(&self) {
        self.buffer.borrow_mut().focus();
    }

    /// Every event inside the buffer belongs to this view.
    pub fn stop_event(&self) -> bool {
        true
    }

    pub fn blur(&self) {
        self.buffer.borrow_mut().blur();
    }

    /// Tear down: the host removed the block or replaced this view.
    pub fn destroy(&self) {
        tracing::debug!(node = ?self.node.borrow().id(), "destroying code view");
        self.blur();
    }

    /// The buffer's keymap. Returns true when the key was consumed.
    pub fn handle_key(&self, combo: &KeyCombo) -> bool {
        match inner_command(combo, self.config.mac_keys) {
            Some(InnerCommand::EscapeLine(dir)) => self.maybe_escape_line(dir),
            Some(InnerCommand::EscapeChar(dir)) => self.maybe_escape_char(dir),
            Some(InnerCommand::ExitCode) => self.exit_code(),
            Some(InnerCommand::Undo) => self.outer.undo(),
            Some(InnerCommand::Redo) => self.outer.redo(),
            None => false,
        }
    }

    pub fn maybe_escape_char(&self, dir: Direction) -> bool {
        self.maybe_escape(EscapeUnit::Char, dir)
    }

    pub fn maybe_escape_line(&self, dir: Direction) -> bool {
        self.maybe_escape(EscapeUnit::Line, dir)
    }

    /// Move the cursor out into the outer document when the buffer has no
    /// more content in `dir`.
    ///
    /// Always returns false: the move happens as a side effect and focus
    /// leaves the buffer, so the buffer's own default movement is a no-op.
    fn maybe_escape(&self, unit: EscapeUnit, dir: Direction) -> bool {
        if !at_buffer_edge(&*self.buffer.borrow(), unit, dir) {
            return false;
        }
        let Some(start) = (self.get_pos)() else {
            return false;
        };
        let target = escape_target(start, self.node.borrow().node_size(), dir);

        if let Some(selection) = self.outer.selection_near(target, dir.into()) {
            tracing::trace!(?dir, ?unit, target, head = selection.head, "leaving code block");
            let mut tr = Transaction::new();
            tr.set_selection(selection);
            if self.config.scroll_on_escape {
                tr.scroll_into_view();
            }
            self.outer.dispatch(tr);
            self.outer.focus();
        }
        false
    }

    /// Leave the block through a new paragraph inserted after it.
    fn exit_code(&self) -> bool {
        let Some(tr) = exit_code(&self.outer.state()) else {
            return false;
        };
        self.outer.dispatch(tr);
        self.outer.focus();
        true
    }
}
