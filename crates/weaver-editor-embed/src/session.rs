//! Reference host: an outer editor that owns code views.
//!
//! `EditorSession` holds the outer state, its history and one
//! `CodeBlockView` per code block. After every dispatch it syncs views
//! against the new document the way a rich-text editor reconciles node
//! views: surviving blocks get `update`, blocks whose type changed or that
//! disappeared lose their view, new code blocks get one. When the outer
//! editor has focus and its selection lands inside a code block, the
//! selection is handed to that block's view.
//!
//! Views reach the session through `SessionHandle`, a weak handle, so the
//! session and its views don't keep each other alive.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::actions::{KeyCombo, KeydownResult};
use crate::config::EmbedConfig;
use crate::history::History;
use crate::model::{Document, Node, NodeId};
use crate::navigation::ArrowHandler;
use crate::outer::OuterEditor;
use crate::state::EditorState;
use crate::transaction::Transaction;
use crate::view::{CodeBlockView, PositionResolver};

/// A code view as owned by a session.
pub type SessionView = CodeBlockView<SessionHandle>;

struct SessionInner {
    state: RefCell<EditorState>,
    /// Whether the outer editor (rather than a code view) has input focus.
    focused: Cell<bool>,
    history: RefCell<History>,
    views: RefCell<Vec<(NodeId, Rc<SessionView>)>>,
    config: EmbedConfig,
}

impl SessionInner {
    fn dispatch(self: &Rc<Self>, tr: Transaction) {
        let before = self.state.borrow().clone();
        let next = match before.apply(&tr) {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!("dropping transaction: {e}");
                return;
            }
        };

        if tr.doc_changed() {
            self.history.borrow_mut().record(before);
        }
        *self.state.borrow_mut() = next;
        if tr.scrolls_into_view() {
            tracing::trace!(head = self.state.borrow().selection.head, "scroll into view");
        }

        self.sync_views();
        self.route_selection();
    }

    /// Reconcile views with the current document.
    fn sync_views(self: &Rc<Self>) {
        let doc = self.state.borrow().doc.clone();
        let mut old: HashMap<NodeId, Rc<SessionView>> = self.views.take().into_iter().collect();
        let mut next = Vec::new();

        for node in doc.blocks() {
            if let Some(view) = old.remove(&node.id()) {
                if view.update(node) {
                    next.push((node.id(), view));
                    continue;
                }
                view.destroy();
            }
            if node.node_type().is_code() {
                next.push((node.id(), self.create_view(node)));
            }
        }

        for view in old.into_values() {
            view.destroy();
        }
        tracing::trace!(views = next.len(), "synced code views");
        *self.views.borrow_mut() = next;
    }

    fn create_view(self: &Rc<Self>, node: &Node) -> Rc<SessionView> {
        let id = node.id();
        let lookup = Rc::downgrade(self);
        let get_pos: PositionResolver = Box::new(move || {
            let inner = lookup.upgrade()?;
            inner.state.borrow().doc.position_of(id)
        });
        Rc::new(CodeBlockView::new(
            node.clone(),
            SessionHandle(Rc::downgrade(self)),
            get_pos,
            self.config.clone(),
        ))
    }

    /// Hand a selection inside a code block to that block's view.
    fn route_selection(&self) {
        if !self.focused.get() {
            return;
        }
        let state = self.state.borrow().clone();
        let sel = state.selection;
        let (Ok(head), Ok(anchor)) = (state.doc.resolve(sel.head), state.doc.resolve(sel.anchor))
        else {
            return;
        };
        if !head.in_textblock() || head.index != anchor.index {
            return;
        }
        let node = &state.doc.blocks()[head.index];
        if !node.node_type().is_code() {
            return;
        }
        let Some(view) = self.view_for(node.id()) else {
            return;
        };

        tracing::trace!(node = ?node.id(), "selection entered code block");
        self.focused.set(false);
        view.set_selection(anchor.parent_offset, head.parent_offset);
    }

    fn view_for(&self, id: NodeId) -> Option<Rc<SessionView>> {
        self.views
            .borrow()
            .iter()
            .find(|(view_id, _)| *view_id == id)
            .map(|(_, view)| view.clone())
    }

    fn views(&self) -> Vec<Rc<SessionView>> {
        self.views.borrow().iter().map(|(_, view)| view.clone()).collect()
    }

    fn focus(&self) {
        for view in self.views() {
            view.blur();
        }
        self.focused.set(true);
        self.route_selection();
    }

    fn restore(self: &Rc<Self>, state: EditorState) {
        *self.state.borrow_mut() = state;
        self.sync_views();
        self.route_selection();
    }

    fn undo(self: &Rc<Self>) -> bool {
        let current = self.state.borrow().clone();
        let prev = self.history.borrow_mut().undo(current);
        match prev {
            Some(prev) => {
                self.restore(prev);
                true
            }
            None => false,
        }
    }

    fn redo(self: &Rc<Self>) -> bool {
        let current = self.state.borrow().clone();
        let next = self.history.borrow_mut().redo(current);
        match next {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }
}

/// Weak handle through which views and handlers drive a session.
///
/// Once the session is dropped, reads see an empty document and writes are
/// ignored.
#[derive(Clone)]
pub struct SessionHandle(Weak<SessionInner>);

impl OuterEditor for SessionHandle {
    fn state(&self) -> EditorState {
        match self.0.upgrade() {
            Some(inner) => inner.state.borrow().clone(),
            None => EditorState::new(Document::default()),
        }
    }

    fn dispatch(&self, tr: Transaction) {
        if let Some(inner) = self.0.upgrade() {
            inner.dispatch(tr);
        }
    }

    fn focus(&self) {
        if let Some(inner) = self.0.upgrade() {
            inner.focus();
        }
    }

    fn has_focus(&self) -> bool {
        self.0.upgrade().is_some_and(|inner| inner.focused.get())
    }

    fn undo(&self) -> bool {
        self.0.upgrade().is_some_and(|inner| inner.undo())
    }

    fn redo(&self) -> bool {
        self.0.upgrade().is_some_and(|inner| inner.redo())
    }
}

/// An outer editor with embedded code views.
pub struct EditorSession {
    inner: Rc<SessionInner>,
}

impl EditorSession {
    /// Create a focused session over `doc`, with a view for every code block.
    pub fn new(doc: Document, config: EmbedConfig) -> Self {
        let inner = Rc::new(SessionInner {
            state: RefCell::new(EditorState::new(doc)),
            focused: Cell::new(true),
            history: RefCell::new(History::new(config.history_depth)),
            views: RefCell::new(Vec::new()),
            config,
        });
        inner.sync_views();
        inner.route_selection();
        Self { inner }
    }

    /// A handle implementing `OuterEditor` for this session.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle(Rc::downgrade(&self.inner))
    }

    pub fn state(&self) -> EditorState {
        self.inner.state.borrow().clone()
    }

    pub fn dispatch(&self, tr: Transaction) {
        self.inner.dispatch(tr);
    }

    /// Views in document order.
    pub fn views(&self) -> Vec<Rc<SessionView>> {
        self.inner.views()
    }

    pub fn view_for(&self, id: NodeId) -> Option<Rc<SessionView>> {
        self.inner.view_for(id)
    }

    /// The view whose buffer currently has input focus.
    pub fn focused_view(&self) -> Option<Rc<SessionView>> {
        self.views().into_iter().find(|view| view.has_focus())
    }

    /// Whether the outer editor itself has input focus.
    pub fn has_focus(&self) -> bool {
        self.inner.focused.get()
    }

    pub fn focus(&self) {
        self.inner.focus();
    }

    /// Route a keydown to whichever editor has focus.
    ///
    /// A focused code view sees the key first. Otherwise the outer editor's
    /// arrow handler gets a chance to move the cursor into a code block.
    pub fn handle_key(&self, combo: &KeyCombo) -> KeydownResult {
        if let Some(view) = self.focused_view() {
            return view.handle_key(combo).into();
        }
        if !self.has_focus() {
            return KeydownResult::NotHandled;
        }
        ArrowHandler::new(self.handle()).handle_key(combo).into()
    }

    /// The user clicked inside a code block: its view takes focus.
    pub fn click_node(&self, id: NodeId) -> bool {
        let Some(view) = self.view_for(id) else {
            tracing::debug!(node = ?id, "click on a node without a code view");
            return false;
        };
        for other in self.views() {
            other.blur();
        }
        self.inner.focused.set(false);
        view.select_node();
        true
    }

    pub fn undo(&self) -> bool {
        self.inner.undo()
    }

    pub fn redo(&self) -> bool {
        self.inner.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.inner.history.borrow().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.inner.history.borrow().can_redo()
    }
}
