//! Outer editor state: a document revision plus its selection.

use crate::error::EmbedError;
use crate::model::Document;
use crate::transaction::Transaction;
use crate::types::{Bias, Direction, Selection};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorState {
    pub doc: Document,
    pub selection: Selection,
}

impl EditorState {
    /// Create a state with the cursor at the first valid position.
    pub fn new(doc: Document) -> Self {
        let selection = doc
            .selection_near(0, Bias::Forward)
            .unwrap_or_default();
        Self { doc, selection }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Apply a transaction, producing the next state.
    pub fn apply(&self, tr: &Transaction) -> Result<Self, EmbedError> {
        let (doc, selection) = tr.apply(&self.doc, self.selection)?;
        Ok(Self { doc, selection })
    }

    /// Whether the collapsed cursor sits at the edge of its textblock in
    /// `dir`.
    ///
    /// Horizontal movement checks the content start/end. Vertical movement
    /// checks for a hard line break between the cursor and the block edge;
    /// without layout information a single-line block is always at its
    /// vertical edge.
    pub fn end_of_textblock(&self, dir: Direction) -> bool {
        let Ok(rp) = self.doc.resolve(self.selection.head) else {
            return false;
        };
        let Some(node) = rp.in_textblock().then(|| &self.doc.blocks()[rp.index]) else {
            return false;
        };
        let offset = rp.parent_offset;

        match dir {
            Direction::Left | Direction::Backward => offset == 0,
            Direction::Right | Direction::Forward => offset >= node.content_size(),
            Direction::Up => !node.text_content().chars().take(offset).any(|c| c == '\n'),
            Direction::Down => !node.text_content().chars().skip(offset).any(|c| c == '\n'),
        }
    }
}
