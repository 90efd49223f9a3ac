//! Outer document transactions.
//!
//! A transaction collects steps and an optional selection, and is applied
//! atomically: either every step succeeds and a new revision is produced,
//! or the document is left untouched.

use smol_str::SmolStr;

use crate::error::EmbedError;
use crate::model::{Document, NodeType};
use crate::types::Selection;

/// A single document edit, in the coordinates of the document as left by
/// the previous step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Replace a range inside one textblock with a text node.
    ReplaceText { from: usize, to: usize, text: SmolStr },
    /// Delete a range inside one textblock.
    Delete { from: usize, to: usize },
    /// Insert a block at a document-level position.
    InsertBlock {
        pos: usize,
        node_type: NodeType,
        text: SmolStr,
    },
    /// Change the type of the block starting at `pos`.
    SetBlockType { pos: usize, node_type: NodeType },
    /// Remove the block starting at `pos`.
    RemoveBlock { pos: usize },
}

impl Step {
    fn apply(&self, doc: &Document) -> Result<Document, EmbedError> {
        match self {
            Step::ReplaceText { from, to, text } => doc.replace_text(*from, *to, text),
            Step::Delete { from, to } => doc.replace_text(*from, *to, ""),
            Step::InsertBlock {
                pos,
                node_type,
                text,
            } => doc.insert_block(*pos, *node_type, text),
            Step::SetBlockType { pos, node_type } => doc.set_block_type(*pos, *node_type),
            Step::RemoveBlock { pos } => doc.remove_block(*pos),
        }
    }

    /// Map a position from before this step to after it.
    ///
    /// `before` is the document the step applies to.
    fn map(&self, pos: usize, before: &Document) -> usize {
        match self {
            Step::ReplaceText { from, to, text } => {
                map_replaced(pos, *from, *to, text.chars().count())
            }
            Step::Delete { from, to } => map_replaced(pos, *from, *to, 0),
            Step::InsertBlock { pos: at, text, .. } => {
                if pos < *at {
                    pos
                } else {
                    pos + text.chars().count() + 2
                }
            }
            Step::SetBlockType { .. } => pos,
            Step::RemoveBlock { pos: at } => {
                let size = before
                    .node_at(at + 1)
                    .map(|node| node.node_size())
                    .unwrap_or(0);
                if pos <= *at {
                    pos
                } else if pos >= at + size {
                    pos - size
                } else {
                    *at
                }
            }
        }
    }
}

/// Positions at the start of a replaced range stick to its start, positions
/// further inside move past the new content.
fn map_replaced(pos: usize, from: usize, to: usize, inserted: usize) -> usize {
    if pos < from {
        pos
    } else if pos > to {
        pos - (to - from) + inserted
    } else if pos == from && from != to {
        from
    } else {
        from + inserted
    }
}

/// A pending set of changes to the outer document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    steps: Vec<Step>,
    selection: Option<Selection>,
    scroll_into_view: bool,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selection the document should have once the transaction is
    /// applied.
    ///
    /// The selection is taken against the resulting document: later steps do
    /// not remap it. Callers translating from another coordinate space (the
    /// embedded buffer's post-change offsets) can therefore set it up front.
    pub fn set_selection(&mut self, selection: Selection) -> &mut Self {
        self.selection = Some(selection);
        self
    }

    pub fn replace_with(&mut self, from: usize, to: usize, text: impl Into<SmolStr>) -> &mut Self {
        self.steps.push(Step::ReplaceText {
            from,
            to,
            text: text.into(),
        });
        self
    }

    pub fn delete(&mut self, from: usize, to: usize) -> &mut Self {
        self.steps.push(Step::Delete { from, to });
        self
    }

    pub fn insert_block(
        &mut self,
        pos: usize,
        node_type: NodeType,
        text: impl Into<SmolStr>,
    ) -> &mut Self {
        self.steps.push(Step::InsertBlock {
            pos,
            node_type,
            text: text.into(),
        });
        self
    }

    pub fn set_block_type(&mut self, pos: usize, node_type: NodeType) -> &mut Self {
        self.steps.push(Step::SetBlockType { pos, node_type });
        self
    }

    pub fn remove_block(&mut self, pos: usize) -> &mut Self {
        self.steps.push(Step::RemoveBlock { pos });
        self
    }

    /// Ask the host to scroll the resulting selection into view.
    pub fn scroll_into_view(&mut self) -> &mut Self {
        self.scroll_into_view = true;
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn scrolls_into_view(&self) -> bool {
        self.scroll_into_view
    }

    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Apply every step to `doc`, returning the new revision and the
    /// resulting selection (explicit, or `old_selection` mapped through the steps).
    pub(crate) fn apply(
        &self,
        doc: &Document,
        old_selection: Selection,
    ) -> Result<(Document, Selection), EmbedError> {
        let mut current = doc.clone();
        let mut mapped = old_selection;
        for step in &self.steps {
            let next = step.apply(&current)?;
            mapped = Selection::new(
                step.map(mapped.anchor, &current),
                step.map(mapped.head, &current),
            );
            current = next;
        }

        let selection = match self.selection {
            Some(sel) => {
                current.resolve(sel.anchor)?;
                current.resolve(sel.head)?;
                sel
            }
            None => mapped,
        };
        Ok((current, selection))
    }
}
