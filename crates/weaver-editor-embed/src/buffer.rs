//! The embedded plain-text buffer.
//!
//! Provides:
//! - `EmbeddedBuffer` trait: what the controller needs from the inner editing surface
//! - `CodeBuffer<T>`: a `TextBuffer`-backed implementation with selection and focus
//! - `InnerTransaction` / `InnerUpdate`: the edit going in and the change set coming out

use std::ops::Range;

use smol_str::SmolStr;

use crate::error::EmbedError;
use crate::text::{EditorRope, TextBuffer};
use crate::types::Selection;

/// One replaced span, reported the way change listeners expect it.
///
/// `from_a..to_a` is in the coordinates of the text before the update,
/// `from_b..to_b` in the coordinates after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSpan {
    pub from_a: usize,
    pub to_a: usize,
    pub from_b: usize,
    pub to_b: usize,
    pub text: SmolStr,
}

impl ChangeSpan {
    /// Net length change introduced by this span.
    pub fn delta(&self) -> isize {
        (self.to_b - self.from_b) as isize - (self.to_a - self.from_a) as isize
    }
}

/// Ordered, non-overlapping spans produced by one inner update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    spans: Vec<ChangeSpan>,
}

impl ChangeSet {
    pub fn new(spans: Vec<ChangeSpan>) -> Self {
        Self { spans }
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Spans in ascending order of `from_a`.
    pub fn iter_changes(&self) -> impl Iterator<Item = &ChangeSpan> {
        self.spans.iter()
    }

    /// Map a pre-change position into post-change coordinates.
    ///
    /// Positions inside a replaced range move to its end.
    pub fn map_pos(&self, pos: usize) -> usize {
        let mut delta: isize = 0;
        for span in &self.spans {
            if pos < span.from_a {
                break;
            }
            if pos <= span.to_a {
                return span.to_b;
            }
            delta += span.delta();
        }
        (pos as isize + delta) as usize
    }
}

/// A text change requested against the buffer, in pre-change coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub from: usize,
    pub to: usize,
    pub insert: SmolStr,
}

impl TextChange {
    pub fn new(range: Range<usize>, insert: impl Into<SmolStr>) -> Self {
        Self {
            from: range.start,
            to: range.end,
            insert: insert.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<SmolStr>) -> Self {
        Self::new(at..at, text)
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self::new(range, "")
    }
}

/// An edit to dispatch to the embedded buffer.
///
/// Changes are given in pre-change coordinates and must not overlap; they
/// are applied in ascending order. An explicit selection is interpreted in
/// post-change coordinates; without one the current selection is mapped
/// through the changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InnerTransaction {
    pub changes: Vec<TextChange>,
    pub selection: Option<Selection>,
}

impl InnerTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn change(mut self, change: TextChange) -> Self {
        self.changes.push(change);
        self
    }

    pub fn select(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }
}

/// What one dispatched transaction did to the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerUpdate {
    pub changes: ChangeSet,
    /// Buffer selection after the update.
    pub selection: Selection,
    pub doc_changed: bool,
}

/// The inner editing surface as seen by the controller.
pub trait EmbeddedBuffer {
    /// Full buffer contents.
    fn text(&self) -> String;

    /// Length in chars.
    fn len_chars(&self) -> usize;

    /// Current primary selection in buffer-local offsets.
    fn selection(&self) -> Selection;

    /// Char range of the line containing `offset`, without its break.
    fn line_range(&self, offset: usize) -> Option<Range<usize>>;

    fn has_focus(&self) -> bool;

    fn focus(&mut self);

    fn blur(&mut self);

    /// Apply a transaction, reporting the resulting change set.
    fn dispatch(&mut self, tr: InnerTransaction) -> Result<InnerUpdate, EmbedError>;
}

/// Plain-text code buffer with a selection and a focus flag.
#[derive(Clone, Default)]
pub struct CodeBuffer<T = EditorRope> {
    text: T,
    selection: Selection,
    focused: bool,
}

impl CodeBuffer<EditorRope> {
    /// Create a buffer seeded with `text`, cursor at the start, unfocused.
    pub fn from_text(text: &str) -> Self {
        Self::new(EditorRope::from_str(text))
    }
}

impl<T: TextBuffer> CodeBuffer<T> {
    pub fn new(text: T) -> Self {
        Self {
            text,
            selection: Selection::cursor(0),
            focused: false,
        }
    }

    fn validate(&self, changes: &[TextChange]) -> Result<(), EmbedError> {
        let len = self.text.len_chars();
        let mut prev_end = 0;
        for change in changes {
            if change.from > change.to || change.to > len || change.from < prev_end {
                return Err(EmbedError::InvalidBufferRange {
                    from: change.from,
                    to: change.to,
                    len,
                });
            }
            prev_end = change.to;
        }
        Ok(())
    }
}

impl<T: TextBuffer> EmbeddedBuffer for CodeBuffer<T> {
    fn text(&self) -> String {
        self.text.to_string()
    }

    fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn line_range(&self, offset: usize) -> Option<Range<usize>> {
        self.text.line_range(offset)
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn dispatch(&mut self, tr: InnerTransaction) -> Result<InnerUpdate, EmbedError> {
        self.validate(&tr.changes)?;

        let mut spans = Vec::with_capacity(tr.changes.len());
        let mut delta: isize = 0;
        for change in &tr.changes {
            let inserted = change.insert.chars().count();
            let from_b = (change.from as isize + delta) as usize;
            let to_b = from_b + inserted;
            self.text
                .replace(from_b..from_b + (change.to - change.from), &change.insert);
            spans.push(ChangeSpan {
                from_a: change.from,
                to_a: change.to,
                from_b,
                to_b,
                text: change.insert.clone(),
            });
            delta += inserted as isize - (change.to - change.from) as isize;
        }

        // Empty insertions at a point are not changes.
        let spans: Vec<_> = spans
            .into_iter()
            .filter(|s| s.from_a != s.to_a || !s.text.is_empty())
            .collect();
        let changes = ChangeSet::new(spans);
        let len = self.text.len_chars();
        self.selection = match tr.selection {
            Some(sel) => sel.clamp(len),
            None => Selection::new(
                changes.map_pos(self.selection.anchor),
                changes.map_pos(self.selection.head),
            )
            .clamp(len),
        };

        Ok(InnerUpdate {
            doc_changed: !changes.is_empty(),
            changes,
            selection: self.selection,
        })
    }
}
