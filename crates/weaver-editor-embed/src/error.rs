//! Error types for document and buffer operations.

use thiserror::Error;

/// Errors raised while applying edits to either editor's state.
///
/// The synchronization handlers never surface these to their callers; a
/// failed apply is logged and the handler declines, letting the host's
/// default behavior run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EmbedError {
    /// Position lies outside the document.
    #[error("position {pos} out of range (document size {size})")]
    PositionOutOfRange { pos: usize, size: usize },

    /// A text step spans more than one textblock.
    #[error("range {from}..{to} crosses a block boundary")]
    CrossesBlockBoundary { from: usize, to: usize },

    /// Range start is past its end.
    #[error("inverted range {from}..{to}")]
    InvertedRange { from: usize, to: usize },

    /// Inner buffer range is outside the buffer or overlaps a previous change.
    #[error("invalid buffer range {from}..{to} (buffer length {len})")]
    InvalidBufferRange { from: usize, to: usize, len: usize },
}
