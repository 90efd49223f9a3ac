//! weaver-editor-embed: code-block editors embedded in a rich-text document.
//!
//! This crate provides:
//! - `CodeBlockView` - controller keeping one plain-text buffer in sync with
//!   one code block, in both directions, without echo loops
//! - `EmbeddedBuffer` trait and `CodeBuffer<T>` - the inner editing surface,
//!   generic over `TextBuffer`
//! - `OuterEditor` trait - what views need from the host editor
//! - `ArrowHandler` and the escape helpers - moving the cursor across a code
//!   block's boundary in either direction
//! - `Document`, `Transaction`, `EditorState` - a small block document model
//!   for hosts that don't bring their own
//! - `EditorSession` - a reference host wiring all of the above together

pub mod actions;
pub mod buffer;
pub mod config;
pub mod diff;
pub mod error;
pub mod history;
pub mod model;
pub mod navigation;
pub mod outer;
pub mod session;
pub mod state;
pub mod text;
pub mod transaction;
pub mod types;
pub mod view;

pub use actions::{InnerCommand, Key, KeyCombo, KeydownResult, Modifiers};
pub use buffer::{
    ChangeSet, ChangeSpan, CodeBuffer, EmbeddedBuffer, InnerTransaction, InnerUpdate, TextChange,
};
pub use config::EmbedConfig;
pub use diff::{TextEdit, minimal_edit};
pub use error::EmbedError;
pub use history::History;
pub use model::{Document, DocumentBuilder, Node, NodeId, NodeType, ResolvedPos};
pub use navigation::{ArrowHandler, EscapeUnit, at_buffer_edge, escape_target, exit_code};
pub use outer::OuterEditor;
pub use session::{EditorSession, SessionHandle, SessionView};
pub use smol_str::SmolStr;
pub use state::EditorState;
pub use text::{EditorRope, TextBuffer};
pub use transaction::{Step, Transaction};
pub use types::{Bias, Direction, Selection};
pub use view::{CodeBlockView, PositionResolver};
