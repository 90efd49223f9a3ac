//! Configuration for embedded code views and the reference session.

use serde::Deserialize;

/// Settings shared by every embedded view in an editor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Bind history keys to Cmd instead of Ctrl.
    pub mac_keys: bool,
    /// Number of document revisions kept for undo.
    pub history_depth: usize,
    /// Scroll the outer selection into view when the cursor leaves a buffer.
    pub scroll_on_escape: bool,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            mac_keys: false,
            history_depth: 100,
            scroll_on_escape: true,
        }
    }
}
