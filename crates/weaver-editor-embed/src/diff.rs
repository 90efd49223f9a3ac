//! Minimal single-region diff between two texts.
//!
//! Used when the outer document changes a code block's text: instead of
//! replacing the whole buffer, only the span between the longest common
//! prefix and the longest common suffix is rewritten.

use smol_str::SmolStr;

/// A single replacement in char offsets of the old text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub from: usize,
    pub to: usize,
    pub insert: SmolStr,
}

/// Compute the smallest single edit turning `current` into `new`.
///
/// Returns `None` when the texts are equal. The suffix scan never moves
/// past the end of the common prefix, so the returned range is always
/// well-formed even for repeated characters (`"aa"` → `"aaa"`).
pub fn minimal_edit(current: &str, new: &str) -> Option<TextEdit> {
    if current == new {
        return None;
    }

    let cur: Vec<char> = current.chars().collect();
    let next: Vec<char> = new.chars().collect();

    let mut start = 0;
    while start < cur.len() && start < next.len() && cur[start] == next[start] {
        start += 1;
    }

    let mut cur_end = cur.len();
    let mut new_end = next.len();
    while cur_end > start && new_end > start && cur[cur_end - 1] == next[new_end - 1] {
        cur_end -= 1;
        new_end -= 1;
    }

    Some(TextEdit {
        from: start,
        to: cur_end,
        insert: next[start..new_end].iter().collect::<String>().into(),
    })
}
