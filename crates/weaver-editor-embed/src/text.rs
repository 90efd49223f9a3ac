//! Text storage behind the embedded code buffer.
//!
//! `CodeBuffer` is generic over `TextBuffer` so the inner editing surface can
//! sit on a different backend; `EditorRope` is the ropey-backed default.

use std::ops::Range;

/// Editable text with line lookup.
///
/// All offsets are in Unicode scalar values (chars), not bytes or UTF-16.
pub trait TextBuffer {
    /// Total length in chars.
    fn len_chars(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    fn insert(&mut self, char_offset: usize, text: &str);

    fn delete(&mut self, char_range: Range<usize>);

    /// Replace char range with text.
    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        if !char_range.is_empty() {
            self.delete(char_range.clone());
        }
        if !text.is_empty() {
            self.insert(char_range.start, text);
        }
    }

    fn to_string(&self) -> String;

    /// Char range of the line containing `char_offset`, without its line break.
    ///
    /// An offset equal to `len_chars()` belongs to the last line.
    fn line_range(&self, char_offset: usize) -> Option<Range<usize>>;
}

/// Ropey-backed text buffer.
#[derive(Clone, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }
}

impl TextBuffer for EditorRope {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        self.rope.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        self.rope.remove(char_range);
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }

    fn line_range(&self, char_offset: usize) -> Option<Range<usize>> {
        if char_offset > self.rope.len_chars() {
            return None;
        }
        let line = self.rope.char_to_line(char_offset);
        let start = self.rope.line_to_char(line);
        let mut end = if line + 1 < self.rope.len_lines() {
            self.rope.line_to_char(line + 1)
        } else {
            self.rope.len_chars()
        };
        // Strip the break itself, including CRLF.
        while end > start && matches!(self.rope.char(end - 1), '\n' | '\r') {
            end -= 1;
        }
        Some(start..end)
    }
}
