//! Core selection and direction types shared by both editors.
//!
//! Offsets are plain `usize` values. Inside the embedded buffer they are
//! buffer-local char offsets; on the outer document they are absolute
//! document positions.

use std::ops::Range;

/// Text selection with anchor and head positions.
///
/// The anchor is where the selection started, the head is where the cursor is now.
/// They may be in any order - use `from()` and `to()` for ordered bounds.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Where selection started
    pub anchor: usize,
    /// Where cursor is now
    pub head: usize,
}

impl Selection {
    /// Create a new selection.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (cursor position).
    pub fn cursor(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    /// Lower bound of the selection.
    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Upper bound of the selection.
    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Check if the selection is collapsed (empty, cursor only).
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Convert to a Range<usize> (ordered).
    pub fn to_range(&self) -> Range<usize> {
        self.from()..self.to()
    }

    /// Shift both ends by `offset`, preserving direction.
    ///
    /// Used to translate a buffer-local selection into outer coordinates.
    pub fn offset_by(&self, offset: usize) -> Self {
        Self {
            anchor: self.anchor + offset,
            head: self.head + offset,
        }
    }

    /// Clamp both ends into `0..=len`.
    pub fn clamp(&self, len: usize) -> Self {
        Self {
            anchor: self.anchor.min(len),
            head: self.head.min(len),
        }
    }
}

/// A directional movement intent.
///
/// `Left`/`Right` and `Backward`/`Forward` are the same for left-to-right
/// text; both are kept because hosts bind them separately.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Forward,
    Backward,
}

impl Direction {
    /// -1 for movement toward the document start, 1 toward the end.
    pub fn side(self) -> i8 {
        match self {
            Self::Left | Self::Up | Self::Backward => -1,
            Self::Right | Self::Down | Self::Forward => 1,
        }
    }

    pub fn is_backward(self) -> bool {
        self.side() < 0
    }
}

/// Search bias used when resolving the nearest valid cursor position.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Bias {
    Backward,
    Forward,
}

impl From<Direction> for Bias {
    fn from(dir: Direction) -> Self {
        if dir.is_backward() {
            Bias::Backward
        } else {
            Bias::Forward
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        let sel = Selection::new(5, 10);
        assert_eq!(sel.from(), 5);
        assert_eq!(sel.to(), 10);

        let sel = Selection::new(10, 5);
        assert_eq!(sel.from(), 5);
        assert_eq!(sel.to(), 10);
        assert_eq!(sel.to_range(), 5..10);
    }

    #[test]
    fn test_selection_cursor() {
        let sel = Selection::cursor(7);
        assert!(sel.is_empty());
        assert_eq!(sel.from(), 7);
        assert_eq!(sel.to(), 7);
    }

    #[test]
    fn test_offset_keeps_direction() {
        let sel = Selection::new(4, 1).offset_by(11);
        assert_eq!(sel.anchor, 15);
        assert_eq!(sel.head, 12);
    }

    #[test]
    fn test_direction_sides() {
        assert_eq!(Direction::Left.side(), -1);
        assert_eq!(Direction::Up.side(), -1);
        assert_eq!(Direction::Backward.side(), -1);
        assert_eq!(Direction::Right.side(), 1);
        assert_eq!(Direction::Down.side(), 1);
        assert_eq!(Direction::Forward.side(), 1);
        assert_eq!(Bias::from(Direction::Up), Bias::Backward);
    }
}
