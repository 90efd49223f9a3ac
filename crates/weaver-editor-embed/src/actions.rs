//! Key input types and the keymaps of both editors.
//!
//! Platform-agnostic key representation. Platform code converts native key
//! events into `KeyCombo`s; the keymap functions here turn them into the
//! commands the embedded view and the outer arrow handler understand.

use smol_str::SmolStr;

use crate::types::Direction;

/// Keys the embedded buffer and the outer arrow handler care about.
///
/// Platform code maps everything else to `Unidentified`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key, as produced with the current layout.
    Character(SmolStr),
    Enter,
    Tab,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Unidentified,
}

impl Key {
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// Case-insensitive match against a single character key.
    fn is_char(&self, c: &str) -> bool {
        matches!(self, Self::Character(s) if s.eq_ignore_ascii_case(c))
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    /// Cmd on mac, Ctrl elsewhere.
    pub fn primary(is_mac: bool) -> Self {
        if is_mac { Self::META } else { Self::CTRL }
    }

    pub fn primary_shift(is_mac: bool) -> Self {
        Self {
            shift: true,
            ..Self::primary(is_mac)
        }
    }
}

/// A key combination for triggering an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn ctrl(key: Key) -> Self {
        Self::with_modifiers(key, Modifiers::CTRL)
    }

    pub fn meta(key: Key) -> Self {
        Self::with_modifiers(key, Modifiers::META)
    }

    pub fn shift(key: Key) -> Self {
        Self::with_modifiers(key, Modifiers::SHIFT)
    }

    pub fn primary(key: Key, is_mac: bool) -> Self {
        Self::with_modifiers(key, Modifiers::primary(is_mac))
    }

    pub fn primary_shift(key: Key, is_mac: bool) -> Self {
        Self::with_modifiers(key, Modifiers::primary_shift(is_mac))
    }
}

/// Outcome of routing a keydown through the embedded keymaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeydownResult {
    /// A binding consumed the key; suppress the default.
    Handled,
    /// Let the focused editor's default handling run.
    NotHandled,
}

impl From<bool> for KeydownResult {
    fn from(handled: bool) -> Self {
        if handled {
            Self::Handled
        } else {
            Self::NotHandled
        }
    }
}

/// Commands bound in the embedded buffer's keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InnerCommand {
    /// Leave the buffer if the cursor is on its first/last line.
    EscapeLine(Direction),
    /// Leave the buffer if the cursor is at its start/end.
    EscapeChar(Direction),
    /// Insert a paragraph after the code block and move there.
    ExitCode,
    Undo,
    Redo,
}

/// Resolve a key combination against the embedded buffer's keymap.
///
/// History keys use Cmd on mac and Ctrl elsewhere; `Ctrl-Enter` is the same
/// on every platform.
pub fn inner_command(combo: &KeyCombo, is_mac: bool) -> Option<InnerCommand> {
    if combo.modifiers == Modifiers::NONE {
        return match combo.key {
            Key::ArrowUp => Some(InnerCommand::EscapeLine(Direction::Up)),
            Key::ArrowDown => Some(InnerCommand::EscapeLine(Direction::Down)),
            Key::ArrowLeft => Some(InnerCommand::EscapeChar(Direction::Left)),
            Key::ArrowRight => Some(InnerCommand::EscapeChar(Direction::Right)),
            _ => None,
        };
    }

    if combo.key == Key::Enter && combo.modifiers == Modifiers::CTRL {
        return Some(InnerCommand::ExitCode);
    }

    if combo.key.is_char("z") {
        if combo.modifiers == Modifiers::primary(is_mac) {
            return Some(InnerCommand::Undo);
        }
        if combo.modifiers == Modifiers::primary_shift(is_mac) {
            return Some(InnerCommand::Redo);
        }
    }

    if combo.key.is_char("y") && combo.modifiers == Modifiers::primary(is_mac) {
        return Some(InnerCommand::Redo);
    }

    None
}

/// Direction for an unmodified arrow key, as bound in the outer editor.
pub fn arrow_direction(combo: &KeyCombo) -> Option<Direction> {
    if combo.modifiers != Modifiers::NONE {
        return None;
    }
    match combo.key {
        Key::ArrowLeft => Some(Direction::Left),
        Key::ArrowRight => Some(Direction::Right),
        Key::ArrowUp => Some(Direction::Up),
        Key::ArrowDown => Some(Direction::Down),
        _ => None,
    }
}
