//! Key event types shared by the keymap parser and its host.
//!
//! This crate only describes *what a keystroke looks like*; it owns no
//! policy about what a key means in any given mode. That lives in
//! `core-keymap`.

use std::fmt;

/// A single normalized keystroke, as delivered by the host (terminal,
/// GUI toolkit, etc) after its own raw-event translation.
///
/// Equality is structural: two `Key` values are equal iff their variant
/// and payload match exactly. The parser never interprets an unknown key
/// — it simply fails to match it against any grammar rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Esc,
    Enter,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL  = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const SHIFT = 0b0000_0100;
    }
}

/// A keystroke plus whatever modifiers the host reported alongside it.
///
/// The built-in grammar table in `core-keymap` only ever matches
/// unmodified `Key`s; `mods` is carried for host-side bookkeeping (status
/// line rendering, future chorded bindings) and is not consulted by the
/// parser bank today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            mods: KeyModifiers::empty(),
        }
    }

    pub const fn with_mods(key: Key, mods: KeyModifiers) -> Self {
        Self { key, mods }
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.key, self.mods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn key_event_display_contains_variant() {
        let k = KeyEvent::with_mods(Key::Char('x'), KeyModifiers::CTRL);
        let s = format!("{k}");
        assert!(s.contains("Char"));
    }

    #[test]
    fn bare_key_converts_with_no_modifiers() {
        let evt: KeyEvent = Key::Esc.into();
        assert_eq!(evt.mods, KeyModifiers::empty());
    }

    #[test]
    fn structural_equality_distinguishes_modifiers() {
        let a = KeyEvent::new(Key::Char('d'));
        let b = KeyEvent::with_mods(Key::Char('d'), KeyModifiers::CTRL);
        assert_ne!(a, b);
    }
}
