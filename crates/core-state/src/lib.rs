//! Editor modal state.
//!
//! This crate is deliberately small: the buffer, selection, and undo
//! engine are out of scope for the modal parser and live (as trait
//! interfaces) in `core-actions` instead. All this crate owns is the
//! three-way `Mode` the parser bank is keyed on.

/// The editor's current modal state.
///
/// Representation bits (`1`, `2`, `4`) are chosen so a caller can fold a
/// set of modes into a 3-bit mask without a separate lookup table; see
/// `core_keymap::ModeMask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Insert = 1,
    Normal = 2,
    Visual = 4,
}

impl Mode {
    pub const fn bit(self) -> u8 {
        self as u8
    }
}
