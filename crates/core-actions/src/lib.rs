//! core-actions: applies a parsed `Cmd` to an editor.
//!
//! This crate owns the boundary between the modal parser (`core-keymap`)
//! and everything it cannot see: the rope buffer, the renderer, the
//! system pasteboard, and the undo log. `traits` defines that boundary;
//! `mock` gives tests something to run it against; `executor` is the
//! only code that actually interprets a `Cmd`.

pub mod executor;
pub mod mock;
pub mod traits;

pub use executor::{ExecError, ExecResult, Executor};
pub use traits::{Clipboard, Span, TextEditor, UndoLog};
