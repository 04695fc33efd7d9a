//! The three collaborator seams a real host plugs in: the rope-backed
//! text buffer, the system clipboard, and the undo/redo log. None of
//! the three are implemented here — storage, clipboard integration,
//! and undo are explicitly out of scope. Only the boundary is owned by
//! this crate; `mock` supplies minimal in-memory stand-ins for tests.

use core_keymap::MotionKind;

/// A half-open `[start, end)` byte range into the editor's single active
/// buffer, as resolved by `TextEditor::resolve_motion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub linewise: bool,
}

impl Span {
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The buffer/cursor/rendering surface a command executes against.
///
/// A real implementation owns the rope, the Metal render pipeline, and
/// tree-sitter highlighting; this crate only ever calls through this
/// trait and never touches storage directly.
pub trait TextEditor {
    /// Resolve `motion`, repeated `repeat` times from the cursor, into a
    /// span. Returns `None` if the motion cannot be applied (e.g. `Left`
    /// at column zero).
    fn resolve_motion(&self, motion: MotionKind, repeat: u16) -> Option<Span>;

    /// Resolve the span for the doubled-operator linewise form (`dd`,
    /// `cc`, `yy`), `repeat` lines starting at the cursor's line.
    fn resolve_lines(&self, repeat: u16) -> Span;

    fn delete(&mut self, span: Span) -> String;
    fn text(&self, span: Span) -> String;
    fn insert_line(&mut self, above: bool);
    fn move_cursor_to(&mut self, byte: usize);
    fn cursor(&self) -> usize;
}

/// The system pasteboard. A real implementation talks to `NSPasteboard`;
/// the editor only ever reads and writes through this trait.
pub trait Clipboard {
    fn set(&mut self, text: String);
    fn get(&self) -> Option<String>;
}

/// The undo/redo history. A real implementation owns a persistent edit
/// log; this crate only records boundaries and requests replays through
/// this trait — it never inspects log contents.
pub trait UndoLog {
    fn record(&mut self, before: String, span: Span);
    fn undo(&mut self) -> Option<(String, Span)>;
    fn redo(&mut self) -> Option<(String, Span)>;
}
