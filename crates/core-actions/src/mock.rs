//! Minimal in-memory stand-ins for `TextEditor`/`Clipboard`/`UndoLog`,
//! sufficient to exercise `Executor` in tests. Not a real rope, not a
//! real pasteboard, not a real undo engine — those live outside this
//! crate's scope entirely.

use crate::traits::{Clipboard, Span, TextEditor, UndoLog};
use core_keymap::MotionKind;

/// A flat in-memory document addressed by absolute byte offset, with
/// each line (including its trailing `\n`, except possibly the last)
/// tracked only well enough to support `Up`/`Down`/`LineStart`/`LineEnd`.
#[derive(Debug, Default)]
pub struct MockEditor {
    text: String,
    cursor: usize,
}

impl MockEditor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn line_start(&self, byte: usize) -> usize {
        self.text[..byte].rfind('\n').map_or(0, |i| i + 1)
    }

    fn line_end_exclusive(&self, byte: usize) -> usize {
        self.text[byte..]
            .find('\n')
            .map_or(self.text.len(), |i| byte + i)
    }

    fn col(&self, byte: usize) -> usize {
        byte - self.line_start(byte)
    }

    fn line_index(&self, byte: usize) -> usize {
        self.text[..byte].matches('\n').count()
    }

    fn nth_line_start(&self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.text
            .match_indices('\n')
            .nth(n - 1)
            .map_or(self.text.len(), |(i, _)| i + 1)
    }
}

impl TextEditor for MockEditor {
    fn resolve_motion(&self, motion: MotionKind, repeat: u16) -> Option<Span> {
        let repeat = repeat as usize;
        match motion {
            MotionKind::Left => {
                let col = self.col(self.cursor);
                let new_col = col.saturating_sub(repeat);
                let target = self.line_start(self.cursor) + new_col;
                Some(order(self.cursor, target, false))
            }
            MotionKind::Right => {
                let end = self.line_end_exclusive(self.cursor);
                let target = (self.cursor + repeat).min(end);
                Some(order(self.cursor, target, false))
            }
            MotionKind::LineStart => Some(order(self.cursor, self.line_start(self.cursor), false)),
            MotionKind::LineEnd => {
                Some(order(self.cursor, self.line_end_exclusive(self.cursor), false))
            }
            MotionKind::Up | MotionKind::Down => {
                let line = self.line_index(self.cursor);
                let target_line = if motion == MotionKind::Up {
                    line.saturating_sub(repeat)
                } else {
                    line + repeat
                };
                let lo = line.min(target_line);
                let hi_exclusive = line.max(target_line) + 1;
                let start = self.nth_line_start(lo);
                let end = self
                    .text
                    .match_indices('\n')
                    .nth(hi_exclusive.saturating_sub(1))
                    .map_or(self.text.len(), |(i, _)| i + 1);
                Some(Span {
                    start,
                    end,
                    linewise: true,
                })
            }
            // Find/Word/BeginningWord/EndWord/ParagraphBegin/ParagraphEnd/Start/End
            // are reserved: no built-in grammar rule resolves to them
            // today (see core_keymap::grammar), so this mock never sees them.
            _ => None,
        }
    }

    fn resolve_lines(&self, repeat: u16) -> Span {
        let line = self.line_index(self.cursor);
        let start = self.nth_line_start(line);
        let end = self
            .text
            .match_indices('\n')
            .nth(line + repeat.max(1) as usize - 1)
            .map_or(self.text.len(), |(i, _)| i + 1);
        Span {
            start,
            end,
            linewise: true,
        }
    }

    fn delete(&mut self, span: Span) -> String {
        let removed = self.text[span.start..span.end].to_string();
        self.text.replace_range(span.start..span.end, "");
        self.cursor = span.start;
        removed
    }

    fn text(&self, span: Span) -> String {
        self.text[span.start..span.end].to_string()
    }

    fn insert_line(&mut self, above: bool) {
        let at = if above {
            self.line_start(self.cursor)
        } else {
            self.line_end_exclusive(self.cursor) + 1
        };
        let at = at.min(self.text.len());
        self.text.insert(at, '\n');
        self.cursor = at + 1;
    }

    fn move_cursor_to(&mut self, byte: usize) {
        self.cursor = byte.min(self.text.len());
    }

    fn cursor(&self) -> usize {
        self.cursor
    }
}

fn order(a: usize, b: usize, linewise: bool) -> Span {
    if a <= b {
        Span {
            start: a,
            end: b,
            linewise,
        }
    } else {
        Span {
            start: b,
            end: a,
            linewise,
        }
    }
}

#[derive(Debug, Default)]
pub struct MockClipboard {
    contents: Option<String>,
}

impl Clipboard for MockClipboard {
    fn set(&mut self, text: String) {
        self.contents = Some(text);
    }

    fn get(&self) -> Option<String> {
        self.contents.clone()
    }
}

#[derive(Debug, Default)]
pub struct MockUndoLog {
    undone: Vec<(String, Span)>,
    redone: Vec<(String, Span)>,
}

impl UndoLog for MockUndoLog {
    fn record(&mut self, before: String, span: Span) {
        self.undone.push((before, span));
        self.redone.clear();
    }

    fn undo(&mut self) -> Option<(String, Span)> {
        let entry = self.undone.pop()?;
        self.redone.push(entry.clone());
        Some(entry)
    }

    fn redo(&mut self) -> Option<(String, Span)> {
        self.redone.pop()
    }
}
