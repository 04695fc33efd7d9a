//! `CommandParser`: one grammar rule's running state machine, and the
//! built-in grammar table (spec §4.2).
//!
//! Open questions: `v`'s asymmetry (Normal-only) is addressed inline on
//! the rule below. `MotionKind`'s reserved variants (`Find`, `Word`,
//! `BeginningWord`, `EndWord`, `ParagraphBegin`, `ParagraphEnd`, `Start`,
//! `End`) have no rule here — no key sequence in the built-in table
//! resolves to them yet, pending the richer lexical-class motions a
//! future grammar revision would add.

use core_events::Key;
use core_state::Mode;
use thiserror::Error;

use crate::cmd::{Cmd, CmdKind};
use crate::matcher::{CountMatcher, KeyMatcher, MotionMatcher, ParseResult};
use crate::motion::{Motion, MotionKind};

bitflags::bitflags! {
    /// Three-bit set of eligible modes for a grammar rule.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModeMask: u8 {
        const INSERT = Mode::Insert.bit();
        const NORMAL = Mode::Normal.bit();
        const VISUAL = Mode::Visual.bit();
    }
}

impl ModeMask {
    pub const fn allows(self, mode: Mode) -> bool {
        self.contains(Self::from_bits_truncate(mode.bit()))
    }
}

/// One input slot in a grammar rule's pattern.
#[derive(Debug, Clone)]
enum Input {
    Count(CountMatcher),
    Key(KeyMatcher),
    Motion(MotionMatcher),
}

impl Input {
    fn parse(&mut self, key: Key) -> ParseResult {
        match self {
            Input::Count(m) => m.parse(key),
            Input::Key(m) => m.parse(key),
            Input::Motion(m) => m.parse(key),
        }
    }

    fn reset(&mut self) {
        match self {
            Input::Count(m) => m.reset(),
            Input::Key(_) => {}
            Input::Motion(m) => m.reset(),
        }
    }
}

/// What a completed rule resolves to. Carries whatever is fixed by the
/// rule itself (e.g. which of `I`/`A`/`a` it is); the outer count and any
/// matched `Motion` are read off the rule's inputs at accept time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdTag {
    Move,
    Delete,
    Change,
    Yank,
    SwitchMove { mv: MotionKind, mode: Mode },
    NewLine { up: bool },
    SwitchMode(Mode),
    Paste,
    PasteBefore,
}

/// Construction-time failure for a hand-assembled grammar rule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("grammar rule has no inputs")]
    EmptyInputs,
    #[error("grammar rule has no valid modes")]
    NoValidModes,
}

/// One grammar rule's running state machine (spec §4.2).
#[derive(Debug, Clone)]
pub struct CommandParser {
    tag: CmdTag,
    inputs: Vec<Input>,
    valid_modes: ModeMask,
    idx: usize,
}

impl CommandParser {
    fn build(
        tag: CmdTag,
        inputs: Vec<Input>,
        valid_modes: ModeMask,
    ) -> Result<Self, GrammarError> {
        if inputs.is_empty() {
            return Err(GrammarError::EmptyInputs);
        }
        if valid_modes.is_empty() {
            return Err(GrammarError::NoValidModes);
        }
        Ok(Self {
            tag,
            inputs,
            valid_modes,
            idx: 0,
        })
    }

    /// Feed one key through this rule for the given mode.
    ///
    /// Recursion on `Skip`/`TryTransition` is bounded by `self.idx`
    /// strictly increasing and capped at `self.inputs.len()`.
    pub fn parse(&mut self, mode: Mode, key: Key) -> ParseResult {
        if !self.valid_modes.allows(mode) {
            return ParseResult::Fail;
        }
        self.step(key)
    }

    fn step(&mut self, key: Key) -> ParseResult {
        if self.idx >= self.inputs.len() {
            return ParseResult::Fail;
        }
        match self.inputs[self.idx].parse(key) {
            ParseResult::Accept => {
                self.idx += 1;
                if self.idx == self.inputs.len() {
                    ParseResult::Accept
                } else {
                    ParseResult::Continue
                }
            }
            ParseResult::Continue => ParseResult::Continue,
            ParseResult::Fail => ParseResult::Fail,
            ParseResult::Skip | ParseResult::TryTransition => {
                self.idx += 1;
                self.step(key)
            }
        }
    }

    pub fn reset(&mut self) {
        self.idx = 0;
        for input in &mut self.inputs {
            input.reset();
        }
    }

    /// Build the `Cmd` for a rule that has just returned `Accept`.
    pub fn result(&self) -> Cmd {
        let outer_count = self.inputs.iter().find_map(|i| match i {
            Input::Count(m) => m.result(),
            _ => None,
        });
        let motion = self.inputs.iter().find_map(|i| match i {
            Input::Motion(m) => m.result(),
            _ => None,
        });
        synthesize(self.tag, outer_count, motion)
    }
}

/// Apply the fixed mapping from input results to `Cmd`, per spec §4.2
/// "Result synthesis".
fn synthesize(tag: CmdTag, outer_count: Option<u16>, motion: Option<Motion>) -> Cmd {
    match tag {
        CmdTag::Move => {
            let m = motion.expect("Move rule always resolves a motion before accepting");
            Cmd::new(m.repeat, CmdKind::Move(m.kind))
        }
        CmdTag::Delete => Cmd::new(outer_count.unwrap_or(1), CmdKind::Delete(motion)),
        CmdTag::Change => Cmd::new(outer_count.unwrap_or(1), CmdKind::Change(motion)),
        CmdTag::Yank => Cmd::new(outer_count.unwrap_or(1), CmdKind::Yank(motion)),
        // Leading count is ignored for SwitchMove (spec §4.2).
        CmdTag::SwitchMove { mv, mode } => Cmd::new(1, CmdKind::SwitchMove { mv, mode }),
        CmdTag::NewLine { up } => Cmd::new(
            outer_count.unwrap_or(1),
            CmdKind::NewLine {
                up,
                switch_mode: true,
            },
        ),
        // Leading count is ignored for SwitchMode (spec §4.2).
        CmdTag::SwitchMode(mode) => Cmd::new(1, CmdKind::SwitchMode(mode)),
        CmdTag::Paste => Cmd::new(outer_count.unwrap_or(1), CmdKind::Paste),
        CmdTag::PasteBefore => Cmd::new(outer_count.unwrap_or(1), CmdKind::PasteBefore),
    }
}

fn rule(tag: CmdTag, inputs: Vec<Input>, valid_modes: ModeMask) -> CommandParser {
    CommandParser::build(tag, inputs, valid_modes)
        .expect("built-in grammar rules are constructed with valid, non-empty input lists")
}

fn count() -> Input {
    Input::Count(CountMatcher::new())
}

fn key(k: Key) -> Input {
    Input::Key(KeyMatcher::new(k))
}

fn motion() -> Input {
    Input::Motion(MotionMatcher::new())
}

/// Build the closed, built-in grammar table from spec §4.2.
///
/// Registration order is load-bearing: `dd`/`cc`/`yy` must sit where a
/// `d`/`c`/`y` that failed to start a motion still has a linewise
/// sibling rule in the bank to accept the second identical key. The
/// `ModalParser` iterates this table in order and returns the first
/// `Accept` it observes (spec invariant 1).
pub fn builtin_table() -> Vec<CommandParser> {
    use Key::Char;

    vec![
        rule(
            CmdTag::Move,
            vec![motion()],
            ModeMask::NORMAL | ModeMask::VISUAL,
        ),
        rule(
            CmdTag::Delete,
            vec![count(), key(Char('d')), motion()],
            ModeMask::NORMAL,
        ),
        rule(
            CmdTag::Delete,
            vec![count(), key(Char('d')), key(Char('d'))],
            ModeMask::NORMAL,
        ),
        rule(CmdTag::Delete, vec![count(), key(Char('d'))], ModeMask::VISUAL),
        rule(
            CmdTag::Change,
            vec![count(), key(Char('c')), motion()],
            ModeMask::NORMAL,
        ),
        rule(
            CmdTag::Change,
            vec![count(), key(Char('c')), key(Char('c'))],
            ModeMask::NORMAL,
        ),
        rule(CmdTag::Change, vec![count(), key(Char('c'))], ModeMask::VISUAL),
        rule(
            CmdTag::Yank,
            vec![count(), key(Char('y')), motion()],
            ModeMask::NORMAL,
        ),
        rule(
            CmdTag::Yank,
            vec![count(), key(Char('y')), key(Char('y'))],
            ModeMask::NORMAL,
        ),
        rule(CmdTag::Yank, vec![count(), key(Char('y'))], ModeMask::VISUAL),
        rule(
            CmdTag::SwitchMove {
                mv: MotionKind::LineStart,
                mode: Mode::Insert,
            },
            vec![count(), key(Char('I'))],
            ModeMask::NORMAL | ModeMask::VISUAL,
        ),
        rule(
            CmdTag::SwitchMove {
                mv: MotionKind::LineEnd,
                mode: Mode::Insert,
            },
            vec![count(), key(Char('A'))],
            ModeMask::NORMAL | ModeMask::VISUAL,
        ),
        rule(
            CmdTag::SwitchMove {
                mv: MotionKind::Right,
                mode: Mode::Insert,
            },
            vec![count(), key(Char('a'))],
            ModeMask::NORMAL | ModeMask::VISUAL,
        ),
        rule(
            CmdTag::NewLine { up: true },
            vec![count(), key(Char('O'))],
            ModeMask::NORMAL | ModeMask::VISUAL,
        ),
        rule(
            CmdTag::NewLine { up: false },
            vec![count(), key(Char('o'))],
            ModeMask::NORMAL | ModeMask::VISUAL,
        ),
        rule(
            CmdTag::SwitchMode(Mode::Insert),
            vec![count(), key(Char('i'))],
            ModeMask::NORMAL,
        ),
        // `v` toggles into Visual from Normal only; see spec §9(b) — the
        // asymmetry (no documented Visual-to-Visual/Insert transition via
        // `v`/`i`) is intentional, not an oversight.
        rule(
            CmdTag::SwitchMode(Mode::Visual),
            vec![count(), key(Char('v'))],
            ModeMask::NORMAL,
        ),
        rule(
            CmdTag::Paste,
            vec![count(), key(Char('p'))],
            ModeMask::NORMAL | ModeMask::VISUAL,
        ),
        rule(
            CmdTag::PasteBefore,
            vec![count(), key(Char('P'))],
            ModeMask::NORMAL | ModeMask::VISUAL,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn feed(parser: &mut CommandParser, mode: Mode, keys: &str) -> Option<Cmd> {
        for ch in keys.chars() {
            match parser.parse(mode, Key::Char(ch)) {
                ParseResult::Accept => return Some(parser.result()),
                ParseResult::Fail => return None,
                _ => continue,
            }
        }
        None
    }

    #[test]
    fn mode_mask_gates_eligibility() {
        let mask = ModeMask::NORMAL | ModeMask::VISUAL;
        assert!(mask.allows(Mode::Normal));
        assert!(mask.allows(Mode::Visual));
        assert!(!mask.allows(Mode::Insert));
    }

    #[test]
    fn dd_rule_accepts_doubled_key() {
        let mut table = builtin_table();
        let dd = table
            .iter_mut()
            .find(|p| matches!(p.tag, CmdTag::Delete) && p.inputs.len() == 3)
            .unwrap();
        let cmd = feed(dd, Mode::Normal, "dd").unwrap();
        assert_eq!(cmd.kind, CmdKind::Delete(None));
    }

    #[test]
    fn build_rejects_empty_inputs() {
        assert_eq!(
            CommandParser::build(CmdTag::Paste, vec![], ModeMask::NORMAL),
            Err(GrammarError::EmptyInputs)
        );
    }

    #[test]
    fn build_rejects_no_valid_modes() {
        assert_eq!(
            CommandParser::build(CmdTag::Paste, vec![key(Key::Char('p'))], ModeMask::empty()),
            Err(GrammarError::NoValidModes)
        );
    }

    #[test]
    fn builtin_table_has_one_rule_per_grammar_row() {
        assert_eq!(builtin_table().len(), 18);
    }
}
