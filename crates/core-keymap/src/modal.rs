//! `ModalParser`: the bank of concurrent `CommandParser`s (spec §4.3).

use core_events::Key;
use core_state::Mode;
use tracing::trace;

use crate::cmd::{Cmd, CmdKind};
use crate::grammar::{builtin_table, CommandParser};
use crate::matcher::ParseResult;

/// Feeds a `Key` stream to every eligible grammar rule at once and
/// returns the first completed `Cmd`.
///
/// Rules run in registration order; the first `Accept` observed wins
/// (spec invariant 1) and every parser — accepted or not — resets
/// before the next key. A key that every rule fails also resets the
/// whole bank, so a bad key sequence can never wedge the parser.
///
/// `failed` is the bitset from spec §2: once a rule's `parse()` call
/// returns `Fail` for the in-progress input, its bit stays set and it
/// is skipped on every subsequent key until the next reset. Without
/// this, a rule that failed mid-pattern keeps its internal cursor
/// sitting mid-sequence and can be fed again, letting a later key
/// coincidentally "revive" a dead rule.
pub struct ModalParser {
    mode: Mode,
    parsers: Vec<CommandParser>,
    failed: Vec<bool>,
}

impl ModalParser {
    pub fn new(mode: Mode) -> Self {
        let parsers = builtin_table();
        let failed = vec![false; parsers.len()];
        Self {
            mode,
            parsers,
            failed,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.reset();
    }

    /// Feed one key. Returns `Some(Cmd)` the instant a rule accepts.
    ///
    /// `Esc` always resets the bank and emits `SwitchMode(Normal)`,
    /// regardless of mode or how far a sequence has progressed (spec
    /// §4.3 step 1, invariant 5, §8 scenario 10).
    pub fn feed(&mut self, key: Key) -> Option<Cmd> {
        if key == Key::Esc {
            trace!(target: "core_keymap::modal", "Esc: resetting bank");
            self.reset();
            return Some(Cmd::new(1, CmdKind::SwitchMode(Mode::Normal)));
        }

        let mut any_alive = false;
        let mut accepted = None;

        for (i, parser) in self.parsers.iter_mut().enumerate() {
            if accepted.is_some() {
                break;
            }
            if self.failed[i] {
                continue;
            }
            match parser.parse(self.mode, key) {
                ParseResult::Accept => accepted = Some(parser.result()),
                ParseResult::Continue => any_alive = true,
                ParseResult::Fail => self.failed[i] = true,
                // CommandParser::parse/step never returns Skip or
                // TryTransition to its caller; those are resolved
                // internally before a verdict crosses the rule boundary.
                ParseResult::Skip | ParseResult::TryTransition => unreachable!(
                    "CommandParser::parse resolves Skip/TryTransition internally"
                ),
            }
        }

        if let Some(cmd) = accepted {
            trace!(target: "core_keymap::modal", ?cmd, "accepted");
            self.reset();
            return Some(cmd);
        }

        if !any_alive {
            trace!(target: "core_keymap::modal", ?key, "all parsers failed, resetting");
            self.reset();
        }

        None
    }

    pub fn reset(&mut self) {
        for parser in &mut self.parsers {
            parser.reset();
        }
        for f in &mut self.failed {
            *f = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::CmdKind;
    use pretty_assertions::assert_eq;

    fn feed_str(parser: &mut ModalParser, keys: &str) -> Option<Cmd> {
        let mut result = None;
        for ch in keys.chars() {
            result = parser.feed(Key::Char(ch));
        }
        result
    }

    #[test]
    fn dd_deletes_current_line() {
        let mut p = ModalParser::new(Mode::Normal);
        let cmd = feed_str(&mut p, "dd").unwrap();
        assert_eq!(cmd.kind, CmdKind::Delete(None));
        assert_eq!(cmd.repeat, 1);
    }

    #[test]
    fn d_then_motion_deletes_with_motion() {
        let mut p = ModalParser::new(Mode::Normal);
        let cmd = feed_str(&mut p, "dl").unwrap();
        assert!(matches!(cmd.kind, CmdKind::Delete(Some(_))));
    }

    #[test]
    fn counted_motion_moves_with_repeat() {
        let mut p = ModalParser::new(Mode::Normal);
        let cmd = feed_str(&mut p, "3l").unwrap();
        assert_eq!(cmd.repeat, 3);
        assert!(matches!(cmd.kind, CmdKind::Move(_)));
    }

    #[test]
    fn esc_resets_mid_sequence() {
        let mut p = ModalParser::new(Mode::Normal);
        assert!(p.feed(Key::Char('d')).is_none());
        let cmd = p.feed(Key::Esc).unwrap();
        assert_eq!(cmd.kind, CmdKind::SwitchMode(Mode::Normal));
        assert_eq!(cmd.repeat, 1);
        // After reset, `d` alone must restart the `dd`/`d<motion>` rules
        // rather than being treated as a second key in a stale sequence.
        let cmd = feed_str(&mut p, "dd");
        assert_eq!(cmd.unwrap().kind, CmdKind::Delete(None));
    }

    #[test]
    fn esc_always_emits_switch_to_normal() {
        let mut p = ModalParser::new(Mode::Insert);
        let cmd = p.feed(Key::Esc).unwrap();
        assert_eq!(cmd.kind, CmdKind::SwitchMode(Mode::Normal));
    }

    #[test]
    fn failed_rule_does_not_revive_on_a_later_matching_key() {
        // `c` leaves only the Change rules alive (their idx advances past
        // the count slot). Feeding the invalid `d` must fail those rules
        // for good, not leave them primed to accept `d` as if it were a
        // fresh key. `l` afterward must parse as a brand-new `Move`, not
        // resurrect the failed `d<motion>` rule into `Delete(Some(Right))`.
        let mut p = ModalParser::new(Mode::Normal);
        assert!(p.feed(Key::Char('c')).is_none());
        assert!(p.feed(Key::Char('d')).is_none());
        let cmd = p.feed(Key::Char('l')).unwrap();
        assert!(matches!(cmd.kind, CmdKind::Move(crate::motion::MotionKind::Right)));
    }

    #[test]
    fn unrecognized_sequence_resets_and_recovers() {
        let mut p = ModalParser::new(Mode::Normal);
        assert!(p.feed(Key::Char('d')).is_none());
        assert!(p.feed(Key::Char('z')).is_none());
        let cmd = feed_str(&mut p, "dd");
        assert_eq!(cmd.unwrap().kind, CmdKind::Delete(None));
    }

    #[test]
    fn visual_mode_bare_operator_yields_none_motion() {
        let mut p = ModalParser::new(Mode::Visual);
        let cmd = feed_str(&mut p, "d").unwrap();
        assert_eq!(cmd.kind, CmdKind::Delete(None));
    }

    #[test]
    fn leading_zero_is_line_start_not_count() {
        let mut p = ModalParser::new(Mode::Normal);
        let cmd = feed_str(&mut p, "0").unwrap();
        assert!(matches!(cmd.kind, CmdKind::Move(crate::motion::MotionKind::LineStart)));
    }

    #[test]
    fn v_switches_mode_only_from_normal() {
        let mut p = ModalParser::new(Mode::Visual);
        assert!(feed_str(&mut p, "v").is_none());
    }
}
