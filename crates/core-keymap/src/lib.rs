//! core-keymap: the modal command parser.
//!
//! A bank of concurrent `CommandParser`s, one per grammar rule, fed a
//! `Key` at a time by a `ModalParser`. Each parser tracks its own
//! progress through its fixed `count → key → motion` pattern
//! independently of the others; the first one to accept wins, and the
//! whole bank resets for the next command.
//!
//! This crate owns parsing only. It knows nothing about how a `Cmd`
//! gets applied to a buffer — that boundary lives in `core-actions`.

pub mod cmd;
pub mod grammar;
pub mod matcher;
pub mod modal;
pub mod motion;

pub use cmd::{Cmd, CmdKind};
pub use grammar::{CmdTag, CommandParser, GrammarError, ModeMask};
pub use matcher::{CountMatcher, KeyMatcher, MotionMatcher, ParseResult};
pub use modal::ModalParser;
pub use motion::{Motion, MotionKind};

#[cfg(test)]
mod scenarios {
    //! Concrete walkthroughs: one test per named scenario, fed key-by-key
    //! through a fresh `ModalParser`.
    use super::*;
    use core_events::Key;
    use core_state::Mode;
    use pretty_assertions::assert_eq;

    fn run(mode: Mode, keys: &str) -> Option<Cmd> {
        let mut parser = ModalParser::new(mode);
        let mut last = None;
        for ch in keys.chars() {
            last = parser.feed(Key::Char(ch));
        }
        last
    }

    #[test]
    fn bare_motion_moves() {
        assert_eq!(run(Mode::Normal, "l").unwrap().kind, CmdKind::Move(MotionKind::Right));
    }

    #[test]
    fn counted_motion_carries_repeat() {
        let cmd = run(Mode::Normal, "12j").unwrap();
        assert_eq!(cmd.repeat, 1);
        assert_eq!(cmd.kind, CmdKind::Move(MotionKind::Down));
        // repeat lives on the Motion itself for bare Move commands.
    }

    #[test]
    fn operator_plus_motion_deletes_a_span() {
        let cmd = run(Mode::Normal, "d2l").unwrap();
        match cmd.kind {
            CmdKind::Delete(Some(m)) => {
                assert_eq!(m.kind, MotionKind::Right);
                assert_eq!(m.repeat, 2);
            }
            other => panic!("expected Delete(Some(..)), got {other:?}"),
        }
    }

    #[test]
    fn doubled_operator_is_linewise() {
        assert_eq!(run(Mode::Normal, "3dd").unwrap().kind, CmdKind::Delete(None));
        assert_eq!(run(Mode::Normal, "3dd").unwrap().repeat, 3);
    }

    #[test]
    fn change_doubled_is_linewise() {
        assert_eq!(run(Mode::Normal, "cc").unwrap().kind, CmdKind::Change(None));
    }

    #[test]
    fn yank_with_motion() {
        let cmd = run(Mode::Normal, "y$").unwrap();
        assert!(matches!(cmd.kind, CmdKind::Yank(Some(m)) if m.kind == MotionKind::LineEnd));
    }

    #[test]
    fn visual_operator_needs_no_motion() {
        assert_eq!(run(Mode::Visual, "y").unwrap().kind, CmdKind::Yank(None));
    }

    #[test]
    fn capital_i_enters_insert_at_line_start() {
        let cmd = run(Mode::Normal, "I").unwrap();
        assert_eq!(
            cmd.kind,
            CmdKind::SwitchMove {
                mv: MotionKind::LineStart,
                mode: Mode::Insert
            }
        );
    }

    #[test]
    fn lowercase_a_enters_insert_after_cursor() {
        let cmd = run(Mode::Normal, "a").unwrap();
        assert_eq!(
            cmd.kind,
            CmdKind::SwitchMove {
                mv: MotionKind::Right,
                mode: Mode::Insert
            }
        );
    }

    #[test]
    fn o_opens_a_line_below_and_switches_to_insert() {
        let cmd = run(Mode::Normal, "o").unwrap();
        assert_eq!(
            cmd.kind,
            CmdKind::NewLine {
                up: false,
                switch_mode: true
            }
        );
    }

    #[test]
    fn leading_count_is_dropped_on_mode_switches() {
        let cmd = run(Mode::Normal, "5i").unwrap();
        assert_eq!(cmd.kind, CmdKind::SwitchMode(Mode::Insert));
        assert_eq!(cmd.repeat, 1);
    }
}
