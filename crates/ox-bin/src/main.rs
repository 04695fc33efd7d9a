//! modal-edit entrypoint.
//!
//! Wires a raw-mode terminal key stream into `core_keymap::ModalParser`
//! and applies whatever `Cmd` it accepts through `core_actions::Executor`.
//! The rope buffer, Metal renderer, tree-sitter highlighting, and macOS
//! view layer this would sit under in a full editor are out of scope
//! here; `core_actions::mock` stands in for the buffer so the pipeline
//! has something real to run against.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    self, Event as CEvent, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind,
    KeyModifiers as CKeyModifiers,
};
use crossterm::terminal;
use tracing::{debug, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

use core_actions::{Executor, mock::{MockClipboard, MockEditor, MockUndoLog}};
use core_config::Config;
use core_events::Key;
use core_keymap::ModalParser;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "modal-edit", version, about = "vi-style modal key parser demo")]
struct Args {
    /// Optional path to open at startup (UTF-8 text). If omitted an empty buffer is used.
    path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `modalrc.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("modal-edit.log");
    if log_path.exists() {
        let _ = fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "modal-edit.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        Err(_err) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

/// Translates a raw terminal key into the normalized `Key` the parser
/// bank consumes. Keys with no grammar-relevant meaning (function keys,
/// modifier-only presses) translate to `None`.
fn translate(ev: CKeyEvent) -> Option<Key> {
    if ev.kind != KeyEventKind::Press {
        return None;
    }
    match ev.code {
        CKeyCode::Char(c) => Some(Key::Char(c)),
        CKeyCode::Esc => Some(Key::Esc),
        CKeyCode::Enter => Some(Key::Enter),
        CKeyCode::Backspace => Some(Key::Backspace),
        CKeyCode::Tab => Some(Key::Tab),
        CKeyCode::Up => Some(Key::Up),
        CKeyCode::Down => Some(Key::Down),
        CKeyCode::Left => Some(Key::Left),
        CKeyCode::Right => Some(Key::Right),
        _ => None,
    }
}

fn is_quit(ev: &CKeyEvent) -> bool {
    ev.code == CKeyCode::Char('c') && ev.modifiers.contains(CKeyModifiers::CONTROL)
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!(target: "runtime", ?e, "failed to restore terminal mode");
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Config {
    core_config::load_from(path).unwrap_or_else(|e| {
        warn!(target: "runtime", ?e, "config load failed, using defaults");
        Config::default()
    })
}

fn load_text(path: Option<&PathBuf>) -> String {
    match path {
        Some(p) => fs::read_to_string(p).unwrap_or_else(|e| {
            warn!(target: "runtime", file = %p.display(), ?e, "file_open_error, starting empty");
            String::new()
        }),
        None => String::new(),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let config = load_config(args.config.clone());
    let start_mode = config.start_mode();
    info!(target: "runtime.startup", ?start_mode, path = ?args.path, "bootstrap_complete");

    let text = load_text(args.path.as_ref());
    let mut executor = Executor::new(
        MockEditor::new(text),
        MockClipboard::default(),
        MockUndoLog::default(),
        start_mode,
    );
    let mut parser = ModalParser::new(start_mode);

    let _guard = TerminalGuard::enter()?;

    loop {
        let CEvent::Key(key_event) = event::read()? else {
            continue;
        };
        if is_quit(&key_event) {
            debug!(target: "runtime", "quit requested");
            break;
        }
        let Some(key) = translate(key_event) else {
            trace!(target: "runtime", ?key_event, "unmapped key ignored");
            continue;
        };
        if parser.mode() != executor.mode() {
            parser.set_mode(executor.mode());
        }
        if let Some(cmd) = parser.feed(key) {
            trace!(target: "runtime", ?cmd, "command accepted");
            match executor.apply(cmd) {
                Ok(result) => {
                    if let Some(mode) = result.mode {
                        parser.set_mode(mode);
                    }
                }
                Err(e) => warn!(target: "runtime", ?e, "command rejected"),
            }
        }
    }

    drop(_guard);
    print!("{}", executor.editor.as_str());
    Ok(())
}
