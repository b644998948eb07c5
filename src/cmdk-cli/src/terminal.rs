//! Terminal setup and teardown.
//!
//! [`LauncherTerminal`] enables raw mode, the alternate screen and mouse
//! capture on creation and restores the terminal when dropped. A panic hook
//! restores it as well so a crash does not leave the shell unusable.

use std::io::{Stdout, stdout};
use std::panic;
use std::sync::Once;

use anyhow::Result;
use crossterm::{
    cursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

static PANIC_HOOK: Once = Once::new();

/// Restores the terminal on drop.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

/// Full-screen terminal owned by the launcher.
pub struct LauncherTerminal {
    /// The underlying ratatui terminal
    pub terminal: Terminal<CrosstermBackend<Stdout>>,
    _guard: TerminalGuard,
}

impl LauncherTerminal {
    /// Enters full-screen mode.
    pub fn new() -> Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        // From here on the guard undoes whatever was enabled.
        let guard = TerminalGuard;

        let mut out = stdout();
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste,
            cursor::Hide
        )?;

        let terminal = Terminal::new(CrosstermBackend::new(out))?;
        Ok(Self {
            terminal,
            _guard: guard,
        })
    }
}

/// Leaves full-screen mode.
pub fn restore_terminal() -> Result<()> {
    let mut out = stdout();
    execute!(
        out,
        cursor::Show,
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    disable_raw_mode()?;
    Ok(())
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));
    });
}
