use std::io;

use crossterm::cursor::Show;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

/// Puts the terminal back the way it was when dropped, whichever way the
/// UI exits, including a setup step that fails halfway.
pub struct TerminalGuard {
    restore: fn(),
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        (self.restore)();
    }
}

/// Raw mode, alternate screen and mouse capture for the lifetime of the guard.
pub fn enter() -> io::Result<TerminalGuard> {
    enter_with(
        || {
            enable_raw_mode()?;
            execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
        },
        restore,
    )
}

fn enter_with(
    setup: impl FnOnce() -> io::Result<()>,
    restore: fn(),
) -> io::Result<TerminalGuard> {
    // Armed before setup so a partial setup is undone too.
    let guard = TerminalGuard { restore };
    setup()?;
    Ok(guard)
}

fn restore() {
    let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen, Show);
    let _ = disable_raw_mode();
}
