//! Alternate-screen management with drop-safe cleanup.

use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};

/// Guard that keeps the terminal on the alternate screen while alive.
///
/// The primary screen and cursor are restored when the guard is dropped,
/// including on early returns.
pub struct ScreenGuard {
    active: bool,
}

impl ScreenGuard {
    /// Switch to the alternate screen and hide the cursor.
    pub fn enter() -> io::Result<Self> {
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self { active: true })
    }

    /// Restore the terminal now instead of on drop.
    pub fn exit(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            let mut stdout = io::stdout();
            execute!(stdout, Show, LeaveAlternateScreen)?;
            stdout.flush()?;
        }
        Ok(())
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.exit();
    }
}

/// Current terminal size in character cells, with a fallback when stdout is
/// not a terminal.
pub fn terminal_size() -> (u16, u16) {
    crossterm::terminal::size().unwrap_or((80, 24))
}
