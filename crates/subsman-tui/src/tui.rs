//! Raw-mode terminal session for the dashboard.
//!
//! [`Tui`] owns the ratatui terminal. Dropping it, returning an error from
//! `main`, or panicking all go through [`restore_terminal`], so the user's
//! shell comes back in cooked mode on the primary screen.

use std::io::{self, Stdout, stdout};

use color_eyre::eyre::Result;
use crossterm::{
    ExecutableCommand, cursor,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Wrap stdout. The terminal is left untouched until [`Tui::enter`].
    pub fn new() -> Result<Self> {
        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(stdout()))?,
        })
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        stdout()
            .execute(EnterAlternateScreen)?
            .execute(cursor::Hide)?;
        self.terminal.clear()?;
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        stdout().execute(SetTitle(title))?;
        Ok(())
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

/// Undo [`Tui::enter`]. Every step runs even if an earlier one fails; the
/// first failure is returned.
fn restore_terminal() -> io::Result<()> {
    let cursor = stdout().execute(cursor::Show).map(drop);
    let screen = stdout().execute(LeaveAlternateScreen).map(drop);
    let mode = terminal::disable_raw_mode();
    cursor.and(screen).and(mode)
}

/// Route panics and eyre reports through color-eyre, restoring the terminal
/// first. Call before [`Tui::enter`] so a failing setup still prints cleanly.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        panic_hook(info);
    }));
    Ok(())
}
