use std::{
    io::{self, IsTerminal, Write},
    ops::{Deref, DerefMut},
    sync::Once,
};

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

static PANIC_HOOK: Once = Once::new();

/// Stream the UI is drawn on. When stdout is redirected the document written
/// after the session must stay clean, so the UI moves to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Stdout,
    Stderr,
}

impl Screen {
    fn detect() -> Self {
        if io::stdout().is_terminal() {
            Screen::Stdout
        } else {
            Screen::Stderr
        }
    }

    fn writer(self) -> ScreenWriter {
        match self {
            Screen::Stdout => ScreenWriter::Stdout(io::stdout()),
            Screen::Stderr => ScreenWriter::Stderr(io::stderr()),
        }
    }
}

pub(crate) enum ScreenWriter {
    Stdout(io::Stdout),
    Stderr(io::Stderr),
}

impl Write for ScreenWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ScreenWriter::Stdout(out) => out.write(buf),
            ScreenWriter::Stderr(err) => err.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ScreenWriter::Stdout(out) => out.flush(),
            ScreenWriter::Stderr(err) => err.flush(),
        }
    }
}

/// Raw-mode alternate screen, restored on drop and on panic.
pub(crate) struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<ScreenWriter>>,
    screen: Screen,
}

impl TerminalGuard {
    pub(crate) fn new() -> Result<Self> {
        let screen = Screen::detect();
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut writer = screen.writer();
        execute!(writer, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let terminal = Terminal::new(CrosstermBackend::new(writer))
            .context("failed to initialize terminal")?;
        install_panic_hook(screen);
        debug!(?screen, "entered alternate screen");
        Ok(Self { terminal, screen })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        restore(self.screen);
        debug!(screen = ?self.screen, "terminal restored");
    }
}

impl Deref for TerminalGuard {
    type Target = Terminal<CrosstermBackend<ScreenWriter>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for TerminalGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

fn install_panic_hook(screen: Screen) {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            restore(screen);
            previous(panic_info);
        }));
    });
}

fn restore(screen: Screen) {
    let _ = disable_raw_mode();
    let mut writer = screen.writer();
    let _ = execute!(writer, LeaveAlternateScreen, Show);
}
