use std::io::{self, Stdout, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::info;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use super::app::App;

/// How long to wait for input before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Spin up the terminal backend, enter the draw loop, and keep processing input
/// until the user quits. The terminal is restored even when the loop fails.
pub fn run_app(app: &mut App) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    enter_alternate_screen(&mut stdout, disable_raw_mode)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;

    info!("form front-end started");
    let result = event_loop(&mut terminal, app);

    cleanup_terminal(&mut terminal)?;
    info!("form front-end stopped");
    result
}

/// Switch `out` to the alternate screen. On failure `undo_raw_mode` runs
/// before the error is returned, so the shell is not left in raw mode.
fn enter_alternate_screen<W: Write>(
    out: &mut W,
    undo_raw_mode: impl FnOnce() -> io::Result<()>,
) -> Result<()> {
    if let Err(err) = execute!(out, EnterAlternateScreen) {
        let _ = undo_raw_mode();
        return Err(err).context("failed to enter alternate screen");
    }
    Ok(())
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        if !event::poll(POLL_INTERVAL).context("event polling failed")? {
            continue;
        }
        if let Event::Key(key_event) = event::read().context("failed to read event")? {
            if key_event.kind == KeyEventKind::Press && app.handle_key(key_event.code)? {
                return Ok(());
            }
        }
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_alternate_screen_restores_raw_mode() {
        let restored = Cell::new(false);
        let err = enter_alternate_screen(&mut BrokenPipe, || {
            restored.set(true);
            Ok(())
        })
        .unwrap_err();

        assert!(restored.get());
        assert_eq!(err.to_string(), "failed to enter alternate screen");
    }

    #[test]
    fn successful_switch_leaves_raw_mode_alone() {
        let mut out = Vec::new();
        enter_alternate_screen(&mut out, || panic!("raw mode must stay on")).unwrap();
        assert!(!out.is_empty());
    }
}
