// TUI module - terminal lifecycle and event loop
//
// Responsibilities:
// - Terminal initialization and cleanup (raw mode, alternate screen)
// - Event loop (keyboard input, timer ticks, scripted demo events)
// - Rendering the active dashboard each frame

pub mod app;
pub mod clipboard;
pub mod markdown;
pub mod scroll;
pub mod toast;
pub mod traits;
pub mod ui;
pub mod views;

use crate::config::Config;
use crate::demo::DemoEvent;
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::{App, View};
use crossterm::{
    event::{self, Event, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI until the user quits.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// the way out even when the loop errors.
pub async fn run_tui(
    mut event_rx: mpsc::Receiver<DemoEvent>,
    log_buffer: LogBuffer,
    config: Config,
    start: View,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::with_config(&config, log_buffer, start);
    let result = run_event_loop(&mut terminal, &mut app, &mut event_rx).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop: redraw, then wait for whichever source fires first.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::Receiver<DemoEvent>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard and mouse input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => app.handle_key_event(key_event),
                        Ok(Event::Mouse(mouse_event)) => match mouse_event.kind {
                            MouseEventKind::ScrollUp => app.feed.scroll.up(1),
                            MouseEventKind::ScrollDown => app.feed.scroll.down(1),
                            _ => {}
                        },
                        _ => {}
                    }
                }
            } => {}

            // Periodic tick: toast expiry, queued error surfacing
            _ = tick_interval.tick() => {
                app.tick();
            }

            // Scripted demo events
            Some(demo_event) = event_rx.recv() => {
                app.apply_demo_event(demo_event);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
