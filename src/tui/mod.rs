//! Terminal timer screen.
//!
//! Shows the countdown, the pet and the Pomodoro position while a session
//! runs. Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::{App, Mood, Screen};
pub use event::{action_for, Action};

use std::io;
use std::time::Instant;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;

use crate::error::TamoError;

/// Run the timer screen until the user quits.
///
/// The app's first session is already running. Quitting breaks off any
/// session still in progress.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn.
pub fn run(app: &mut App) -> Result<(), TamoError> {
    // Setup terminal
    enable_raw_mode().map_err(|e| TamoError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| TamoError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| TamoError::Terminal(format!("Failed to create terminal: {e}")))?;

    info!("timer screen opened");
    let result = run_app(&mut terminal, app);

    // A failed draw must not lose the running phase
    if result.is_err() {
        app.quit();
    }

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
    info!("timer screen closed");

    result
}

/// Run the main application loop.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), TamoError> {
    while !app.should_quit {
        // Draw UI
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| TamoError::Terminal(format!("Failed to draw: {e}")))?;

        // Handle events
        if let Some(action) = event::handle_events(app)? {
            let now = Instant::now();
            match action {
                Action::Quit => app.quit(),
                Action::TogglePause => app.toggle_pause(now),
                Action::BreakNow => app.break_now(),
                Action::Start => app.start_at(now)?,
            }
        }

        app.tick_until(Instant::now());
    }

    Ok(())
}
