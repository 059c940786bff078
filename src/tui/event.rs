//! Event handling for the timer screen.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::TamoError;
use crate::tui::app::App;

/// Upper bound on one poll so the screen keeps redrawing.
const MAX_POLL: Duration = Duration::from_millis(250);

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Pause or resume the countdown.
    TogglePause,
    /// Break the session off now.
    BreakNow,
    /// Start a new session once idle.
    Start,
}

/// Map a key press to an action.
#[must_use]
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Handle Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ' | 'p') => Some(Action::TogglePause),
        KeyCode::Char('b') => Some(Action::BreakNow),
        KeyCode::Char('s') | KeyCode::Enter => Some(Action::Start),
        _ => None,
    }
}

/// Wait for input until the next tick is due.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events(app: &App) -> Result<Option<Action>, TamoError> {
    let timeout = app.until_next_tick(Instant::now()).min(MAX_POLL);

    if event::poll(timeout).map_err(|e| TamoError::Terminal(format!("Event poll failed: {e}")))? {
        if let Event::Key(key) =
            event::read().map_err(|e| TamoError::Terminal(format!("Event read failed: {e}")))?
        {
            return Ok(action_for(key));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(action_for(press(KeyCode::Char(' '))), Some(Action::TogglePause));
        assert_eq!(action_for(press(KeyCode::Char('b'))), Some(Action::BreakNow));
        assert_eq!(action_for(press(KeyCode::Char('s'))), Some(Action::Start));
        assert_eq!(action_for(press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(action_for(press(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(action_for(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for(key), Some(Action::Quit));
    }

    #[test]
    fn test_release_is_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(action_for(key), None);
    }
}
