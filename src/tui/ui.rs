//! UI rendering for the timer screen.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::features::focus::Phase;
use crate::features::profile::pet::meter;
use crate::tui::app::App;

const HELP: &str = "space:pause | b:break now | s:start | q:quit";

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, app: &App) {
    // Create layout: header, pet and clock, progress, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Pet and clock
            Constraint::Length(3), // Progress
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_body(frame, app, chunks[1]);
    render_progress(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

const fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Idle => Color::Gray,
        Phase::Focusing => Color::Cyan,
        Phase::OnBreak => Color::Green,
    }
}

/// Render the header.
fn render_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let session = app.controller.session();
    let mode = session.mode().unwrap_or_else(|| app.config.mode());

    let mut title = format!(" {mode}");
    if let Some(label) = session.pomodoro_label() {
        title.push_str(&format!(" | {label}"));
    }
    let profile = app.recorder.profile();
    title.push_str(&format!(" | {}: {} ", profile.name, profile.total_hours()));

    let color = phase_color(session.phase());
    let header = Paragraph::new(title)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

    frame.render_widget(header, area);
}

/// Render the pet and the countdown.
fn render_body(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let session = app.controller.session();
    let mood = app.mood();
    let pet = app.recorder.profile().pet;

    let mut lines: Vec<Line<'_>> = mood
        .art()
        .iter()
        .map(|row| Line::from(Span::styled(*row, Style::default().fg(Color::Yellow))))
        .collect();
    lines.push(Line::from(Span::styled(
        mood.caption(),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        format!("hunger {}  happiness {}", meter(pet.hunger), meter(pet.happiness)),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    let clock = format!("{}:{}", session.display_minutes(), session.display_seconds());
    lines.push(Line::from(Span::styled(
        clock,
        Style::default()
            .fg(phase_color(session.phase()))
            .add_modifier(Modifier::BOLD),
    )));

    if session.is_paused() {
        lines.push(Line::from(Span::styled(
            "PAUSED",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(body, area);
}

/// Render progress through the current phase.
fn render_progress(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let session = app.controller.session();
    let progress = session.progress().clamp(0.0, 1.0);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(phase_color(session.phase())))
        .ratio(progress)
        .label(format!("{:.0}%", progress * 100.0));

    frame.render_widget(gauge, area);
}

/// Render the status bar.
fn render_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let status_text = app.screen.status.as_deref().unwrap_or(HELP);

    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::{FocusController, SessionRecorder, TimerConfig};
    use crate::storage::Database;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_pomodoro() {
        let recorder = SessionRecorder::new(Database::open_in_memory().unwrap(), "amy").unwrap();
        let config = TimerConfig::Pomodoro {
            sessions: 4,
            focus_minutes: 25,
            break_minutes: 5,
        };
        let app = App::new(FocusController::new(false), config, recorder, None, true).unwrap();

        let text = screen_text(&app);
        assert!(text.contains("25:00"));
        assert!(text.contains("Pomodoro"));
        assert!(text.contains("1 / 4"));
        assert!(text.contains("amy"));
        assert!(text.contains("hunger ■■■■■□□□□□"));
    }

    #[test]
    fn test_render_paused() {
        let recorder = SessionRecorder::new(Database::open_in_memory().unwrap(), "amy").unwrap();
        let config = TimerConfig::Custom { minutes: 1, seconds: 30 };
        let mut app = App::new(FocusController::new(false), config, recorder, None, true).unwrap();
        app.toggle_pause(std::time::Instant::now());

        let text = screen_text(&app);
        assert!(text.contains("01:30"));
        assert!(text.contains("PAUSED"));
    }
}
