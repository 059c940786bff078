//! Application state for the timer screen.

use std::time::{Duration, Instant};

use crate::error::TamoError;
use crate::features::focus::{
    Countdown, FocusController, ObserverList, Phase, PhaseSummary, SessionLog, SessionObserver,
    SessionOutcome, SessionRecorder, Ticker, TimerConfig,
};
use crate::features::profile::Achievement;

/// How the pet is feeling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mood {
    /// Waiting for a session.
    #[default]
    Idle,
    /// Studying along with a focus phase.
    Studying,
    /// Resting during a break.
    Resting,
    /// The session ran to the end.
    Happy,
    /// The session was broken off.
    Sad,
    /// Hunger is running low.
    Hungry,
}

impl Mood {
    /// ASCII picture of the pet.
    #[must_use]
    pub const fn art(&self) -> &'static [&'static str] {
        match self {
            Self::Idle => &[" /\\_/\\ ", "( o.o )", " > ^ < "],
            Self::Studying => &[" /\\_/\\ ", "( -.- )", " /[_]\\ "],
            Self::Resting => &[" /\\_/\\ ", "( u.u ) z", " > ~ < "],
            Self::Happy => &[" /\\_/\\ ", "( ^.^ )", " \\ v / "],
            Self::Sad => &[" /\\_/\\ ", "( T.T )", " > _ < "],
            Self::Hungry => &[" /\\_/\\ ", "( @.@ )", " > o < "],
        }
    }

    /// Caption under the picture.
    #[must_use]
    pub const fn caption(&self) -> &'static str {
        match self {
            Self::Idle => "Ready when you are",
            Self::Studying => "Studying with you...",
            Self::Resting => "Taking a break",
            Self::Happy => "Great work!",
            Self::Sad => "Maybe next time",
            Self::Hungry => "Tamo is hungry...",
        }
    }
}

/// What the screen shows besides the timer itself.
///
/// Updated through [`SessionObserver`] notifications.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    /// Pet mood.
    pub mood: Mood,
    /// Whether the session controls (start) are available.
    pub controls_enabled: bool,
    /// Status message to display.
    pub status: Option<String>,
}

impl SessionObserver for Screen {
    fn phase_started(&mut self, phase: Phase, length: Countdown) {
        self.mood = match phase {
            Phase::OnBreak => Mood::Resting,
            Phase::Focusing | Phase::Idle => Mood::Studying,
        };
        self.status = Some(format!("{phase} for {length}"));
    }

    fn report_elapsed(&mut self, summary: &PhaseSummary) {
        self.status = Some(format!("{} done: {}", summary.phase, summary.elapsed));
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }

    fn session_ended(&mut self, outcome: SessionOutcome) {
        self.mood = match outcome {
            SessionOutcome::Completed => Mood::Happy,
            SessionOutcome::Broken => Mood::Sad,
        };
        self.status = Some(match outcome {
            SessionOutcome::Completed => "Session complete! Press s to go again".to_string(),
            SessionOutcome::Broken => "Session stopped. Press s to start again".to_string(),
        });
    }
}

/// Application state.
pub struct App {
    /// Timer and notification driver.
    pub controller: FocusController,
    /// Settings used for every start.
    pub config: TimerConfig,
    /// Persists phases and credits the profile.
    pub recorder: SessionRecorder,
    /// Optional completion sound sink.
    pub sound: Option<Box<dyn SessionObserver>>,
    /// Screen state.
    pub screen: Screen,
    /// Every phase reported while the screen was open.
    pub log: SessionLog,
    /// Achievements unlocked while the screen was open.
    pub unlocked: Vec<Achievement>,
    /// Show a status message when an achievement unlocks.
    pub notify_achievements: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
    ticker: Ticker,
}

impl App {
    /// Create the app and start the first session.
    ///
    /// # Errors
    ///
    /// Returns `TamoError::InvalidInput` if the timer settings are invalid.
    pub fn new(
        controller: FocusController,
        config: TimerConfig,
        recorder: SessionRecorder,
        sound: Option<Box<dyn SessionObserver>>,
        notify_achievements: bool,
    ) -> Result<Self, TamoError> {
        let mut app = Self {
            controller,
            config,
            recorder,
            sound,
            screen: Screen {
                controls_enabled: true,
                ..Screen::default()
            },
            log: SessionLog::new(),
            unlocked: Vec::new(),
            notify_achievements,
            should_quit: false,
            ticker: Ticker::starting_at(Instant::now()),
        };
        app.start_at(Instant::now())?;
        Ok(app)
    }

    /// Start a new session if the controls are enabled.
    ///
    /// # Errors
    ///
    /// Returns `TamoError::InvalidInput` if the timer settings are invalid.
    pub fn start_at(&mut self, now: Instant) -> Result<(), TamoError> {
        if !self.screen.controls_enabled {
            return Ok(());
        }

        let config = self.config;
        let mut observers = ObserverList::new()
            .with(&mut self.recorder)
            .with(&mut self.screen)
            .with(&mut self.log);
        self.controller.start(config, &mut observers)?;
        self.ticker.restart(now);
        Ok(())
    }

    /// Run every tick that is due at `now`.
    pub fn tick_until(&mut self, now: Instant) {
        while self.ticker.take_due(now) {
            self.tick_once();
        }
    }

    /// Time left until the next tick.
    #[must_use]
    pub fn until_next_tick(&self, now: Instant) -> Duration {
        self.ticker.until_next(now)
    }

    /// Advance the timer by one second.
    pub fn tick_once(&mut self) {
        let mut observers = ObserverList::new()
            .with(&mut self.recorder)
            .with(&mut self.screen)
            .with(&mut self.log);
        if let Some(sound) = self.sound.as_deref_mut() {
            observers = observers.with(sound);
        }
        self.controller.tick(&mut observers);
        self.collect_recorder_news();
    }

    /// Break the session off.
    pub fn break_now(&mut self) {
        let mut observers = ObserverList::new()
            .with(&mut self.recorder)
            .with(&mut self.screen)
            .with(&mut self.log);
        if self.controller.break_now(&mut observers).is_none() {
            self.screen.status = Some("No session running".to_string());
        }
        self.collect_recorder_news();
    }

    /// Pause or resume the countdown.
    pub fn toggle_pause(&mut self, now: Instant) {
        if !self.controller.toggle_pause() {
            return;
        }

        if self.controller.session().is_paused() {
            self.screen.status = Some("Paused. Press space to resume".to_string());
        } else {
            self.screen.status = Some("Resumed".to_string());
            self.ticker.restart(now);
        }
    }

    /// Mood to draw: a hungry pet shows it unless something just happened.
    #[must_use]
    pub fn mood(&self) -> Mood {
        match self.screen.mood {
            Mood::Idle | Mood::Studying if self.recorder.profile().pet.is_hungry() => Mood::Hungry,
            mood => mood,
        }
    }

    /// Break off any running session and quit.
    pub fn quit(&mut self) {
        if self.controller.session().is_active() {
            self.break_now();
        }
        self.should_quit = true;
    }

    fn collect_recorder_news(&mut self) {
        if let Some(e) = self.recorder.take_error() {
            self.screen.status = Some(format!("Could not save progress: {e}"));
        }

        let unlocked = self.recorder.take_unlocked();
        if self.notify_achievements {
            if let Some(last) = unlocked.last() {
                self.screen.status = Some(format!("Achievement unlocked: {}", last.title()));
            }
        }
        self.unlocked.extend(unlocked);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::profile::{Pet, ProfileStore};
    use crate::storage::Database;
    use chrono::Local;

    fn app(config: TimerConfig) -> App {
        let recorder = SessionRecorder::new(Database::open_in_memory().unwrap(), "amy").unwrap();
        App::new(FocusController::new(false), config, recorder, None, true).unwrap()
    }

    #[test]
    fn test_new_starts_session() {
        let app = app(TimerConfig::Custom { minutes: 0, seconds: 10 });

        assert!(app.controller.session().is_active());
        assert!(!app.screen.controls_enabled);
        assert_eq!(app.screen.mood, Mood::Studying);
    }

    #[test]
    fn test_tick_until_catches_up() {
        let mut app = app(TimerConfig::Custom { minutes: 0, seconds: 10 });
        let start = Instant::now();

        app.tick_until(start + Duration::from_millis(3500));
        assert_eq!(app.controller.session().remaining(), Countdown::new(0, 7));
    }

    #[test]
    fn test_completed_session_enables_start() {
        let mut app = app(TimerConfig::Custom { minutes: 0, seconds: 3 });
        for _ in 0..3 {
            app.tick_once();
        }

        assert!(!app.controller.session().is_active());
        assert!(app.screen.controls_enabled);
        assert_eq!(app.screen.mood, Mood::Happy);
        assert_eq!(app.recorder.profile().total_focus_seconds, 3);

        app.start_at(Instant::now()).unwrap();
        assert!(app.controller.session().is_active());
    }

    #[test]
    fn test_start_ignored_while_running() {
        let mut app = app(TimerConfig::Custom { minutes: 0, seconds: 5 });
        app.tick_once();

        app.start_at(Instant::now()).unwrap();
        assert_eq!(app.controller.session().remaining(), Countdown::new(0, 4));
    }

    #[test]
    fn test_quit_breaks_session() {
        let mut app = app(TimerConfig::Interval { minutes: 5 });
        app.tick_once();
        app.tick_once();
        app.quit();

        assert!(app.should_quit);
        assert_eq!(app.screen.mood, Mood::Sad);
        assert_eq!(app.log.last_outcome(), Some(SessionOutcome::Broken));
        assert_eq!(app.recorder.profile().total_focus_seconds, 2);
    }

    #[test]
    fn test_pause_holds_timer() {
        let mut app = app(TimerConfig::Custom { minutes: 0, seconds: 5 });
        let now = Instant::now();

        app.toggle_pause(now);
        app.tick_once();
        assert_eq!(app.controller.session().remaining(), Countdown::new(0, 5));
        assert!(app.screen.status.as_deref().unwrap_or_default().starts_with("Paused"));

        app.toggle_pause(now);
        app.tick_once();
        assert_eq!(app.controller.session().remaining(), Countdown::new(0, 4));
    }

    #[test]
    fn test_mood_art_has_three_lines() {
        for mood in [
            Mood::Idle,
            Mood::Studying,
            Mood::Resting,
            Mood::Happy,
            Mood::Sad,
            Mood::Hungry,
        ] {
            assert_eq!(mood.art().len(), 3);
            assert!(!mood.caption().is_empty());
        }
    }

    #[test]
    fn test_hungry_pet_shows_while_studying() {
        let db = Database::open_in_memory().unwrap();
        let store = ProfileStore::new(db.connection());
        store.load_or_create("amy").unwrap();
        store
            .save_pet(&Pet {
                hunger: 1,
                happiness: 5,
                checked_on: Local::now().date_naive(),
            })
            .unwrap();

        let recorder = SessionRecorder::new(db, "amy").unwrap();
        let config = TimerConfig::Custom { minutes: 0, seconds: 2 };
        let mut app = App::new(FocusController::new(false), config, recorder, None, true).unwrap();
        assert_eq!(app.screen.mood, Mood::Studying);
        assert_eq!(app.mood(), Mood::Hungry);

        app.tick_once();
        app.tick_once();
        assert_eq!(app.mood(), Mood::Happy);
    }

    #[test]
    fn test_fed_pet_keeps_screen_mood() {
        let app = app(TimerConfig::Custom { minutes: 0, seconds: 10 });
        assert_eq!(app.mood(), Mood::Studying);
    }
}
