//! Persists finished phases and credits the profile.

use chrono::{Local, Utc};
use tracing::{error, info};

use super::observer::{SessionObserver, SessionOutcome};
use super::session::{Phase, PhaseSummary};
use super::storage::{FocusStorage, SessionRecord};
use crate::error::TamoError;
use crate::features::profile::{Achievement, Profile, ProfileStore};
use crate::storage::Database;

/// Observer that writes every reported phase to the database.
///
/// Each phase is credited to the profile as it is reported (breaks only
/// when `credit_breaks` is on). A completed session cheers Tamo up, and
/// achievements are checked whenever a session returns to idle.
pub struct SessionRecorder {
    db: Database,
    profile: Profile,
    credit_breaks: bool,
    unlocked: Vec<Achievement>,
    last_error: Option<TamoError>,
}

impl SessionRecorder {
    /// Load (or create) the profile, settle the pet and start recording.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be loaded or created.
    pub fn new(mut db: Database, profile_name: &str) -> Result<Self, TamoError> {
        let profile = db.transaction(|tx| {
            let store = ProfileStore::new(tx);
            store.load_or_create(profile_name)?;
            store.settle_pet(Local::now().date_naive())?;
            store.require()
        })?;

        Ok(Self {
            db,
            profile,
            credit_breaks: true,
            unlocked: Vec::new(),
            last_error: None,
        })
    }

    /// Whether break phases are credited too.
    #[must_use]
    pub const fn with_credit_breaks(mut self, credit_breaks: bool) -> Self {
        self.credit_breaks = credit_breaks;
        self
    }

    /// The profile as last read back from the database.
    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Achievements unlocked since the last call.
    pub fn take_unlocked(&mut self) -> Vec<Achievement> {
        std::mem::take(&mut self.unlocked)
    }

    /// The most recent write failure, if any.
    pub fn take_error(&mut self) -> Option<TamoError> {
        self.last_error.take()
    }

    #[allow(clippy::cast_possible_wrap)]
    fn record(&mut self, summary: &PhaseSummary) -> Result<(), TamoError> {
        let mut record = SessionRecord::from_summary(summary, Utc::now());
        let credited = summary.phase == Phase::Focusing || self.credit_breaks;
        let seconds = summary.elapsed.total_seconds() as i64;

        self.profile = self.db.transaction(|tx| {
            FocusStorage::new(tx).insert(&mut record)?;
            let store = ProfileStore::new(tx);
            if credited {
                store.report(seconds)?;
            }
            store.require()
        })?;
        Ok(())
    }

    fn check_achievements(&mut self, outcome: SessionOutcome) -> Result<(), TamoError> {
        let now = Utc::now();
        let (profile, unlocked) = self.db.transaction(|tx| {
            let store = ProfileStore::new(tx);
            if outcome == SessionOutcome::Completed {
                store.cheer()?;
            }
            let mut profile = store.require()?;
            let unlocked = profile.unlock_reached(now);
            store.save_achievements(&profile.achievements)?;
            Ok((profile, unlocked))
        })?;

        for achievement in &unlocked {
            info!(achievement = achievement.as_str(), "achievement unlocked");
        }
        self.profile = profile;
        self.unlocked.extend(unlocked);
        Ok(())
    }
}

impl SessionObserver for SessionRecorder {
    fn report_elapsed(&mut self, summary: &PhaseSummary) {
        if let Err(e) = self.record(summary) {
            error!(error = %e, phase = %summary.phase, "failed to record phase");
            self.last_error = Some(e);
        }
    }

    fn session_ended(&mut self, outcome: SessionOutcome) {
        if let Err(e) = self.check_achievements(outcome) {
            error!(error = %e, "failed to save achievements");
            self.last_error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::mode::{FocusMode, TimerConfig};
    use crate::features::focus::observer::FocusController;
    use crate::features::focus::timer::ElapsedTime;
    use crate::features::profile::pet::{MAX_LEVEL, START_LEVEL};

    fn recorder() -> SessionRecorder {
        SessionRecorder::new(Database::open_in_memory().unwrap(), "amy").unwrap()
    }

    fn focus_summary(minutes: u32, seconds: u32) -> PhaseSummary {
        PhaseSummary {
            mode: FocusMode::Custom,
            phase: Phase::Focusing,
            elapsed: ElapsedTime::new(minutes, seconds),
            planned_seconds: 3 * 60 * 60,
            completed: true,
            pomodoro_index: None,
        }
    }

    fn run_pomodoro(recorder: &mut SessionRecorder) {
        let mut controller = FocusController::new(false);
        controller
            .start(
                TimerConfig::Pomodoro {
                    sessions: 2,
                    focus_minutes: 1,
                    break_minutes: 1,
                },
                recorder,
            )
            .unwrap();
        while controller.session().is_active() {
            controller.tick(recorder);
        }
    }

    #[test]
    fn test_pomodoro_credits_breaks_by_default() {
        let mut recorder = recorder();
        run_pomodoro(&mut recorder);

        assert_eq!(recorder.profile().total_focus_seconds, 180);
        assert_eq!(recorder.profile().tokens, 3);
        let phases = FocusStorage::new(recorder.db.connection()).recent(10).unwrap();
        assert_eq!(phases.len(), 3);

        let stored = ProfileStore::new(recorder.db.connection()).require().unwrap();
        assert_eq!(stored.total_focus_seconds, 180);
        assert!(recorder.take_error().is_none());
    }

    #[test]
    fn test_pomodoro_without_break_credit() {
        let mut recorder = recorder().with_credit_breaks(false);
        run_pomodoro(&mut recorder);

        assert_eq!(recorder.profile().total_focus_seconds, 120);
        let phases = FocusStorage::new(recorder.db.connection()).recent(10).unwrap();
        assert_eq!(phases.len(), 3);
        assert_eq!(phases.iter().filter(|p| !p.is_focus()).count(), 1);
    }

    #[test]
    fn test_broken_session_is_credited() {
        let mut recorder = recorder();
        let mut controller = FocusController::new(false);

        controller
            .start(TimerConfig::Custom { minutes: 10, seconds: 0 }, &mut recorder)
            .unwrap();
        for _ in 0..42 {
            controller.tick(&mut recorder);
        }
        controller.break_now(&mut recorder);

        assert_eq!(recorder.profile().total_focus_seconds, 42);
        // Only completed sessions cheer Tamo up
        assert_eq!(recorder.profile().pet.happiness, START_LEVEL);
        let recent = FocusStorage::new(recorder.db.connection()).recent(1).unwrap();
        assert!(!recent[0].completed);
    }

    #[test]
    fn test_completed_session_cheers_pet() {
        let mut recorder = recorder();
        for _ in 0..(MAX_LEVEL - START_LEVEL) {
            recorder.report_elapsed(&focus_summary(1, 0));
            recorder.session_ended(SessionOutcome::Completed);
        }

        assert_eq!(recorder.profile().pet.happiness, MAX_LEVEL);
        assert_eq!(recorder.take_unlocked(), vec![Achievement::TamoLove]);
    }

    #[test]
    fn test_achievement_unlocks_once() {
        let mut recorder = recorder();

        recorder.report_elapsed(&focus_summary(180, 0));
        assert!(recorder.take_unlocked().is_empty());

        recorder.session_ended(SessionOutcome::Broken);
        assert_eq!(recorder.take_unlocked(), vec![Achievement::FocusThreeHours]);

        recorder.report_elapsed(&focus_summary(1, 0));
        recorder.session_ended(SessionOutcome::Broken);
        assert!(recorder.take_unlocked().is_empty());

        let stored = ProfileStore::new(recorder.db.connection()).require().unwrap();
        assert_eq!(stored.held(), vec![Achievement::FocusThreeHours]);
    }

    #[test]
    fn test_existing_profile_is_kept() {
        let db = Database::open_in_memory().unwrap();
        let store = ProfileStore::new(db.connection());
        store.load_or_create("amy").unwrap();
        store.report(300).unwrap();

        let recorder = SessionRecorder::new(db, "someone-else").unwrap();
        assert_eq!(recorder.profile().name, "amy");
        assert_eq!(recorder.profile().total_focus_seconds, 300);
    }

    #[test]
    fn test_credit_keeps_changes_from_other_processes() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("tamo.db");
        let mut recorder = SessionRecorder::new(Database::open_at(&path).unwrap(), "amy").unwrap();

        let other = Database::open_at(&path).unwrap();
        let store = ProfileStore::new(other.connection());
        store.rename("Bea").unwrap();
        store.report(600).unwrap();

        recorder.report_elapsed(&focus_summary(25, 0));
        recorder.session_ended(SessionOutcome::Completed);
        assert!(recorder.take_error().is_none());

        let stored = store.require().unwrap();
        assert_eq!(stored.name, "Bea");
        assert_eq!(stored.total_focus_seconds, 2100);
        assert_eq!(recorder.profile(), &stored);
    }
}
