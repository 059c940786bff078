//! Notifications from a running focus session.
//!
//! The state machine in [`super::session`] only returns events. The
//! [`FocusController`] turns those events into calls on a [`SessionObserver`],
//! which is how the profile, the sound player and the screen learn about
//! phase changes.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::mode::TimerConfig;
use super::session::{Phase, PhaseSummary, TickEvent, TimerSession};
use super::timer::Countdown;
use crate::error::TamoError;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOutcome {
    /// Every phase ran to 00:00.
    Completed,
    /// The session was broken off early.
    Broken,
}

/// Receiver of session notifications.
///
/// Every method has an empty default so sinks only implement what they need.
#[cfg_attr(test, mockall::automock)]
pub trait SessionObserver {
    /// A phase began counting down (used to switch the pet's mood).
    fn phase_started(&mut self, _phase: Phase, _length: Countdown) {}

    /// A phase ended; `summary.elapsed` is the time to credit.
    fn report_elapsed(&mut self, _summary: &PhaseSummary) {}

    /// Session controls should be enabled (idle) or disabled (running).
    fn set_controls_enabled(&mut self, _enabled: bool) {}

    /// Play the completion sound for a finished phase.
    ///
    /// # Errors
    ///
    /// Returns `TamoError::Sound` if playback fails. Failures are logged and
    /// never stop the session.
    fn play_completion_sound(&mut self, _phase: Phase) -> Result<(), TamoError> {
        Ok(())
    }

    /// The session returned to idle.
    fn session_ended(&mut self, _outcome: SessionOutcome) {}
}

/// Fans notifications out to several observers, in order.
#[derive(Default)]
pub struct ObserverList<'a> {
    observers: Vec<&'a mut dyn SessionObserver>,
}

impl<'a> ObserverList<'a> {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer.
    #[must_use]
    pub fn with(mut self, observer: &'a mut dyn SessionObserver) -> Self {
        self.observers.push(observer);
        self
    }
}

impl SessionObserver for ObserverList<'_> {
    fn phase_started(&mut self, phase: Phase, length: Countdown) {
        for observer in &mut self.observers {
            observer.phase_started(phase, length);
        }
    }

    fn report_elapsed(&mut self, summary: &PhaseSummary) {
        for observer in &mut self.observers {
            observer.report_elapsed(summary);
        }
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        for observer in &mut self.observers {
            observer.set_controls_enabled(enabled);
        }
    }

    fn play_completion_sound(&mut self, phase: Phase) -> Result<(), TamoError> {
        for observer in &mut self.observers {
            if let Err(e) = observer.play_completion_sound(phase) {
                warn!(error = %e, "completion sound failed");
            }
        }
        Ok(())
    }

    fn session_ended(&mut self, outcome: SessionOutcome) {
        for observer in &mut self.observers {
            observer.session_ended(outcome);
        }
    }
}

/// Keeps every reported phase and session outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLog {
    phases: Vec<PhaseSummary>,
    outcomes: Vec<SessionOutcome>,
}

impl SessionLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reported phases, oldest first.
    #[must_use]
    pub fn phases(&self) -> &[PhaseSummary] {
        &self.phases
    }

    /// Outcome of the most recent session.
    #[must_use]
    pub fn last_outcome(&self) -> Option<SessionOutcome> {
        self.outcomes.last().copied()
    }

    /// Seconds spent in phases of the given kind.
    #[must_use]
    pub fn seconds_in(&self, phase: Phase) -> u64 {
        self.phases
            .iter()
            .filter(|p| p.phase == phase)
            .map(|p| p.elapsed.total_seconds())
            .sum()
    }
}

impl SessionObserver for SessionLog {
    fn report_elapsed(&mut self, summary: &PhaseSummary) {
        self.phases.push(*summary);
    }

    fn session_ended(&mut self, outcome: SessionOutcome) {
        self.outcomes.push(outcome);
    }
}

/// Drives a [`TimerSession`] and reports its transitions.
#[derive(Debug, Clone, Default)]
pub struct FocusController {
    session: TimerSession,
    sound: bool,
}

impl FocusController {
    /// Create a controller; `sound` enables completion sounds.
    #[must_use]
    pub fn new(sound: bool) -> Self {
        Self {
            session: TimerSession::new(),
            sound,
        }
    }

    /// The underlying session.
    #[must_use]
    pub const fn session(&self) -> &TimerSession {
        &self.session
    }

    /// Start a session and disable controls.
    ///
    /// # Errors
    ///
    /// Returns `TamoError::InvalidInput` if the settings are invalid or a
    /// session is already running. Observers are not notified in that case.
    pub fn start(
        &mut self,
        config: TimerConfig,
        observer: &mut dyn SessionObserver,
    ) -> Result<(), TamoError> {
        self.session.start(config)?;
        observer.set_controls_enabled(false);
        observer.phase_started(self.session.phase(), self.session.remaining());
        Ok(())
    }

    /// Advance one second and notify on phase changes.
    pub fn tick(&mut self, observer: &mut dyn SessionObserver) -> TickEvent {
        let event = self.session.tick();

        match event {
            TickEvent::PhaseEnded(summary) => {
                self.finish_phase(&summary, observer);
                observer.phase_started(self.session.phase(), self.session.remaining());
            }
            TickEvent::AllSessionsComplete(summary) => {
                self.finish_phase(&summary, observer);
                observer.set_controls_enabled(true);
                observer.session_ended(SessionOutcome::Completed);
            }
            TickEvent::Skipped | TickEvent::Continue => {}
        }

        event
    }

    /// Break the session off early.
    pub fn break_now(&mut self, observer: &mut dyn SessionObserver) -> Option<PhaseSummary> {
        let summary = self.session.break_now()?;
        observer.report_elapsed(&summary);
        observer.set_controls_enabled(true);
        observer.session_ended(SessionOutcome::Broken);
        Some(summary)
    }

    /// Toggle between paused and running.
    pub fn toggle_pause(&mut self) -> bool {
        if self.session.is_paused() {
            self.session.resume()
        } else {
            self.session.pause()
        }
    }

    fn finish_phase(&self, summary: &PhaseSummary, observer: &mut dyn SessionObserver) {
        observer.report_elapsed(summary);

        if self.sound {
            if let Err(e) = observer.play_completion_sound(summary.phase) {
                warn!(error = %e, phase = %summary.phase, "completion sound failed");
            }
        } else {
            debug!(phase = %summary.phase, "completion sound disabled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::timer::ElapsedTime;
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn run_to_idle(controller: &mut FocusController, observer: &mut dyn SessionObserver) -> u32 {
        let mut ticks = 0;
        while controller.session().is_active() {
            controller.tick(observer);
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn test_custom_session_notification_order() {
        let mut observer = MockSessionObserver::new();
        let mut seq = Sequence::new();

        observer
            .expect_set_controls_enabled()
            .with(eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        observer
            .expect_phase_started()
            .with(eq(Phase::Focusing), eq(Countdown::new(1, 30)))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        observer
            .expect_report_elapsed()
            .withf(|summary| summary.elapsed == ElapsedTime::new(1, 30) && summary.completed)
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        observer
            .expect_play_completion_sound()
            .with(eq(Phase::Focusing))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        observer
            .expect_set_controls_enabled()
            .with(eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        observer
            .expect_session_ended()
            .with(eq(SessionOutcome::Completed))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut controller = FocusController::new(true);
        controller
            .start(TimerConfig::Custom { minutes: 1, seconds: 30 }, &mut observer)
            .unwrap();

        assert_eq!(run_to_idle(&mut controller, &mut observer), 90);
    }

    #[test]
    fn test_pomodoro_reports_every_phase() {
        let mut observer = MockSessionObserver::new();
        observer.expect_set_controls_enabled().return_const(());
        // Initial focus plus break, focus, break, focus
        observer.expect_phase_started().times(5).return_const(());
        observer.expect_report_elapsed().times(5).return_const(());
        observer
            .expect_play_completion_sound()
            .times(5)
            .returning(|_| Ok(()));
        observer
            .expect_session_ended()
            .with(eq(SessionOutcome::Completed))
            .times(1)
            .return_const(());

        let mut controller = FocusController::new(true);
        controller
            .start(
                TimerConfig::Pomodoro {
                    sessions: 3,
                    focus_minutes: 1,
                    break_minutes: 1,
                },
                &mut observer,
            )
            .unwrap();

        assert_eq!(run_to_idle(&mut controller, &mut observer), 5 * 60);
    }

    #[test]
    fn test_sound_failure_is_not_fatal() {
        let mut observer = MockSessionObserver::new();
        observer.expect_set_controls_enabled().return_const(());
        observer.expect_phase_started().return_const(());
        observer.expect_report_elapsed().times(3).return_const(());
        observer
            .expect_play_completion_sound()
            .times(3)
            .returning(|_| Err(TamoError::Sound("no audio device".to_string())));
        observer.expect_session_ended().times(1).return_const(());

        let mut controller = FocusController::new(true);
        controller
            .start(
                TimerConfig::Pomodoro {
                    sessions: 2,
                    focus_minutes: 1,
                    break_minutes: 1,
                },
                &mut observer,
            )
            .unwrap();

        assert_eq!(run_to_idle(&mut controller, &mut observer), 180);
    }

    #[test]
    fn test_sound_disabled() {
        let mut observer = MockSessionObserver::new();
        observer.expect_set_controls_enabled().return_const(());
        observer.expect_phase_started().return_const(());
        observer.expect_report_elapsed().return_const(());
        observer.expect_play_completion_sound().never();
        observer.expect_session_ended().return_const(());

        let mut controller = FocusController::new(false);
        controller
            .start(TimerConfig::Custom { minutes: 0, seconds: 3 }, &mut observer)
            .unwrap();
        run_to_idle(&mut controller, &mut observer);
    }

    #[test]
    fn test_break_now_notifies() {
        let mut observer = MockSessionObserver::new();
        observer
            .expect_set_controls_enabled()
            .with(eq(false))
            .times(1)
            .return_const(());
        observer.expect_phase_started().times(1).return_const(());
        observer
            .expect_report_elapsed()
            .withf(|summary| !summary.completed && summary.elapsed == ElapsedTime::new(0, 5))
            .times(1)
            .return_const(());
        observer
            .expect_set_controls_enabled()
            .with(eq(true))
            .times(1)
            .return_const(());
        observer
            .expect_session_ended()
            .with(eq(SessionOutcome::Broken))
            .times(1)
            .return_const(());
        observer.expect_play_completion_sound().never();

        let mut controller = FocusController::new(true);
        controller
            .start(TimerConfig::Interval { minutes: 5 }, &mut observer)
            .unwrap();
        for _ in 0..5 {
            controller.tick(&mut observer);
        }

        assert!(controller.break_now(&mut observer).is_some());
        assert!(controller.break_now(&mut observer).is_none());
    }

    #[test]
    fn test_invalid_start_notifies_nobody() {
        let mut observer = MockSessionObserver::new();
        observer.expect_set_controls_enabled().never();
        observer.expect_phase_started().never();

        let mut controller = FocusController::new(true);
        let result = controller.start(TimerConfig::Interval { minutes: 7 }, &mut observer);
        assert!(matches!(result, Err(TamoError::InvalidInput(_))));
    }

    #[test]
    fn test_observer_list_fans_out() {
        let mut first = MockSessionObserver::new();
        let mut second = MockSessionObserver::new();

        first.expect_set_controls_enabled().times(1).return_const(());
        second.expect_set_controls_enabled().times(1).return_const(());
        first
            .expect_play_completion_sound()
            .times(1)
            .returning(|_| Err(TamoError::Sound("boom".to_string())));
        second
            .expect_play_completion_sound()
            .times(1)
            .returning(|_| Ok(()));

        let mut list = ObserverList::new().with(&mut first).with(&mut second);

        list.set_controls_enabled(false);
        // A failing sink does not stop the others
        assert!(list.play_completion_sound(Phase::Focusing).is_ok());
    }

    #[test]
    fn test_session_log_totals() {
        let mut log = SessionLog::new();
        let mut controller = FocusController::new(false);

        controller
            .start(
                TimerConfig::Pomodoro {
                    sessions: 2,
                    focus_minutes: 1,
                    break_minutes: 1,
                },
                &mut log,
            )
            .unwrap();
        for _ in 0..90 {
            controller.tick(&mut log);
        }
        controller.break_now(&mut log);

        assert_eq!(log.phases().len(), 2);
        assert_eq!(log.seconds_in(Phase::Focusing), 60);
        assert_eq!(log.seconds_in(Phase::OnBreak), 30);
        assert_eq!(log.last_outcome(), Some(SessionOutcome::Broken));
    }

    #[test]
    fn test_toggle_pause() {
        let mut observer = MockSessionObserver::new();
        observer.expect_set_controls_enabled().return_const(());
        observer.expect_phase_started().return_const(());

        let mut controller = FocusController::new(false);
        assert!(!controller.toggle_pause());

        controller
            .start(TimerConfig::Custom { minutes: 0, seconds: 5 }, &mut observer)
            .unwrap();
        assert!(controller.toggle_pause());
        assert!(controller.session().is_paused());
        assert_eq!(controller.tick(&mut observer), TickEvent::Skipped);
        assert!(controller.toggle_pause());
        assert!(!controller.session().is_paused());
    }
}
