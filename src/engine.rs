use std::time::{Duration, Instant};

use thiserror::Error;

/// Refresh cadences the UI may tick at, in seconds. Cosmetic only:
/// countdown accuracy comes from the deadline, not from counting ticks.
pub const REFRESH_INTERVALS: [u64; 5] = [1, 5, 10, 30, 60];

pub const MIN_MINUTES: u64 = 1;
pub const MAX_MINUTES: u64 = 90;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Ready,
    Running,
    Paused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Work,
    Break,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Work => Mode::Break,
            Mode::Break => Mode::Work,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Work => "Focus time!",
            Mode::Break => "Break time!",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("cannot {op} while {phase}")]
    InvalidTransition { op: &'static str, phase: Phase },
    #[error("invalid refresh interval {0}s, expected one of 1, 5, 10, 30 or 60")]
    InvalidConfig(u64),
}

/// Durations are stored in seconds; the UI edits them in minutes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerConfig {
    pub work_secs: u64,
    pub break_secs: u64,
    pub refresh_secs: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_secs: 25 * 60,
            break_secs: 5 * 60,
            refresh_secs: 1,
        }
    }
}

fn clamp_minutes(minutes: u64) -> u64 {
    minutes.clamp(MIN_MINUTES, MAX_MINUTES)
}

/// Read-only view handed to the renderer on every refresh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    pub phase: Phase,
    pub mode: Mode,
    pub session_duration: u64,
    pub seconds_left: u64,
    pub progress: f64,
}

/// The timer state machine. Owns all session state; the host feeds it
/// user events and periodic `tick(now)` calls and renders `snapshot()`.
/// Time never comes from an internal clock, always from the caller.
#[derive(Debug)]
pub struct TimerEngine {
    config: TimerConfig,
    phase: Phase,
    mode: Mode,
    session_duration: u64,
    seconds_left: u64,
    deadline: Option<Instant>,
}

impl TimerEngine {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            phase: Phase::Ready,
            mode: Mode::Work,
            session_duration: config.work_secs,
            seconds_left: config.work_secs,
            deadline: None,
        }
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn mode_duration(&self) -> u64 {
        match self.mode {
            Mode::Work => self.config.work_secs,
            Mode::Break => self.config.break_secs,
        }
    }

    /// Begins counting down the current mode's configured duration.
    /// Calling while Running or Paused restarts the current mode.
    pub fn start(&mut self, now: Instant) {
        self.phase = Phase::Running;
        self.session_duration = self.mode_duration();
        self.seconds_left = self.session_duration;
        self.deadline = Some(now + Duration::from_secs(self.seconds_left));
    }

    /// Freezes the countdown at whatever is left on the deadline.
    pub fn pause(&mut self, now: Instant) -> Result<(), EngineError> {
        if self.phase != Phase::Running {
            return Err(EngineError::InvalidTransition {
                op: "pause",
                phase: self.phase,
            });
        }
        self.seconds_left = self.remaining(now);
        self.phase = Phase::Paused;
        self.deadline = None;
        Ok(())
    }

    /// Re-arms the deadline from the frozen seconds_left.
    pub fn resume(&mut self, now: Instant) -> Result<(), EngineError> {
        if self.phase != Phase::Paused {
            return Err(EngineError::InvalidTransition {
                op: "resume",
                phase: self.phase,
            });
        }
        self.phase = Phase::Running;
        self.deadline = Some(now + Duration::from_secs(self.seconds_left));
        Ok(())
    }

    /// Toggles work/break and starts the new mode. Valid from any phase.
    pub fn next(&mut self, now: Instant) {
        self.mode = self.mode.toggled();
        self.start(now);
    }

    /// Back to Ready, Work mode, fresh work duration. Idempotent.
    pub fn reset(&mut self) {
        self.phase = Phase::Ready;
        self.mode = Mode::Work;
        self.session_duration = self.config.work_secs;
        self.seconds_left = self.session_duration;
        self.deadline = None;
    }

    /// Recomputes the remaining time from the deadline. On expiry the
    /// cycle auto-advances into the other mode; the engine never sits
    /// at zero. No-op outside Running, so the driver may call this
    /// unconditionally.
    pub fn tick(&mut self, now: Instant) {
        if self.phase != Phase::Running {
            return;
        }
        self.seconds_left = self.remaining(now);
        if self.seconds_left == 0 {
            self.next(now);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        // In Ready the display follows the current config live; nothing
        // is frozen until start arms a deadline.
        let (session_duration, seconds_left) = if self.phase == Phase::Ready {
            (self.config.work_secs, self.config.work_secs)
        } else {
            (self.session_duration, self.seconds_left)
        };

        let progress = if session_duration == 0 {
            0.0
        } else {
            let elapsed = (session_duration - seconds_left) as f64;
            (elapsed / session_duration as f64).clamp(0.0, 1.0)
        };

        Snapshot {
            phase: self.phase,
            mode: self.mode,
            session_duration,
            seconds_left,
            progress,
        }
    }

    /// Clamped to [1,90] minutes. Takes effect on the next start, next
    /// or reset; a Running/Paused session keeps its frozen duration.
    pub fn set_work_minutes(&mut self, minutes: u64) {
        self.config.work_secs = clamp_minutes(minutes) * 60;
    }

    pub fn set_break_minutes(&mut self, minutes: u64) {
        self.config.break_secs = clamp_minutes(minutes) * 60;
    }

    pub fn set_refresh_secs(&mut self, secs: u64) -> Result<(), EngineError> {
        if !REFRESH_INTERVALS.contains(&secs) {
            return Err(EngineError::InvalidConfig(secs));
        }
        self.config.refresh_secs = secs;
        Ok(())
    }

    fn remaining(&self, now: Instant) -> u64 {
        match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(now).as_secs(),
            None => self.seconds_left,
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn new_engine_is_ready_in_work_mode() {
        let engine = TimerEngine::default();
        let snap = engine.snapshot();

        assert_eq!(snap.phase, Phase::Ready);
        assert_eq!(snap.mode, Mode::Work);
        assert_eq!(snap.session_duration, 1500);
        assert_eq!(snap.seconds_left, 1500);
        assert_eq!(snap.progress, 0.0);
    }

    #[test]
    fn start_arms_the_work_duration() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        engine.start(t0);

        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::Running);
        assert_eq!(snap.mode, Mode::Work);
        assert_eq!(snap.seconds_left, 1500);
        assert_eq!(snap.progress, 0.0);
    }

    #[test]
    fn tick_derives_remaining_from_deadline() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        engine.start(t0);
        engine.tick(t0 + secs(900));

        let snap = engine.snapshot();
        assert_eq!(snap.seconds_left, 600);
        assert!((snap.progress - 0.6).abs() < 1e-9);
    }

    #[test]
    fn repeated_ticks_at_same_instant_are_idempotent() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        engine.start(t0);
        engine.tick(t0 + secs(100));
        engine.tick(t0 + secs(100));
        engine.tick(t0 + secs(100));

        assert_eq!(engine.snapshot().seconds_left, 1400);
    }

    #[test]
    fn tick_on_expiry_advances_into_break() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        engine.start(t0);
        engine.tick(t0 + secs(1500));

        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::Running);
        assert_eq!(snap.mode, Mode::Break);
        assert_eq!(snap.seconds_left, 300);
        assert_eq!(snap.progress, 0.0);
    }

    #[test]
    fn tick_past_expiry_never_leaves_zero_showing() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        engine.start(t0);
        // driver was stalled well past the deadline
        engine.tick(t0 + secs(4000));

        let snap = engine.snapshot();
        assert_eq!(snap.mode, Mode::Break);
        assert_eq!(snap.seconds_left, 300);
    }

    #[test]
    fn tick_outside_running_is_a_noop() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        engine.tick(t0 + secs(60));
        assert_eq!(engine.snapshot().phase, Phase::Ready);
        assert_eq!(engine.snapshot().seconds_left, 1500);

        engine.start(t0);
        engine.pause(t0 + secs(10)).unwrap();
        engine.tick(t0 + secs(500));
        assert_eq!(engine.snapshot().seconds_left, 1490);
    }

    #[test]
    fn pause_freezes_remaining_time() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        engine.start(t0);
        engine.tick(t0 + secs(900));
        engine.pause(t0 + secs(900)).unwrap();

        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::Paused);
        assert_eq!(snap.seconds_left, 600);
        assert!((snap.progress - 0.6).abs() < 1e-9);
    }

    #[test]
    fn resume_rearms_without_losing_time() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        engine.start(t0);
        engine.pause(t0 + secs(100)).unwrap();
        // a long paused stretch costs nothing
        engine.resume(t0 + secs(5000)).unwrap();

        assert_eq!(engine.snapshot().seconds_left, 1400);

        engine.tick(t0 + secs(5000) + secs(400));
        assert_eq!(engine.snapshot().seconds_left, 1000);
    }

    #[test]
    fn pause_then_immediate_resume_preserves_seconds_left() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        engine.start(t0);
        engine.tick(t0 + secs(250));
        let before = engine.snapshot().seconds_left;

        engine.pause(t0 + secs(250)).unwrap();
        engine.resume(t0 + secs(250)).unwrap();

        assert_eq!(engine.snapshot().seconds_left, before);
    }

    #[test]
    fn pause_when_not_running_is_rejected() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        let err = engine.pause(t0).unwrap_err();
        assert_matches!(
            err,
            EngineError::InvalidTransition {
                op: "pause",
                phase: Phase::Ready
            }
        );
        // state untouched
        assert_eq!(engine.snapshot().phase, Phase::Ready);
        assert_eq!(engine.snapshot().seconds_left, 1500);
    }

    #[test]
    fn resume_when_not_paused_is_rejected() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        assert_matches!(
            engine.resume(t0),
            Err(EngineError::InvalidTransition {
                op: "resume",
                phase: Phase::Ready
            })
        );

        engine.start(t0);
        assert_matches!(
            engine.resume(t0),
            Err(EngineError::InvalidTransition {
                op: "resume",
                phase: Phase::Running
            })
        );
    }

    #[test]
    fn next_toggles_mode_from_any_phase() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        // from Ready
        engine.next(t0);
        assert_eq!(engine.snapshot().mode, Mode::Break);
        assert_eq!(engine.snapshot().seconds_left, 300);

        // from Running
        engine.next(t0);
        assert_eq!(engine.snapshot().mode, Mode::Work);
        assert_eq!(engine.snapshot().seconds_left, 1500);

        // from Paused
        engine.pause(t0).unwrap();
        engine.next(t0);
        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::Running);
        assert_eq!(snap.mode, Mode::Break);
        assert_eq!(snap.seconds_left, 300);
    }

    #[test]
    fn start_while_running_restarts_current_mode() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        engine.start(t0);
        engine.tick(t0 + secs(700));
        engine.start(t0 + secs(700));

        let snap = engine.snapshot();
        assert_eq!(snap.mode, Mode::Work);
        assert_eq!(snap.seconds_left, 1500);
    }

    #[test]
    fn reset_returns_to_ready_work_from_any_phase() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        engine.next(t0);
        engine.tick(t0 + secs(100));
        engine.reset();

        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::Ready);
        assert_eq!(snap.mode, Mode::Work);
        assert_eq!(snap.seconds_left, 1500);
        assert_eq!(snap.progress, 0.0);

        // idempotent
        engine.reset();
        assert_eq!(engine.snapshot(), snap);
    }

    #[test]
    fn ready_snapshot_follows_config_live() {
        let mut engine = TimerEngine::default();

        engine.set_work_minutes(10);

        let snap = engine.snapshot();
        assert_eq!(snap.session_duration, 600);
        assert_eq!(snap.seconds_left, 600);
    }

    #[test]
    fn config_change_does_not_touch_running_session() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        engine.start(t0);
        engine.set_work_minutes(10);
        engine.tick(t0 + secs(60));

        assert_eq!(engine.snapshot().session_duration, 1500);
        assert_eq!(engine.snapshot().seconds_left, 1440);

        // the new value shows up after a reset
        engine.reset();
        assert_eq!(engine.snapshot().seconds_left, 600);
    }

    #[test]
    fn config_change_does_not_touch_paused_session() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        engine.start(t0);
        engine.pause(t0 + secs(300)).unwrap();
        engine.set_work_minutes(1);

        assert_eq!(engine.snapshot().session_duration, 1500);
        assert_eq!(engine.snapshot().seconds_left, 1200);
    }

    #[test]
    fn duration_minutes_are_clamped() {
        let mut engine = TimerEngine::default();

        engine.set_work_minutes(0);
        assert_eq!(engine.config().work_secs, 60);

        engine.set_work_minutes(500);
        assert_eq!(engine.config().work_secs, 90 * 60);

        engine.set_break_minutes(0);
        assert_eq!(engine.config().break_secs, 60);

        engine.set_break_minutes(91);
        assert_eq!(engine.config().break_secs, 90 * 60);
    }

    #[test]
    fn refresh_interval_must_be_in_the_enumerated_set() {
        let mut engine = TimerEngine::default();

        for secs in REFRESH_INTERVALS {
            assert!(engine.set_refresh_secs(secs).is_ok());
            assert_eq!(engine.config().refresh_secs, secs);
        }

        assert_matches!(engine.set_refresh_secs(2), Err(EngineError::InvalidConfig(2)));
        assert_matches!(engine.set_refresh_secs(0), Err(EngineError::InvalidConfig(0)));
        // prior value kept on rejection
        assert_eq!(engine.config().refresh_secs, 60);
    }

    #[test]
    fn break_expiry_advances_back_to_work() {
        let mut engine = TimerEngine::default();
        let t0 = Instant::now();

        engine.next(t0); // Break, 300s
        engine.tick(t0 + secs(300));

        let snap = engine.snapshot();
        assert_eq!(snap.mode, Mode::Work);
        assert_eq!(snap.seconds_left, 1500);
    }

    #[test]
    fn progress_guards_zero_duration() {
        // unreachable through the public setters (minutes clamp to >=1)
        // but snapshot must not divide by zero if it ever happens
        let mut engine = TimerEngine::new(TimerConfig {
            work_secs: 0,
            break_secs: 0,
            refresh_secs: 1,
        });
        engine.start(Instant::now());
        assert_eq!(engine.snapshot().progress, 0.0);
    }

    #[test]
    fn error_messages_name_the_operation() {
        let mut engine = TimerEngine::default();
        let err = engine.pause(Instant::now()).unwrap_err();
        assert_eq!(err.to_string(), "cannot pause while Ready");

        let err = engine.set_refresh_secs(7).unwrap_err();
        assert!(err.to_string().contains("7s"));
    }
}
