use serde::Serialize;

use crate::core::time::FixedTimestep;

/// One countdown step per second.
const COUNTDOWN_STEP: f32 = 1.0;

/// Lifecycle of a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    NotStarted,
    Running,
    Paused,
    Completed,
    Failed,
    TimedOut,
}

impl SessionPhase {
    /// Completed, Failed and TimedOut only leave through a reset.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Completed | SessionPhase::Failed | SessionPhase::TimedOut)
    }

    /// The round has begun and has not ended yet.
    pub fn is_started(self) -> bool {
        matches!(self, SessionPhase::Running | SessionPhase::Paused)
    }

    /// Numeric code written into the state buffer.
    pub fn code(self) -> f32 {
        match self {
            SessionPhase::NotStarted => 0.0,
            SessionPhase::Running => 1.0,
            SessionPhase::Paused => 2.0,
            SessionPhase::Completed => 3.0,
            SessionPhase::Failed => 4.0,
            SessionPhase::TimedOut => 5.0,
        }
    }
}

/// Result of advancing the clock by one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    /// Whole seconds taken off the clock.
    pub ticked: u32,
    /// The clock hit zero during this frame.
    pub timed_out: bool,
}

/// Countdown clock and round lifecycle.
///
/// Driven by frame deltas. Only a running session loses time; every stop
/// is idempotent.
#[derive(Debug, Clone)]
pub struct SessionClock {
    phase: SessionPhase,
    time_limit: u32,
    time_left: u32,
    /// Engine time in seconds, advanced by every tick.
    now: f64,
    started_at: Option<f64>,
    countdown: FixedTimestep,
}

impl SessionClock {
    pub fn new(time_limit: u32) -> Self {
        Self {
            phase: SessionPhase::NotStarted,
            time_limit,
            time_left: time_limit,
            now: 0.0,
            started_at: None,
            // Long frames catch up in full.
            countdown: FixedTimestep::with_max_steps(COUNTDOWN_STEP, time_limit.max(1)),
        }
    }

    /// NotStarted → Running. Returns whether the phase changed.
    pub fn start(&mut self) -> bool {
        if self.phase != SessionPhase::NotStarted {
            return false;
        }
        self.phase = SessionPhase::Running;
        self.started_at = Some(self.now);
        self.countdown.reset();
        log::info!("session started with {}s on the clock", self.time_left);
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        self.phase = SessionPhase::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        self.phase = SessionPhase::Running;
        true
    }

    /// Stop the clock on victory.
    pub fn complete(&mut self) -> bool {
        self.stop(SessionPhase::Completed)
    }

    /// Stop the clock after the last life is lost.
    pub fn fail(&mut self) -> bool {
        self.stop(SessionPhase::Failed)
    }

    fn stop(&mut self, terminal: SessionPhase) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.phase = terminal;
        self.countdown.reset();
        true
    }

    /// Back to NotStarted with a full clock.
    pub fn reset(&mut self, time_limit: u32) {
        self.phase = SessionPhase::NotStarted;
        self.time_limit = time_limit;
        self.time_left = time_limit;
        self.started_at = None;
        self.countdown = FixedTimestep::with_max_steps(COUNTDOWN_STEP, time_limit.max(1));
    }

    /// Advance engine time by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> Countdown {
        if dt > 0.0 {
            self.now += dt as f64;
        }
        let mut report = Countdown::default();
        if self.phase != SessionPhase::Running {
            return report;
        }

        let steps = self.countdown.accumulate(dt);
        for _ in 0..steps {
            self.time_left = self.time_left.saturating_sub(1);
            report.ticked += 1;
            if self.time_left == 0 {
                self.phase = SessionPhase::TimedOut;
                self.countdown.reset();
                report.timed_out = true;
                log::info!("session timed out");
                break;
            }
        }
        report
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    /// Engine time at which the session started.
    pub fn started_at(&self) -> Option<f64> {
        self.started_at
    }

    /// Seconds taken off the clock so far.
    pub fn elapsed(&self) -> u32 {
        self.time_limit - self.time_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_waits_until_started() {
        let mut clock = SessionClock::new(10);
        assert_eq!(clock.tick(3.0), Countdown::default());
        assert_eq!(clock.time_left(), 10);
        assert!(clock.start());
        assert_eq!(clock.started_at(), Some(3.0));
        assert!(!clock.start());
    }

    #[test]
    fn counts_down_once_per_second() {
        let mut clock = SessionClock::new(10);
        clock.start();
        for _ in 0..14 {
            clock.tick(0.25);
        }
        assert_eq!(clock.time_left(), 7);
        assert_eq!(clock.elapsed(), 3);
    }

    #[test]
    fn times_out_at_zero_and_stops() {
        let mut clock = SessionClock::new(3);
        clock.start();
        let report = clock.tick(5.0);
        assert_eq!(report, Countdown { ticked: 3, timed_out: true });
        assert_eq!(clock.phase(), SessionPhase::TimedOut);
        assert_eq!(clock.tick(5.0), Countdown::default());
        assert_eq!(clock.time_left(), 0);
    }

    #[test]
    fn pause_freezes_the_countdown() {
        let mut clock = SessionClock::new(10);
        clock.start();
        clock.tick(2.0);
        assert!(clock.pause());
        clock.tick(5.0);
        assert_eq!(clock.time_left(), 8);
        assert!(clock.resume());
        clock.tick(1.0);
        assert_eq!(clock.time_left(), 7);
    }

    #[test]
    fn stopping_is_idempotent() {
        let mut clock = SessionClock::new(10);
        clock.start();
        assert!(clock.complete());
        assert!(!clock.complete());
        assert!(!clock.fail());
        assert_eq!(clock.phase(), SessionPhase::Completed);
        clock.tick(4.0);
        assert_eq!(clock.time_left(), 10);
    }

    #[test]
    fn reset_restores_a_full_clock() {
        let mut clock = SessionClock::new(10);
        clock.start();
        clock.tick(4.0);
        clock.fail();
        clock.reset(20);
        assert_eq!(clock.phase(), SessionPhase::NotStarted);
        assert_eq!(clock.time_left(), 20);
        assert_eq!(clock.started_at(), None);
    }
}
