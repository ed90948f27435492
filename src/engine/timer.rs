use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerPolicy {
    pub inactivity: Duration,
    pub break_after: Duration,
    pub break_length: Duration,
}

impl Default for TimerPolicy {
    fn default() -> Self {
        Self {
            inactivity: Duration::from_secs(120),
            break_after: Duration::from_secs(900),
            break_length: Duration::from_secs(300),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerSignal {
    /// No session clock is running.
    Idle,
    Running { elapsed_secs: u64 },
    /// The learner went quiet; the clock was cleared and waits for resume.
    Inactive,
    BreakStarted {
        elapsed_secs: u64,
        new_high_score: Option<u64>,
    },
    OnBreak { remaining_secs: u64 },
    BreakOver,
}

/// Engaged-time clock with inactivity pause and forced breaks. Elapsed time
/// is always `now - start`, so late or skipped ticks do not drift.
#[derive(Clone, Debug)]
pub struct SessionTimer {
    pub policy: TimerPolicy,
    pub session_started_at: Option<Instant>,
    pub last_interaction_at: Option<Instant>,
    pub elapsed_secs: u64,
    pub on_break: bool,
    pub break_ends_at: Option<Instant>,
    pub high_score_secs: u64,
}

impl SessionTimer {
    pub fn new(policy: TimerPolicy, high_score_secs: u64) -> Self {
        Self {
            policy,
            session_started_at: None,
            last_interaction_at: None,
            elapsed_secs: 0,
            on_break: false,
            break_ends_at: None,
            high_score_secs,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.session_started_at = Some(now);
        self.last_interaction_at = Some(now);
        self.elapsed_secs = 0;
    }

    pub fn record_interaction(&mut self, now: Instant) {
        if self.on_break {
            return;
        }
        if self.session_started_at.is_none() {
            self.session_started_at = Some(now);
            self.elapsed_secs = 0;
        }
        self.last_interaction_at = Some(now);
    }

    pub fn resume(&mut self, now: Instant) {
        self.start(now);
    }

    pub fn is_running(&self) -> bool {
        self.session_started_at.is_some() && !self.on_break
    }

    pub fn tick(&mut self, now: Instant) -> TimerSignal {
        if self.on_break {
            let ends = self.break_ends_at.unwrap_or(now);
            if now >= ends {
                self.reset();
                return TimerSignal::BreakOver;
            }
            let remaining = ends.duration_since(now);
            return TimerSignal::OnBreak {
                remaining_secs: remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0),
            };
        }

        let Some(started) = self.session_started_at else {
            return TimerSignal::Idle;
        };

        let elapsed = now.saturating_duration_since(started);
        self.elapsed_secs = elapsed.as_secs();

        if let Some(last) = self.last_interaction_at
            && now.saturating_duration_since(last) > self.policy.inactivity
        {
            self.clear_clock();
            return TimerSignal::Inactive;
        }

        if elapsed >= self.policy.break_after {
            let elapsed_secs = self.elapsed_secs;
            self.on_break = true;
            self.break_ends_at = Some(now + self.policy.break_length);
            return TimerSignal::BreakStarted {
                elapsed_secs,
                new_high_score: self.raise_high_score(elapsed_secs),
            };
        }

        TimerSignal::Running {
            elapsed_secs: self.elapsed_secs,
        }
    }

    /// End the session clock; raises the high score if this run beat it.
    pub fn stop(&mut self, now: Instant) -> Option<u64> {
        let new_high = self
            .session_started_at
            .filter(|_| !self.on_break)
            .map(|started| now.saturating_duration_since(started).as_secs())
            .and_then(|elapsed| self.raise_high_score(elapsed));
        self.reset();
        new_high
    }

    /// Clear everything except the high score.
    pub fn reset(&mut self) {
        self.clear_clock();
        self.on_break = false;
        self.break_ends_at = None;
    }

    fn clear_clock(&mut self) {
        self.session_started_at = None;
        self.last_interaction_at = None;
        self.elapsed_secs = 0;
    }

    fn raise_high_score(&mut self, elapsed_secs: u64) -> Option<u64> {
        if elapsed_secs > self.high_score_secs {
            self.high_score_secs = elapsed_secs;
            Some(elapsed_secs)
        } else {
            None
        }
    }
}
