use std::time::{Duration, Instant};

use crate::drivers::error::ScopeError;

/// Fixed-interval timer driving render ticks.
///
/// A tick that runs late does not cause a burst of catch-up ticks; the next
/// one is scheduled a full interval after it.
#[derive(Clone, Debug)]
pub struct TickSchedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl TickSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// `time_scale * 1000 / frames_amount` milliseconds.
    pub fn for_window(time_scale: f64, frames_amount: usize) -> Result<Self, ScopeError> {
        Ok(Self::new(tick_interval(time_scale, frames_amount)?))
    }

    /// True when a tick should fire at `now`; the first poll always fires.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now < due => false,
            Some(due) if now < due + self.interval => {
                self.next_due = Some(due + self.interval);
                true
            }
            _ => {
                self.next_due = Some(now + self.interval);
                true
            }
        }
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    /// Sleeps until the next tick is due, then claims it.
    pub fn wait(&mut self) {
        let pause = self.time_until_due(Instant::now());
        if !pause.is_zero() {
            std::thread::sleep(pause);
        }
        self.poll(Instant::now());
    }
}

/// Longest accepted tick; keeps `Instant` arithmetic in range.
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

pub fn tick_interval(time_scale: f64, frames_amount: usize) -> Result<Duration, ScopeError> {
    if frames_amount == 0 {
        return Err(ScopeError::InvalidCapacity);
    }
    if !time_scale.is_finite() || time_scale <= 0.0 {
        return Err(ScopeError::InvalidTimeScale(time_scale));
    }
    Duration::try_from_secs_f64(time_scale / frames_amount as f64)
        .ok()
        .filter(|interval| *interval <= MAX_TICK_INTERVAL)
        .ok_or(ScopeError::InvalidTimeScale(time_scale))
}
