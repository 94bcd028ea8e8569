use crate::error::{ClockError, ClockResult};
use chrono::Utc;
use std::thread;
use std::time::Duration;
use trader_core::Tick;
use trader_ports::{Clock, Ticks};

/// Real wall clock for live trading
///
/// Yields the current UTC time, then suspends the consuming thread for
/// `interval` before producing the next tick. Consecutive ticks are at least
/// `interval` apart; time spent by the consumer between ticks adds to that.
#[derive(Debug, Clone)]
pub struct IntervalClock {
    interval: Duration,
}

impl IntervalClock {
    pub fn new(interval: Duration) -> ClockResult<Self> {
        if interval.is_zero() {
            return Err(ClockError::InvalidConfiguration(
                "interval clock requires a positive interval".to_string(),
            ));
        }
        Ok(Self { interval })
    }

    /// Create from a number of seconds (fractions allowed)
    pub fn from_secs_f64(secs: f64) -> ClockResult<Self> {
        let interval = Duration::try_from_secs_f64(secs).map_err(|e| {
            ClockError::InvalidConfiguration(format!("invalid interval {secs}s: {e}"))
        })?;
        Self::new(interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Clock for IntervalClock {
    fn ticks(&self) -> Ticks {
        log::debug!("IntervalClock traversal started (interval {:?})", self.interval);
        Box::new(IntervalTicks {
            interval: self.interval,
            started: false,
        })
    }

    fn name(&self) -> &str {
        "IntervalClock"
    }
}

struct IntervalTicks {
    interval: Duration,
    started: bool,
}

impl Iterator for IntervalTicks {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        if self.started {
            thread::sleep(self.interval);
        }
        self.started = true;
        Some(Tick::At(Utc::now()))
    }
}
