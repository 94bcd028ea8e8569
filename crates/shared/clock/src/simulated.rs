use crate::error::{ClockError, ClockResult};
use chrono::Duration;
use trader_core::{Tick, Timestamp};
use trader_ports::{Clock, Ticks};

/// Deterministic clock replaying a historical range
///
/// Yields `start`, `start + interval`, ... while the current value is
/// strictly before `stop`. Holds configuration only, so every traversal
/// restarts at `start`. A range with `stop <= start` is valid and empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedClock {
    start: Timestamp,
    stop: Timestamp,
    interval: Duration,
}

impl SimulatedClock {
    pub fn new(start: Timestamp, stop: Timestamp, interval: Duration) -> ClockResult<Self> {
        if interval <= Duration::zero() {
            return Err(ClockError::InvalidConfiguration(format!(
                "simulated clock requires a positive interval, got {interval}"
            )));
        }
        Ok(Self {
            start,
            stop,
            interval,
        })
    }
}

impl Clock for SimulatedClock {
    fn ticks(&self) -> Ticks {
        log::debug!(
            "SimulatedClock traversal started: {} -> {} every {}",
            self.start,
            self.stop,
            self.interval
        );
        Box::new(SimulatedTicks {
            current: self.start,
            stop: self.stop,
            interval: self.interval,
        })
    }

    fn name(&self) -> &str {
        "SimulatedClock"
    }
}

struct SimulatedTicks {
    current: Timestamp,
    stop: Timestamp,
    interval: Duration,
}

impl Iterator for SimulatedTicks {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        if self.current >= self.stop {
            return None;
        }
        let tick = Tick::At(self.current);
        match self.current.checked_add_signed(self.interval) {
            Some(next) => self.current = next,
            // Past the representable range, nothing further can be < stop
            None => self.current = self.stop,
        }
        Some(tick)
    }
}
