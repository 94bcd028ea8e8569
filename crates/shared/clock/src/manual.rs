use trader_core::Tick;
use trader_ports::{Clock, Ticks};

/// Clock producing empty ticks forever, without delay
///
/// Used when something outside the clock paces the loop, e.g. a strategy
/// blocking on an event source, or tests driving the controller directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock;

impl ManualClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for ManualClock {
    fn ticks(&self) -> Ticks {
        log::debug!("ManualClock traversal started");
        Box::new(std::iter::repeat(Tick::Empty))
    }

    fn name(&self) -> &str {
        "ManualClock"
    }
}
