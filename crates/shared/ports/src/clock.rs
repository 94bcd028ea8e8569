use trader_core::Tick;

/// A lazy, possibly infinite sequence of ticks
pub type Ticks = Box<dyn Iterator<Item = Tick> + Send>;

/// Port for tick sources
///
/// Implementations hold configuration only. Every call to [`Clock::ticks`]
/// starts a fresh traversal from the configured beginning:
/// - Wall-clock intervals for live trading
/// - Simulated ranges for historical replay
/// - Manual ticks for externally paced drivers
pub trait Clock: Send {
    /// Start a new traversal of this clock
    fn ticks(&self) -> Ticks;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
