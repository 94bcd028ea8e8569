use crate::error::StrategyResult;
use crate::operation::BoxedOperation;
use trader_core::Tick;

/// Strategy trait - implement this for your trading strategy
///
/// A strategy never owns the broker. It receives a reference once, in
/// [`Strategy::start`], and afterwards only proposes operations which the
/// controller applies in order.
pub trait Strategy<B: ?Sized>: Send {
    /// Strategy name for logging
    fn name(&self) -> &str;

    /// Called once with the first tick, before any call to `tick` (optional)
    fn start(&mut self, _broker: &B, _tick: &Tick) -> StrategyResult<()> {
        Ok(())
    }

    /// Called for every subsequent tick
    ///
    /// Returns the operations to apply, in order. An empty vector means
    /// "nothing to do this tick".
    fn tick(&mut self, tick: &Tick) -> StrategyResult<Vec<BoxedOperation<B>>>;
}
