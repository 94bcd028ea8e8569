//! Operation pipeline
//!
//! Stages sit between flattening the strategies' proposals and applying them
//! to the broker. Each stage receives the whole ordered batch for the tick
//! and returns the batch to pass on: it may drop, reorder, merge or veto
//! operations. With no stages the batch is applied as proposed.

use trader_core::Tick;
use trader_ports::BoxedOperation;

pub trait OperationStage<B: ?Sized>: Send {
    /// Stage name for logging and error reports
    fn name(&self) -> &str;

    /// Transform the tick's operation batch
    ///
    /// Returning an error aborts the tick before anything is applied.
    fn process(
        &mut self,
        tick: &Tick,
        operations: Vec<BoxedOperation<B>>,
    ) -> anyhow::Result<Vec<BoxedOperation<B>>>;
}
