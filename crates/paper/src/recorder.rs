//! Tick Recorder - journals the ticks it is driven with
//!
//! The start tick is journaled directly from the start hook, every
//! `every`-th tick after that through an operation. Useful as a heartbeat
//! for live runs and as a probe for replay runs.

use log::info;
use trader_core::Tick;
use trader_ports::{
    BoxedOperation, Operation, OperationResult, Strategy, StrategyResult, operation,
};

use crate::broker::PaperBroker;

pub struct TickRecorder {
    name: String,
    every: u64,
    seen: u64,
}

impl TickRecorder {
    pub fn new(name: impl Into<String>) -> Self {
        Self::every(name, 1)
    }

    /// Record only every `every`-th tick (0 behaves like 1)
    pub fn every(name: impl Into<String>, every: u64) -> Self {
        Self {
            name: name.into(),
            every: every.max(1),
            seen: 0,
        }
    }
}

impl Strategy<PaperBroker> for TickRecorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self, broker: &PaperBroker, tick: &Tick) -> StrategyResult<()> {
        info!("[{}] Starting at {}", self.name, tick);
        let record: BoxedOperation<PaperBroker> =
            operation(record_tick(self.name.clone(), *tick, "start"));
        record.apply(broker)?;
        Ok(())
    }

    fn tick(&mut self, tick: &Tick) -> StrategyResult<Vec<BoxedOperation<PaperBroker>>> {
        self.seen += 1;
        if !self.seen.is_multiple_of(self.every) {
            return Ok(Vec::new());
        }
        Ok(vec![operation(record_tick(self.name.clone(), *tick, "tick"))])
    }
}

fn record_tick(
    strategy: String,
    tick: Tick,
    note: &'static str,
) -> impl FnOnce(&PaperBroker) -> OperationResult<()> + Send + 'static {
    move |broker: &PaperBroker| broker.record(strategy, tick, note).map(|_| ())
}
