//! Tick Executor - the tick execution protocol
//!
//! Translates one tick into an ordered application of operations:
//! 1. Ask every strategy, in collection order, for its operations
//! 2. Drop empty results
//! 3. Flatten, keeping strategy order then within-strategy order
//! 4. Pass the batch through the pipeline stages
//! 5. Apply each operation to the broker, strictly sequentially
//!
//! Nothing is caught: the first failure aborts the tick and is returned.

use crate::error::{Error, Result};
use crate::pipeline::OperationStage;
use log::{debug, trace};
use std::sync::Arc;
use trader_core::Tick;
use trader_ports::{BoxedOperation, Broker, Operation, Strategy};

pub struct TickExecutor<B: Broker> {
    /// Shared broker (lifecycle owned by the caller)
    broker: Arc<B>,
    /// Strategies in application order
    strategies: Vec<Box<dyn Strategy<B>>>,
    /// Pipeline stages in insertion order
    stages: Vec<Box<dyn OperationStage<B>>>,
    /// Set by the first `initialize` call, even a failed one
    initialized: bool,
}

impl<B: Broker> TickExecutor<B> {
    pub fn new(broker: Arc<B>, strategies: Vec<Box<dyn Strategy<B>>>) -> Self {
        Self {
            broker,
            strategies,
            stages: Vec::new(),
            initialized: false,
        }
    }

    /// Append a stage to the operation pipeline
    pub fn add_stage(&mut self, stage: Box<dyn OperationStage<B>>) {
        self.stages.push(stage);
    }

    pub fn broker(&self) -> &Arc<B> {
        &self.broker
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every strategy's start hook with the first tick
    ///
    /// Fail-fast: strategies after a failing one are not started, and the
    /// ones already started are not rolled back. Runs at most once; a second
    /// call returns `AlreadyInitialized` without touching any strategy.
    pub fn initialize(&mut self, tick: &Tick) -> Result<()> {
        if self.initialized {
            return Err(Error::AlreadyInitialized);
        }
        self.initialized = true;
        for strategy in self.strategies.iter_mut() {
            debug!("Starting strategy '{}' at {}", strategy.name(), tick);
            strategy
                .start(&self.broker, tick)
                .map_err(|source| Error::StrategyStart {
                    strategy: strategy.name().to_string(),
                    tick: *tick,
                    source,
                })?;
        }
        Ok(())
    }

    /// Execute one tick, returning the number of operations applied
    pub fn execute_tick(&mut self, tick: &Tick) -> Result<usize> {
        let mut proposed: Vec<Vec<BoxedOperation<B>>> = Vec::with_capacity(self.strategies.len());
        for strategy in self.strategies.iter_mut() {
            let operations = strategy
                .tick(tick)
                .map_err(|source| Error::StrategyTick {
                    strategy: strategy.name().to_string(),
                    tick: *tick,
                    source,
                })?;
            trace!("Strategy '{}' proposed {} operations", strategy.name(), operations.len());
            if operations.is_empty() {
                continue;
            }
            proposed.push(operations);
        }

        let mut operations: Vec<BoxedOperation<B>> = proposed.into_iter().flatten().collect();

        for stage in self.stages.iter_mut() {
            operations = stage
                .process(tick, operations)
                .map_err(|source| Error::Stage {
                    stage: stage.name().to_string(),
                    tick: *tick,
                    source: source.into(),
                })?;
        }

        let count = operations.len();
        for (index, operation) in operations.into_iter().enumerate() {
            operation
                .apply(&self.broker)
                .map_err(|source| Error::Operation {
                    index,
                    tick: *tick,
                    source,
                })?;
        }

        if count > 0 {
            debug!("Applied {} operations to '{}' at {}", count, self.broker.name(), tick);
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use trader_ports::{OperationError, StrategyError, StrategyResult, operation};

    /// Broker recording the labels of applied operations
    #[derive(Default)]
    struct RecordingBroker {
        applied: Mutex<Vec<String>>,
    }

    impl RecordingBroker {
        fn applied(&self) -> Vec<String> {
            self.applied.lock().clone()
        }
    }

    impl Broker for RecordingBroker {}

    fn label(name: &str) -> BoxedOperation<RecordingBroker> {
        let name = name.to_string();
        operation(move |b: &RecordingBroker| {
            b.applied.lock().push(name);
            Ok(())
        })
    }

    /// Strategy returning fixed labels every tick and logging hook calls
    struct Scripted {
        name: String,
        labels: Vec<&'static str>,
        calls: Arc<Mutex<Vec<String>>>,
        fail_start: bool,
        fail_tick: bool,
    }

    impl Scripted {
        fn new(name: &str, labels: Vec<&'static str>, calls: &Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                name: name.to_string(),
                labels,
                calls: calls.clone(),
                fail_start: false,
                fail_tick: false,
            }
        }
    }

    impl Strategy<RecordingBroker> for Scripted {
        fn name(&self) -> &str {
            &self.name
        }

        fn start(&mut self, _broker: &RecordingBroker, tick: &Tick) -> StrategyResult<()> {
            self.calls.lock().push(format!("start:{}:{}", self.name, tick));
            if self.fail_start {
                return Err(StrategyError::Failed("no capital".into()));
            }
            Ok(())
        }

        fn tick(&mut self, _tick: &Tick) -> StrategyResult<Vec<BoxedOperation<RecordingBroker>>> {
            self.calls.lock().push(format!("tick:{}", self.name));
            if self.fail_tick {
                return Err(StrategyError::Failed("bad data".into()));
            }
            Ok(self.labels.iter().map(|l| label(l)).collect())
        }
    }

    fn executor(strategies: Vec<Scripted>) -> TickExecutor<RecordingBroker> {
        let strategies = strategies
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn Strategy<RecordingBroker>>)
            .collect();
        TickExecutor::new(Arc::new(RecordingBroker::default()), strategies)
    }

    #[test]
    fn test_operations_applied_in_strategy_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut exec = executor(vec![
            Scripted::new("A", vec!["op1", "op2"], &calls),
            Scripted::new("B", vec!["op3"], &calls),
        ]);

        let applied = exec.execute_tick(&Tick::Empty).unwrap();

        assert_eq!(applied, 3);
        assert_eq!(exec.broker().applied(), vec!["op1", "op2", "op3"]);
    }

    #[test]
    fn test_empty_result_does_not_break_flattening() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut exec = executor(vec![
            Scripted::new("A", vec![], &calls),
            Scripted::new("B", vec!["op1"], &calls),
            Scripted::new("C", vec![], &calls),
        ]);

        assert_eq!(exec.execute_tick(&Tick::Empty).unwrap(), 1);
        assert_eq!(exec.broker().applied(), vec!["op1"]);
        assert_eq!(*calls.lock(), vec!["tick:A", "tick:B", "tick:C"]);
    }

    #[test]
    fn test_initialize_starts_every_strategy_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut exec = executor(vec![
            Scripted::new("A", vec![], &calls),
            Scripted::new("B", vec![], &calls),
        ]);

        exec.initialize(&Tick::Empty).unwrap();

        assert_eq!(*calls.lock(), vec!["start:A:<empty>", "start:B:<empty>"]);
        assert!(exec.broker().applied().is_empty());
    }

    #[test]
    fn test_start_failure_is_fail_fast() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut failing = Scripted::new("A", vec![], &calls);
        failing.fail_start = true;
        let mut exec = executor(vec![failing, Scripted::new("B", vec![], &calls)]);

        let err = exec.initialize(&Tick::Empty).unwrap_err();

        assert!(matches!(err, Error::StrategyStart { ref strategy, .. } if strategy == "A"));
        assert_eq!(*calls.lock(), vec!["start:A:<empty>"]);
    }

    #[test]
    fn test_initialize_runs_start_hooks_once() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut exec = executor(vec![Scripted::new("A", vec![], &calls)]);
        assert!(!exec.is_initialized());

        exec.initialize(&Tick::Empty).unwrap();
        let err = exec.initialize(&Tick::Empty).unwrap_err();

        assert!(matches!(err, Error::AlreadyInitialized));
        assert!(exec.is_initialized());
        assert_eq!(*calls.lock(), vec!["start:A:<empty>"]);
    }

    #[test]
    fn test_strategy_failure_applies_nothing() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut failing = Scripted::new("B", vec!["op2"], &calls);
        failing.fail_tick = true;
        let mut exec = executor(vec![Scripted::new("A", vec!["op1"], &calls), failing]);

        let err = exec.execute_tick(&Tick::Empty).unwrap_err();

        assert!(matches!(err, Error::StrategyTick { ref strategy, .. } if strategy == "B"));
        assert!(exec.broker().applied().is_empty());
    }

    #[test]
    fn test_operation_failure_stops_remaining_operations() {
        struct Failing;
        impl Strategy<RecordingBroker> for Failing {
            fn name(&self) -> &str {
                "failing"
            }

            fn tick(
                &mut self,
                _tick: &Tick,
            ) -> StrategyResult<Vec<BoxedOperation<RecordingBroker>>> {
                Ok(vec![
                    label("op1"),
                    operation(|_: &RecordingBroker| {
                        Err(OperationError::Rejected("insufficient margin".into()))
                    }),
                    label("op3"),
                ])
            }
        }

        let mut exec = TickExecutor::new(
            Arc::new(RecordingBroker::default()),
            vec![Box::new(Failing) as Box<dyn Strategy<RecordingBroker>>],
        );

        let err = exec.execute_tick(&Tick::Empty).unwrap_err();

        assert!(matches!(err, Error::Operation { index: 1, .. }));
        assert_eq!(exec.broker().applied(), vec!["op1"]);
    }

    #[test]
    fn test_stages_transform_batch_in_order() {
        struct Reverse;
        impl OperationStage<RecordingBroker> for Reverse {
            fn name(&self) -> &str {
                "reverse"
            }

            fn process(
                &mut self,
                _tick: &Tick,
                mut operations: Vec<BoxedOperation<RecordingBroker>>,
            ) -> anyhow::Result<Vec<BoxedOperation<RecordingBroker>>> {
                operations.reverse();
                Ok(operations)
            }
        }

        struct DropFirst;
        impl OperationStage<RecordingBroker> for DropFirst {
            fn name(&self) -> &str {
                "drop-first"
            }

            fn process(
                &mut self,
                _tick: &Tick,
                operations: Vec<BoxedOperation<RecordingBroker>>,
            ) -> anyhow::Result<Vec<BoxedOperation<RecordingBroker>>> {
                Ok(operations.into_iter().skip(1).collect())
            }
        }

        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut exec = executor(vec![
            Scripted::new("A", vec!["op1", "op2"], &calls),
            Scripted::new("B", vec!["op3"], &calls),
        ]);
        exec.add_stage(Box::new(Reverse));
        exec.add_stage(Box::new(DropFirst));

        assert_eq!(exec.stage_names(), vec!["reverse", "drop-first"]);
        assert_eq!(exec.execute_tick(&Tick::Empty).unwrap(), 2);
        assert_eq!(exec.broker().applied(), vec!["op2", "op1"]);
    }

    #[test]
    fn test_stage_veto_aborts_tick() {
        struct Veto;
        impl OperationStage<RecordingBroker> for Veto {
            fn name(&self) -> &str {
                "veto"
            }

            fn process(
                &mut self,
                _tick: &Tick,
                _operations: Vec<BoxedOperation<RecordingBroker>>,
            ) -> anyhow::Result<Vec<BoxedOperation<RecordingBroker>>> {
                anyhow::bail!("limit breached")
            }
        }

        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut exec = executor(vec![Scripted::new("A", vec!["op1"], &calls)]);
        exec.add_stage(Box::new(Veto));

        let err = exec.execute_tick(&Tick::Empty).unwrap_err();

        assert!(matches!(err, Error::Stage { ref stage, .. } if stage == "veto"));
        assert!(err.to_string().contains("limit breached"));
        assert!(exec.broker().applied().is_empty());
    }
}
