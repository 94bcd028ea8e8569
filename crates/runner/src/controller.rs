//! Controller - threaded lifecycle around the tick executor
//!
//! ```text
//! Idle ──run()──► Running ──stop()──► Stopping ──join──► Stopped
//!                    │                                      ▲
//!                    └────── clock exhausted / failure ─────┘
//! ```
//!
//! The tick loop runs on one dedicated OS thread. Strategies and operations
//! are executed on that thread only, strictly one tick at a time.
//! Cancellation is cooperative: the stop flag is checked before and after
//! every tick, never in the middle of one, and `stop()` waits for the loop
//! thread without a timeout.

use crate::error::{Error, Result};
use crate::executor::TickExecutor;
use crate::pipeline::OperationStage;
use crate::signal::StopSignal;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use trader_core::Tick;
use trader_ports::{Broker, Clock, Strategy};

/// Configuration for the Controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// How often `run_until_stopped` checks whether the loop has finished
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl ControllerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Lifecycle state of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Constructed, not started
    Idle,
    /// Tick loop executing
    Running,
    /// Stop requested, loop finishing its current tick
    Stopping,
    /// Tick loop exited
    Stopped,
}

/// Why the tick loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum StopReason {
    /// The clock produced no further ticks
    #[default]
    ClockExhausted,
    /// `stop()` was called
    StopRequested,
}

/// Outcome of a completed tick loop
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Ticks passed to `execute_tick` (the initializing tick is not counted)
    pub ticks_executed: u64,
    /// Operations applied to the broker across all ticks
    pub operations_applied: u64,
    pub reason: StopReason,
}

type LoopHandle = JoinHandle<Result<RunReport>>;

/// Drives strategies against a broker on a clock
///
/// A controller runs at most once. Dependencies are live at construction;
/// the broker is shared, its lifecycle belongs to the caller.
pub struct Controller<B: Broker> {
    config: ControllerConfig,
    broker: Arc<B>,
    /// Clock and executor, moved onto the loop thread by `run()`
    parts: Option<(Box<dyn Clock>, TickExecutor<B>)>,
    /// Set once, never reset
    stop_requested: Arc<AtomicBool>,
    /// True from `run()` until the loop thread exits
    is_running: Arc<AtomicBool>,
    /// Loop thread, set once by `run()` and taken by the join
    main_loop: Option<LoopHandle>,
    started: bool,
}

impl<B: Broker> Controller<B> {
    pub fn new(
        clock: Box<dyn Clock>,
        broker: Arc<B>,
        strategies: Vec<Box<dyn Strategy<B>>>,
    ) -> Self {
        let executor = TickExecutor::new(broker.clone(), strategies);
        Self {
            config: ControllerConfig::default(),
            broker,
            parts: Some((clock, executor)),
            stop_requested: Arc::new(AtomicBool::new(false)),
            is_running: Arc::new(AtomicBool::new(false)),
            main_loop: None,
            started: false,
        }
    }

    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a stage to the operation pipeline
    ///
    /// Only meaningful before `run()`; afterwards the executor lives on the
    /// loop thread and the stage is dropped with a warning.
    pub fn with_stage(mut self, stage: impl OperationStage<B> + 'static) -> Self {
        match self.parts.as_mut() {
            Some((_, executor)) => executor.add_stage(Box::new(stage)),
            None => warn!("Stage '{}' added after start, ignoring", stage.name()),
        }
        self
    }

    pub fn broker(&self) -> &Arc<B> {
        &self.broker
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> ControllerState {
        if !self.started {
            ControllerState::Idle
        } else if !self.is_running() {
            ControllerState::Stopped
        } else if self.stop_requested() {
            ControllerState::Stopping
        } else {
            ControllerState::Running
        }
    }

    /// Run the strategies' start hooks on the calling thread
    ///
    /// For externally driven controllers that are never `run()`; once this
    /// has been called, `run()` returns `AlreadyInitialized`.
    pub fn initialize(&mut self, tick: &Tick) -> Result<()> {
        self.executor_mut()?.initialize(tick)
    }

    /// Execute one tick on the calling thread
    ///
    /// For externally driven controllers that are never `run()`.
    pub fn execute_tick(&mut self, tick: &Tick) -> Result<usize> {
        self.executor_mut()?.execute_tick(tick)
    }

    fn executor_mut(&mut self) -> Result<&mut TickExecutor<B>> {
        self.parts
            .as_mut()
            .map(|(_, executor)| executor)
            .ok_or(Error::AlreadyStarted)
    }

    /// Spawn the tick loop thread and return immediately
    ///
    /// Fails with `AlreadyStarted` on a second call, and with
    /// `AlreadyInitialized` if the controller was initialized externally.
    pub fn run(&mut self) -> Result<()> {
        if self.executor_mut()?.is_initialized() {
            return Err(Error::AlreadyInitialized);
        }
        let (clock, executor) = self.parts.take().ok_or(Error::AlreadyStarted)?;
        self.started = true;
        // Raised before the spawn so a caller polling right away sees it
        self.is_running.store(true, Ordering::SeqCst);

        let stop_requested = self.stop_requested.clone();
        let is_running = self.is_running.clone();

        let handle = thread::Builder::new()
            .name("tick-loop".to_string())
            .spawn(move || {
                let _running = RunningGuard(is_running);
                let result = tick_loop(clock.as_ref(), executor, &stop_requested);
                if let Err(e) = &result {
                    error!("Tick loop failed: {}", e);
                }
                result
            })
            .map_err(|e| {
                self.is_running.store(false, Ordering::SeqCst);
                Error::Spawn(e)
            })?;

        self.main_loop = Some(handle);
        Ok(())
    }

    /// Run and block until the loop ends or `interrupt` is triggered
    ///
    /// Polls roughly every `poll_interval_ms`. On interrupt, performs a
    /// clean `stop()`. Returns the loop's outcome either way.
    pub fn run_until_stopped(&mut self, interrupt: &StopSignal) -> Result<RunReport> {
        self.run()?;
        let poll = self.config.poll_interval();

        while self.is_running() {
            if interrupt.wait_timeout(poll) {
                return self.stop();
            }
        }

        let handle = self.main_loop.take().ok_or(Error::AlreadyStopped)?;
        join_loop(handle)
    }

    /// Request a stop and wait for the loop thread to exit
    ///
    /// The current tick always completes. There is no timeout: a tick that
    /// never returns blocks this call indefinitely.
    pub fn stop(&mut self) -> Result<RunReport> {
        if !self.started {
            return Err(Error::NotStarted);
        }
        let handle = self.main_loop.take().ok_or(Error::AlreadyStopped)?;

        warn!("Shutdown requested, stopping tick loop cleanly...");
        self.stop_requested.store(true, Ordering::SeqCst);
        let result = join_loop(handle);
        info!("Tick loop stopped");
        result
    }
}

impl<B: Broker> Drop for Controller<B> {
    fn drop(&mut self) {
        // Never join here; a detached loop exits at its next tick boundary
        if self.main_loop.is_some() {
            self.stop_requested.store(true, Ordering::SeqCst);
        }
    }
}

/// Lowers `is_running` when the loop thread exits, panics included
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn tick_loop<B: Broker>(
    clock: &dyn Clock,
    mut executor: TickExecutor<B>,
    stop_requested: &AtomicBool,
) -> Result<RunReport> {
    info!(
        "Tick loop started: {} driving {:?} on '{}'",
        clock.name(),
        executor.strategy_names(),
        executor.broker().name()
    );

    let mut report = RunReport::default();
    let mut ticks = clock.ticks();

    let Some(first) = ticks.next() else {
        info!("{} produced no ticks, nothing to run", clock.name());
        return Ok(report);
    };
    executor.initialize(&first)?;

    for tick in ticks {
        if stop_requested.load(Ordering::SeqCst) {
            report.reason = StopReason::StopRequested;
            break;
        }

        debug!("Executing tick {}", tick);
        report.operations_applied += executor.execute_tick(&tick)? as u64;
        report.ticks_executed += 1;

        if stop_requested.load(Ordering::SeqCst) {
            report.reason = StopReason::StopRequested;
            break;
        }
    }

    info!(
        "Tick loop finished ({:?}): {} ticks, {} operations",
        report.reason, report.ticks_executed, report.operations_applied
    );
    Ok(report)
}

fn join_loop(handle: LoopHandle) -> Result<RunReport> {
    match handle.join() {
        Ok(result) => result,
        Err(payload) => Err(Error::TickLoopPanicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
