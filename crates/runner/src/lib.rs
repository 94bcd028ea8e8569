//! Trader Runner - Tick Loop Orchestration
//!
//! Drives a set of strategies against a broker on a clock:
//!
//! - **Executor**: the tick execution protocol (fan out, flatten, apply)
//! - **Pipeline**: replaceable stages between flattening and application
//! - **Controller**: threaded lifecycle (run, run until stopped, stop)
//! - **Config**: JSON configuration for the `trader` command
//!
//! ## Architecture
//!
//! ```text
//!   caller thread                      tick loop thread
//! ┌──────────────────┐   spawn    ┌──────────────────────────────────────┐
//! │   Controller     │──────────► │  Clock ──first tick──► initialize    │
//! │                  │            │    │                                 │
//! │ run()            │            │    └──each tick──► TickExecutor      │
//! │ run_until_stopped│ stop flag  │         │                            │
//! │ stop()  ─────────┼──────────► │         ▼                            │
//! │                  │            │   Strategy A ─┐                      │
//! │                  │   join     │   Strategy B ─┼─► flatten ─► stages  │
//! │                  │◄───────────│   Strategy C ─┘                │     │
//! └──────────────────┘  RunReport │                                ▼     │
//!                                 │                     apply ─► Broker  │
//!                                 └──────────────────────────────────────┘
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod executor;
pub mod pipeline;
pub mod signal;

// Re-export main types
pub use config::{
    BrokerConfig, ClockKind, ClockOverrides, ConfigError, RunnerConfig, StrategyConfig,
};
pub use controller::{Controller, ControllerConfig, ControllerState, RunReport, StopReason};
pub use error::{ControllerError, Result};
pub use executor::TickExecutor;
pub use pipeline::OperationStage;
pub use signal::StopSignal;
