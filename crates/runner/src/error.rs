//! Controller errors

use thiserror::Error;
use trader_core::Tick;
use trader_ports::{OperationError, StrategyError};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Strategy '{strategy}' failed to start at {tick}: {source}")]
    StrategyStart {
        strategy: String,
        tick: Tick,
        #[source]
        source: StrategyError,
    },

    #[error("Strategy '{strategy}' failed on tick {tick}: {source}")]
    StrategyTick {
        strategy: String,
        tick: Tick,
        #[source]
        source: StrategyError,
    },

    #[error("Operation #{index} failed on tick {tick}: {source}")]
    Operation {
        index: usize,
        tick: Tick,
        #[source]
        source: OperationError,
    },

    #[error("Stage '{stage}' failed on tick {tick}: {source}")]
    Stage {
        stage: String,
        tick: Tick,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Controller already started; a controller runs at most once")]
    AlreadyStarted,

    #[error("Controller has not been started")]
    NotStarted,

    #[error("Controller already stopped")]
    AlreadyStopped,

    #[error("Failed to spawn tick loop thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Tick loop panicked: {0}")]
    TickLoopPanicked(String),

    #[error("Strategies already initialized; start hooks run once per controller")]
    AlreadyInitialized,
}

pub type ControllerError = Error;
pub type Result<T> = std::result::Result<T, Error>;
