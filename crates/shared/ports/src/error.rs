use thiserror::Error;

/// Failure raised by a strategy's start or tick hook
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Strategy failed: {0}")]
    Failed(String),

    #[error("Strategy operation failed: {0}")]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure raised while applying an operation to a broker
#[derive(Error, Debug)]
pub enum OperationError {
    #[error("Operation rejected by broker: {0}")]
    Rejected(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StrategyResult<T> = std::result::Result<T, StrategyError>;
pub type OperationResult<T> = std::result::Result<T, OperationError>;
