use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClockError {
    #[error("Invalid clock configuration: {0}")]
    InvalidConfiguration(String),
}

pub type ClockResult<T> = std::result::Result<T, ClockError>;
