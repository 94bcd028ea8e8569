//! Trader Ports
//!
//! Port definitions (traits) for the trader tick loop.
//! These define the boundaries between the controller and its collaborators:
//! the clock producing ticks, the strategies proposing operations, and the
//! broker those operations act upon.

mod broker;
mod clock;
mod error;
mod operation;
mod strategy;

pub use broker::Broker;
pub use clock::{Clock, Ticks};
pub use error::{OperationError, OperationResult, StrategyError, StrategyResult};
pub use operation::{BoxedOperation, Operation, operation};
pub use strategy::Strategy;
