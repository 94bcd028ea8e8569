//! Trader Core
//!
//! Pure value types shared by every trader crate.
//! This crate contains no threads, no I/O, and is 100% unit testable.

pub mod tick;
pub mod values;

pub use tick::Tick;
pub use values::Timestamp;
