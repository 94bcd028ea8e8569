//! Trader Paper Trading
//!
//! In-memory collaborators for running the tick loop without a venue:
//! - `PaperBroker`: an account that journals every operation applied to it
//! - `TickRecorder`: a strategy that journals the ticks it sees
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trader_paper::{PaperBroker, TickRecorder};
//!
//! let broker = Arc::new(PaperBroker::new("paper"));
//! let strategies: Vec<Box<dyn Strategy<PaperBroker>>> =
//!     vec![Box::new(TickRecorder::new("recorder"))];
//! ```

pub mod broker;
pub mod recorder;

pub use broker::{JournalEntry, PaperBroker};
pub use recorder::TickRecorder;
