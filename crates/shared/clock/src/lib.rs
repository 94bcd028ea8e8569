//! Trader Clock Infrastructure
//!
//! Provides the tick sources that drive the controller:
//!
//! ## Clock Variants
//!
//! ```text
//! IntervalClock   now, sleep(interval), now, sleep(interval), ...   (infinite)
//! ManualClock     <empty>, <empty>, <empty>, ...                    (infinite, no delay)
//! SimulatedClock  start, start+interval, ... while current < stop   (finite, restartable)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use trader_clock::{Clock, ClockConfig, SimulatedClock};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let clock = SimulatedClock::new(start, start + Duration::hours(1), Duration::minutes(5))?;
//! assert_eq!(clock.ticks().count(), 12);
//!
//! // Or select the variant from configuration
//! let clock = ClockConfig::Interval { interval_secs: 5.0 }.build()?;
//! ```

mod config;
mod error;
mod interval;
mod manual;
mod simulated;

pub use config::ClockConfig;
pub use error::{ClockError, ClockResult};
pub use interval::IntervalClock;
pub use manual::ManualClock;
pub use simulated::SimulatedClock;

// Re-export the Clock port for convenience
pub use trader_ports::{Clock, Ticks};
