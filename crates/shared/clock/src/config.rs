//! Clock selection from configuration
//!
//! ```json
//! { "kind": "interval", "interval_secs": 5.0 }
//! { "kind": "manual" }
//! { "kind": "simulated", "start": "2024-01-01T00:00:00Z", "stop": "2024-01-02T00:00:00Z", "interval_secs": 60 }
//! ```

use crate::error::{ClockError, ClockResult};
use crate::{IntervalClock, ManualClock, SimulatedClock};
use serde::{Deserialize, Serialize};
use trader_core::Timestamp;
use trader_ports::Clock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClockConfig {
    /// Wall clock ticking every `interval_secs`
    Interval { interval_secs: f64 },
    /// Empty ticks without delay
    Manual,
    /// Historical replay of `[start, stop)` every `interval_secs`
    Simulated {
        start: Timestamp,
        stop: Timestamp,
        interval_secs: f64,
    },
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig::Interval { interval_secs: 1.0 }
    }
}

impl ClockConfig {
    /// Build the configured clock, rejecting invalid parameters eagerly
    pub fn build(&self) -> ClockResult<Box<dyn Clock>> {
        match self {
            ClockConfig::Interval { interval_secs } => {
                Ok(Box::new(IntervalClock::from_secs_f64(*interval_secs)?))
            }
            ClockConfig::Manual => Ok(Box::new(ManualClock::new())),
            ClockConfig::Simulated {
                start,
                stop,
                interval_secs,
            } => {
                let interval = std::time::Duration::try_from_secs_f64(*interval_secs)
                    .ok()
                    .and_then(|d| chrono::Duration::from_std(d).ok())
                    .ok_or_else(|| {
                        ClockError::InvalidConfiguration(format!(
                            "invalid interval {interval_secs}s"
                        ))
                    })?;
                Ok(Box::new(SimulatedClock::new(*start, *stop, interval)?))
            }
        }
    }

    /// Short name of the selected variant
    pub fn kind(&self) -> &'static str {
        match self {
            ClockConfig::Interval { .. } => "interval",
            ClockConfig::Manual => "manual",
            ClockConfig::Simulated { .. } => "simulated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use trader_core::Tick;

    #[test]
    fn test_parse_variants() {
        let interval: ClockConfig =
            serde_json::from_str(r#"{"kind":"interval","interval_secs":2.5}"#).unwrap();
        assert_eq!(interval, ClockConfig::Interval { interval_secs: 2.5 });

        let manual: ClockConfig = serde_json::from_str(r#"{"kind":"manual"}"#).unwrap();
        assert_eq!(manual, ClockConfig::Manual);

        let simulated: ClockConfig = serde_json::from_str(
            r#"{"kind":"simulated","start":"2024-01-01T00:00:00Z","stop":"2024-01-01T00:00:03Z","interval_secs":1}"#,
        )
        .unwrap();
        assert_eq!(simulated.kind(), "simulated");
    }

    #[test]
    fn test_build_simulated() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let config = ClockConfig::Simulated {
            start,
            stop: start + chrono::Duration::seconds(3),
            interval_secs: 1.0,
        };

        let clock = config.build().unwrap();
        assert_eq!(clock.name(), "SimulatedClock");
        let ticks: Vec<_> = clock.ticks().collect();
        assert_eq!(ticks.len(), 3);
        assert_eq!(ticks[0], Tick::At(start));
    }

    #[test]
    fn test_build_rejects_zero_interval() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let config = ClockConfig::Simulated {
            start,
            stop: start + chrono::Duration::seconds(3),
            interval_secs: 0.0,
        };
        assert!(matches!(
            config.build(),
            Err(ClockError::InvalidConfiguration(_))
        ));

        let config = ClockConfig::Interval { interval_secs: 0.0 };
        assert!(config.build().is_err());
    }

    #[test]
    fn test_build_manual() {
        let clock = ClockConfig::Manual.build().unwrap();
        assert!(clock.ticks().take(5).all(|t| t.is_empty()));
    }
}
