//! Configuration loading for the trader command
//!
//! JSON configuration selecting the clock, the paper broker and the
//! strategy set:
//!
//! ```json
//! {
//!   "clock": { "kind": "simulated", "start": "2024-01-01T00:00:00Z",
//!              "stop": "2024-01-01T01:00:00Z", "interval_secs": 60 },
//!   "controller": { "poll_interval_ms": 1000 },
//!   "broker": { "name": "paper", "max_entries": 10000 },
//!   "strategies": [ { "kind": "tick_recorder", "name": "heartbeat", "every": 5 } ]
//! }
//! ```
//!
//! Every section is optional. Clock settings can be overridden from the
//! command line through [`ClockOverrides`].

use crate::controller::ControllerConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use trader_clock::{Clock, ClockConfig};
use trader_core::Timestamp;
use trader_paper::{PaperBroker, TickRecorder};
use trader_ports::Strategy;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Clock(#[from] trader_clock::ClockError),
}

/// Root configuration for the trader command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default)]
    pub clock: ClockConfig,

    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub broker: BrokerConfig,

    #[serde(default = "default_strategies")]
    pub strategies: Vec<StrategyConfig>,
}

fn default_strategies() -> Vec<StrategyConfig> {
    vec![StrategyConfig::TickRecorder {
        name: "recorder".to_string(),
        every: 1,
    }]
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            clock: ClockConfig::default(),
            controller: ControllerConfig::default(),
            broker: BrokerConfig::default(),
            strategies: default_strategies(),
        }
    }
}

/// Paper broker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerConfig {
    #[serde(default = "default_broker_name")]
    pub name: String,

    /// Reject records beyond this many journal entries
    #[serde(default)]
    pub max_entries: Option<usize>,
}

fn default_broker_name() -> String {
    "paper".to_string()
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            name: default_broker_name(),
            max_entries: None,
        }
    }
}

/// Strategy selection, in application order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    TickRecorder {
        name: String,
        #[serde(default = "default_every")]
        every: u64,
    },
}

fn default_every() -> u64 {
    1
}

impl StrategyConfig {
    pub fn name(&self) -> &str {
        match self {
            StrategyConfig::TickRecorder { name, .. } => name,
        }
    }

    pub fn build(&self) -> Box<dyn Strategy<PaperBroker>> {
        match self {
            StrategyConfig::TickRecorder { name, every } => {
                Box::new(TickRecorder::every(name.clone(), *every))
            }
        }
    }
}

/// Clock variant selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ClockKind {
    Interval,
    Manual,
    Simulated,
}

/// Command line overrides applied on top of the configured clock
#[derive(Debug, Clone, Default)]
pub struct ClockOverrides {
    pub kind: Option<ClockKind>,
    pub interval_secs: Option<f64>,
    pub start: Option<Timestamp>,
    pub stop: Option<Timestamp>,
}

impl ClockOverrides {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.interval_secs.is_none()
            && self.start.is_none()
            && self.stop.is_none()
    }
}

impl RunnerConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strategies.is_empty() {
            return Err(ConfigError::Invalid("no strategies configured".to_string()));
        }

        let mut seen = HashSet::new();
        for strategy in &self.strategies {
            let name = strategy.name();
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("strategy name is empty".to_string()));
            }
            if !seen.insert(name) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate strategy name '{name}'"
                )));
            }
        }

        Ok(())
    }

    /// Replace clock settings with the given overrides
    ///
    /// Parameters not overridden are kept from the configured clock when it
    /// has them. A simulated clock needs both `start` and `stop` from one
    /// source or the other. Giving `start` or `stop` without a kind selects
    /// the simulated clock; pairing them with another kind is invalid.
    pub fn apply_clock_overrides(&mut self, overrides: &ClockOverrides) -> Result<(), ConfigError> {
        if overrides.is_empty() {
            return Ok(());
        }

        let (base_interval, base_start, base_stop) = match &self.clock {
            ClockConfig::Interval { interval_secs } => (Some(*interval_secs), None, None),
            ClockConfig::Manual => (None, None, None),
            ClockConfig::Simulated {
                start,
                stop,
                interval_secs,
            } => (Some(*interval_secs), Some(*start), Some(*stop)),
        };

        let has_range = overrides.start.is_some() || overrides.stop.is_some();
        let kind = match overrides.kind {
            Some(kind) if has_range && kind != ClockKind::Simulated => {
                return Err(ConfigError::Invalid(
                    "--start/--stop only apply to the simulated clock".to_string(),
                ));
            }
            Some(kind) => kind,
            None if has_range => ClockKind::Simulated,
            None => match &self.clock {
                ClockConfig::Interval { .. } => ClockKind::Interval,
                ClockConfig::Manual => ClockKind::Manual,
                ClockConfig::Simulated { .. } => ClockKind::Simulated,
            },
        };
        let interval_secs = overrides.interval_secs.or(base_interval).unwrap_or(1.0);

        self.clock = match kind {
            ClockKind::Interval => ClockConfig::Interval { interval_secs },
            ClockKind::Manual => ClockConfig::Manual,
            ClockKind::Simulated => {
                let start = overrides.start.or(base_start).ok_or_else(|| {
                    ConfigError::Invalid("simulated clock requires --start".to_string())
                })?;
                let stop = overrides.stop.or(base_stop).ok_or_else(|| {
                    ConfigError::Invalid("simulated clock requires --stop".to_string())
                })?;
                ClockConfig::Simulated {
                    start,
                    stop,
                    interval_secs,
                }
            }
        };

        Ok(())
    }

    pub fn build_clock(&self) -> Result<Box<dyn Clock>, ConfigError> {
        Ok(self.clock.build()?)
    }

    pub fn build_broker(&self) -> PaperBroker {
        let broker = PaperBroker::new(self.broker.name.clone());
        match self.broker.max_entries {
            Some(limit) => broker.with_capacity_limit(limit),
            None => broker,
        }
    }

    pub fn build_strategies(&self) -> Vec<Box<dyn Strategy<PaperBroker>>> {
        self.strategies.iter().map(StrategyConfig::build).collect()
    }
}
