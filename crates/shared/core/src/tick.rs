use crate::values::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One discrete scheduling event produced by a clock
///
/// Wall-clock and simulated clocks carry the point in time the tick
/// represents. The manual clock only signals that a tick happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tick {
    /// A tick at a specific point in time
    At(Timestamp),
    /// An empty marker with no associated time
    Empty,
}

impl Tick {
    /// Timestamp carried by this tick, if any
    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            Tick::At(ts) => Some(*ts),
            Tick::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Tick::Empty)
    }
}

impl From<Timestamp> for Tick {
    fn from(ts: Timestamp) -> Self {
        Tick::At(ts)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tick::At(ts) => write!(f, "{}", ts.to_rfc3339()),
            Tick::Empty => write!(f, "<empty>"),
        }
    }
}
