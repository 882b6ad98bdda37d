//! Type definitions shared between the runner and the renderers

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// A named ping endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Display name (e.g. "NA-East")
    pub name: String,
    /// Host address or FQDN handed to the ping utility
    pub host: String,
}

impl Target {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.host)
    }
}

/// Final statistics of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSummary {
    pub min: u32,
    pub max: u32,
    /// Mean round-trip time, rounded to one decimal
    pub avg: f64,
    pub sent: u32,
    pub received: u32,
    /// Percentage of sent packets without a reply, rounded to one decimal
    pub loss_percent: f64,
}

/// One event produced while a probe runs
///
/// A run yields any number of `Live`, `Result`, `Timeout` and `StatsLine`
/// events followed by at most one terminal event (`Summary`, `Error` or
/// `Stopped`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProbeEvent {
    /// Raw reply line from the ping utility
    Live { text: String },
    /// Parsed round-trip time in milliseconds
    Result { ms: u32 },
    /// A packet that got no reply
    Timeout,
    /// Vendor-specific statistics line printed by ping itself
    StatsLine { text: String },
    Summary(ProbeSummary),
    Error { text: String },
    Stopped { text: String },
}

impl ProbeEvent {
    pub fn live(text: impl Into<String>) -> Self {
        Self::Live { text: text.into() }
    }

    pub fn stats_line(text: impl Into<String>) -> Self {
        Self::StatsLine { text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::Error { text: text.into() }
    }

    pub fn stopped(text: impl Into<String>) -> Self {
        Self::Stopped { text: text.into() }
    }

    /// Whether this event ends a run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Summary(_) | Self::Error { .. } | Self::Stopped { .. })
    }

    /// Short event name, matching the serialized `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Live { .. } => "live",
            Self::Result { .. } => "result",
            Self::Timeout => "timeout",
            Self::StatsLine { .. } => "stats_line",
            Self::Summary(_) => "summary",
            Self::Error { .. } => "error",
            Self::Stopped { .. } => "stopped",
        }
    }
}

/// Latency classification used for color coding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerformanceLevel {
    /// Good latency (< 100 ms)
    Good,
    /// Playable but noticeable (100-150 ms)
    Moderate,
    /// Poor latency (>= 150 ms)
    Poor,
}

impl PerformanceLevel {
    /// Classify a round-trip time in milliseconds
    pub fn from_ms(ms: f64) -> Self {
        if ms < 100.0 {
            Self::Good
        } else if ms < 150.0 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }
}

/// How a finished run ended, as seen by the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A summary was produced
    Completed,
    /// The stream ended without a terminal event (e.g. every packet timed out)
    Exhausted,
    /// The user cancelled the run
    Stopped,
    /// The runner reported an error
    Failed,
}

impl RunOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Completed | Self::Exhausted => 0,
            Self::Failed => 2,
            Self::Stopped => 130,
        }
    }
}
