//! Region Ping Tester
//!
//! Streams live round-trip times from the system ping utility to a
//! game-server region, parsing its output incrementally into events and
//! supporting graceful cancellation of a running test.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod targets;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, OutputFormat};
pub use output::{ColoredFormatter, EventFormatter, JsonFormatter, OutputCoordinator, OutputFormatterFactory};
pub use probe::{CancelHandle, ProbeParser, ProbeRunner, RunContext};
pub use types::{ProbeEvent, ProbeSummary, RunOutcome, Target};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_PACKET_COUNT: u32 = 25;
    pub const MAX_PACKET_COUNT: u32 = 100;
    pub const DEFAULT_PING_PROGRAM: &str = "ping";
    /// Wait between terminate and kill when a run is stopped
    pub const DEFAULT_STOP_GRACE: Duration = Duration::from_millis(1500);
    /// Wait for ping to exit after its output has ended
    pub const DEFAULT_REAP_TIMEOUT: Duration = Duration::from_secs(3);
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
