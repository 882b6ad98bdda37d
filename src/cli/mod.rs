//! Command-line interface

use clap::Parser;

/// Region Ping Tester - stream live ping round-trip times to a game-server region
#[derive(Parser, Debug, Clone)]
#[command(name = "rpt")]
#[command(about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Target region to ping (see --list)
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Number of echo requests to send [default: 25]
    #[arg(short, long, value_parser = parse_count)]
    pub count: Option<u32>,

    /// List the available targets and exit
    #[arg(short, long)]
    pub list: bool,

    /// Emit events as JSON lines instead of text
    #[arg(long)]
    pub json: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Ping executable to invoke instead of `ping`
    #[arg(long, value_name = "PATH")]
    pub ping_program: Option<String>,

    /// Extra argument passed to the ping program before the count flag (repeatable)
    #[arg(long = "ping-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub ping_args: Vec<String>,

    /// Milliseconds to wait after terminating ping before killing it
    #[arg(long, value_name = "MS")]
    pub grace_ms: Option<u64>,

    /// Print version and build information
    #[arg(short = 'V', long)]
    pub version: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if !self.list && !self.version && self.target.is_none() {
            return Err(format!(
                "No target given. Available targets: {}",
                crate::targets::names().join(", ")
            ));
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Version line with build metadata
    pub fn version_info() -> String {
        let mut info = format!("{} {}", crate::PKG_NAME, crate::VERSION);
        if let Some(commit) = option_env!("GIT_COMMIT") {
            info.push_str(&format!(" ({})", commit));
        }
        if let Some(built) = option_env!("BUILD_TIME") {
            info.push_str(&format!("\nbuilt {}", built));
        }
        if let Some(target) = option_env!("TARGET_TRIPLE") {
            info.push_str(&format!(" for {}", target));
        }
        info
    }
}

/// Parse and range-check a packet count
fn parse_count(s: &str) -> Result<u32, String> {
    if s.starts_with('+') {
        return Err(format!("Invalid packet count: {}", s));
    }

    s.parse::<u32>()
        .map_err(|_| format!("Invalid packet count: {}", s))
        .and_then(|count| {
            if count == 0 {
                Err("Packet count must be greater than 0".to_string())
            } else if count > crate::defaults::MAX_PACKET_COUNT {
                Err(format!("Packet count cannot exceed {}", crate::defaults::MAX_PACKET_COUNT))
            } else {
                Ok(count)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    // Default to true on Unix-like systems, false on Windows
    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
