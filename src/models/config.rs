//! Configuration data model and validation

use crate::config::EnvManager;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// How events are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines, optionally colored
    Text,
    /// One JSON object per event
    Json,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(AppError::config(format!(
                "Invalid output format '{}': expected 'text' or 'json'",
                other
            ))),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of echo requests per run
    #[serde(default = "default_packet_count")]
    pub packet_count: u32,

    /// Ping executable to invoke
    #[serde(default = "default_ping_program")]
    pub ping_program: String,

    /// Extra arguments placed before the count flag (e.g. a wrapper script)
    #[serde(default)]
    pub ping_args: Vec<String>,

    /// Grace window between terminate and kill when stopping, in milliseconds
    #[serde(default = "default_stop_grace_ms")]
    pub stop_grace_ms: u64,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Event output format
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            packet_count: default_packet_count(),
            ping_program: default_ping_program(),
            ping_args: Vec::new(),
            stop_grace_ms: default_stop_grace_ms(),
            enable_color: default_enable_color(),
            output_format: default_output_format(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop grace window as a Duration
    pub fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms)
    }

    /// Whether events are emitted as JSON lines
    pub fn json_output(&self) -> bool {
        self.output_format == OutputFormat::Json
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.packet_count == 0 {
            return Err(AppError::config("Packet count must be greater than 0"));
        }

        if self.packet_count > crate::defaults::MAX_PACKET_COUNT {
            return Err(AppError::config(format!(
                "Packet count cannot exceed {}",
                crate::defaults::MAX_PACKET_COUNT
            )));
        }

        if self.ping_program.trim().is_empty() {
            return Err(AppError::config("Ping program cannot be empty"));
        }

        if self.stop_grace_ms < 100 {
            return Err(AppError::config("Stop grace window must be at least 100ms"));
        }

        if self.stop_grace_ms > 10_000 {
            return Err(AppError::config("Stop grace window cannot exceed 10000ms"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_lookup(|key| std::env::var(key).ok())
    }

    /// Merge variables from any key lookup; each value is validated first
    pub fn merge_from_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (key, _, _) in EnvManager::get_supported_env_vars() {
            if let Some(value) = lookup(key) {
                EnvManager::validate_env_var(key, &value)?;
                self.apply_env_var(key, value.trim())?;
            }
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "PING_COUNT" => self.packet_count = value.parse()?,
            "PING_PROGRAM" => self.ping_program = value.to_string(),
            "PING_ARGS" => self.ping_args = value.split_whitespace().map(String::from).collect(),
            "STOP_GRACE_MS" => self.stop_grace_ms = value.parse()?,
            "ENABLE_COLOR" => self.enable_color = value.parse()?,
            "OUTPUT_FORMAT" => self.output_format = value.parse()?,
            _ => {}
        }
        Ok(())
    }
}

// Default value functions for serde
fn default_packet_count() -> u32 {
    crate::defaults::DEFAULT_PACKET_COUNT
}

fn default_ping_program() -> String {
    crate::defaults::DEFAULT_PING_PROGRAM.to_string()
}

fn default_stop_grace_ms() -> u64 {
    crate::defaults::DEFAULT_STOP_GRACE.as_millis() as u64
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Text
}
