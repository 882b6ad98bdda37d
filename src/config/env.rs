//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env from the current directory if it exists
    ///
    /// Returns whether a file was loaded. Variables already set in the
    /// process environment are not overridden.
    pub fn load_env_file() -> Result<bool> {
        Self::load_env_file_from(Path::new(".env"))
    }

    /// Load a specific env file if it exists
    pub fn load_env_file_from(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        dotenv::from_path(path)
            .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;
        Ok(true)
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "PING_COUNT" => {
                let count: u32 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid PING_COUNT value '{}': {}", value, e)))?;
                if count == 0 || count > crate::defaults::MAX_PACKET_COUNT {
                    return Err(AppError::config(format!(
                        "PING_COUNT must be between 1 and {}, got: {}",
                        crate::defaults::MAX_PACKET_COUNT,
                        count
                    )));
                }
            }
            "PING_PROGRAM" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("PING_PROGRAM cannot be empty"));
                }
            }
            "STOP_GRACE_MS" => {
                let grace: u64 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid STOP_GRACE_MS value '{}': {}", value, e)))?;
                if !(100..=10_000).contains(&grace) {
                    return Err(AppError::config(format!("STOP_GRACE_MS must be between 100 and 10000, got: {}", grace)));
                }
            }
            "ENABLE_COLOR" => {
                value.trim().parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            "OUTPUT_FORMAT" => {
                value.parse::<crate::models::OutputFormat>()?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("PING_COUNT", "Number of echo requests per run (1-100)", "25"),
            ("PING_PROGRAM", "Ping executable to invoke", "ping"),
            ("PING_ARGS", "Extra arguments placed before the count flag", ""),
            ("STOP_GRACE_MS", "Grace window before killing ping on stop", "1500"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
            ("OUTPUT_FORMAT", "Event output format (text/json)", "text"),
        ]
    }
}
