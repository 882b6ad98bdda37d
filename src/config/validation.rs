//! Configuration validation rules that produce warnings rather than errors

use crate::{
    models::Config,
    error::Result,
};
use std::path::Path;

/// Configuration validator with advisory checks
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration, returning non-fatal warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_packet_count(config));
        warnings.extend(Self::validate_ping_program(&config.ping_program));
        Ok(warnings)
    }

    fn validate_packet_count(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        // ping sends one request per second by default
        if config.packet_count > 50 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "{} packets will take roughly {} seconds; press Ctrl-C to stop early",
                    config.packet_count, config.packet_count
                ),
            ));
        }

        if config.packet_count < 4 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Only {} packet(s): loss percentage will be coarse", config.packet_count),
            ));
        }

        warnings
    }

    fn validate_ping_program(program: &str) -> Vec<ValidationWarning> {
        // Bare names are looked up on PATH at spawn time
        let looks_like_path = program.contains('/') || program.contains('\\');
        if looks_like_path && !Path::new(program).exists() {
            return vec![ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Ping program '{}' does not exist", program),
            )];
        }
        Vec::new()
    }
}

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// A non-fatal configuration finding
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        if use_color {
            use colored::Colorize;
            let tag = match self.level {
                ValidationLevel::Info => self.level.as_str().cyan(),
                ValidationLevel::Warning => self.level.as_str().yellow(),
            };
            format!("[{}] {}", tag, self.message)
        } else {
            format!("[{}] {}", self.level.as_str(), self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_warnings() {
        let warnings = validate_config(&Config::default()).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut config = Config::default();
        config.packet_count = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_long_run_info() {
        let mut config = Config::default();
        config.packet_count = 80;
        let warnings = validate_config(&config).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, ValidationLevel::Info);
    }

    #[test]
    fn test_small_count_warning() {
        let mut config = Config::default();
        config.packet_count = 2;
        let warnings = validate_config(&config).unwrap();
        assert!(warnings.iter().any(|w| w.level == ValidationLevel::Warning));
    }

    #[test]
    fn test_missing_program_path_warning() {
        let mut config = Config::default();
        config.ping_program = "/definitely/not/here/ping".to_string();
        let warnings = validate_config(&config).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("does not exist"));
    }

    #[test]
    fn test_plain_format() {
        let warning = ValidationWarning::new(ValidationLevel::Warning, "careful".to_string());
        assert_eq!(warning.format(false), "[WARNING] careful");
    }
}
