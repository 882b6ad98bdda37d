//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    models::{Config, OutputFormat},
    error::Result,
    config::env::EnvManager,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file()?;
        config.merge_from_env()?;

        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(count) = self.cli.count {
            config.packet_count = count;
        }

        if let Some(ref program) = self.cli.ping_program {
            config.ping_program = program.clone();
        }

        if !self.cli.ping_args.is_empty() {
            config.ping_args = self.cli.ping_args.clone();
        }

        if let Some(grace) = self.cli.grace_ms {
            config.stop_grace_ms = grace;
        }

        if self.cli.color {
            config.enable_color = true;
        } else if self.cli.no_color {
            config.enable_color = false;
        } else if config.enable_color {
            config.enable_color = self.cli.use_colors();
        }

        if self.cli.json {
            config.output_format = OutputFormat::Json;
        }

        // These are CLI-only
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Packet Count: {}", config.packet_count));
    summary.push(format!("Ping Program: {}", config.ping_program));
    if !config.ping_args.is_empty() {
        summary.push(format!("Ping Args: {}", config.ping_args.join(" ")));
    }
    summary.push(format!("Stop Grace: {}ms", config.stop_grace_ms));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Output Format: {:?}", config.output_format));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    /// Defaults plus CLI overrides, leaving the process environment out
    fn overrides_only(cli: Cli) -> Result<Config> {
        let mut config = Config::default();
        ConfigParser::new(cli).apply_cli_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn parse(args: &[&str]) -> Config {
        overrides_only(Cli::parse_from(args)).unwrap()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = parse(&["rpt", "Europe"]);
        assert_eq!(config.packet_count, 25);
        assert_eq!(config.ping_program, "ping");
        assert_eq!(config.stop_grace_ms, 1500);
        assert_eq!(config.output_format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_overrides() {
        let config = parse(&[
            "rpt", "Europe",
            "--count", "4",
            "--ping-program", "/bin/sh",
            "--ping-arg", "fake.sh",
            "--grace-ms", "250",
            "--json",
            "--verbose",
        ]);
        assert_eq!(config.packet_count, 4);
        assert_eq!(config.ping_program, "/bin/sh");
        assert_eq!(config.ping_args, vec!["fake.sh".to_string()]);
        assert_eq!(config.stop_grace_ms, 250);
        assert!(config.json_output());
        assert!(config.verbose);
        assert!(!config.debug);
    }

    #[test]
    fn test_color_flags() {
        assert!(!parse(&["rpt", "Europe", "--no-color"]).enable_color);
        assert!(parse(&["rpt", "Europe", "--color"]).enable_color);
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let cli = Cli::parse_from(["rpt", "Europe", "--grace-ms", "5"]);
        assert!(overrides_only(cli).is_err());
    }

    #[test]
    fn test_config_summary() {
        let config = parse(&["rpt", "Europe", "--count", "7"]);
        let summary = display_config_summary(&config);
        assert!(summary.contains("Packet Count: 7"));
        assert!(summary.contains("Ping Program: ping"));
    }
}
