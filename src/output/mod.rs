//! Output formatting and display system
//!
//! Events are rendered by an [`EventFormatter`] (colored text or JSON
//! lines) and written by an [`OutputCoordinator`], which also tracks how the
//! run ended.

mod colored;
mod formatter;

pub use self::colored::ColoredFormatter;
pub use self::formatter::{EventFormatter, JsonFormatter};

use crate::{
    error::Result,
    models::Config,
    types::{ProbeEvent, RunOutcome, Target},
};
use std::io::{self, Write};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter matching the configured output format
    pub fn create_formatter(config: &Config) -> Box<dyn EventFormatter> {
        if config.json_output() {
            Box::new(JsonFormatter::new())
        } else {
            Box::new(ColoredFormatter::new(config.enable_color))
        }
    }
}

/// Writes formatted events and records the run outcome
pub struct OutputCoordinator<W: Write> {
    formatter: Box<dyn EventFormatter>,
    writer: W,
    outcome: Option<RunOutcome>,
}

impl OutputCoordinator<io::Stdout> {
    /// Coordinator writing to stdout
    pub fn stdout(formatter: Box<dyn EventFormatter>) -> Self {
        Self::new(formatter, io::stdout())
    }
}

impl<W: Write> OutputCoordinator<W> {
    pub fn new(formatter: Box<dyn EventFormatter>, writer: W) -> Self {
        Self {
            formatter,
            writer,
            outcome: None,
        }
    }

    pub fn display_header(&mut self, target: &Target, count: u32) -> Result<()> {
        if let Some(header) = self.formatter.format_header(target, count) {
            writeln!(self.writer, "{}", header)?;
            self.writer.flush()?;
        }
        Ok(())
    }

    /// Write one event; flushed immediately so live output is not buffered
    pub fn display_event(&mut self, event: &ProbeEvent) -> Result<()> {
        match event {
            ProbeEvent::Summary(_) => self.outcome = Some(RunOutcome::Completed),
            ProbeEvent::Error { .. } => self.outcome = Some(RunOutcome::Failed),
            ProbeEvent::Stopped { .. } => self.outcome = Some(RunOutcome::Stopped),
            _ => {}
        }

        if let Some(line) = self.formatter.format_event(event) {
            writeln!(self.writer, "{}", line)?;
            self.writer.flush()?;
        }
        Ok(())
    }

    /// Outcome so far; a stream without a terminal event is exhausted
    pub fn outcome(&self) -> RunOutcome {
        self.outcome.unwrap_or(RunOutcome::Exhausted)
    }

    /// Write the closing line and return the final outcome
    pub fn finish(&mut self, target: &Target) -> Result<RunOutcome> {
        let outcome = self.outcome();
        if let Some(footer) = self.formatter.format_footer(outcome, target) {
            writeln!(self.writer, "{}", footer)?;
            self.writer.flush()?;
        }
        Ok(outcome)
    }

    pub fn display_target_list(&mut self, targets: &[Target]) -> Result<()> {
        let list = self.formatter.format_target_list(targets);
        writeln!(self.writer, "{}", list.trim_end())?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Target {
        Target::new("Asia", "ping-asia.ds.on.epicgames.com")
    }

    fn rendered(coordinator: OutputCoordinator<Vec<u8>>) -> String {
        String::from_utf8(coordinator.into_inner()).unwrap()
    }

    #[test]
    fn test_factory_picks_json() {
        let mut config = Config::default();
        config.output_format = crate::models::OutputFormat::Json;
        let formatter = OutputFormatterFactory::create_formatter(&config);
        assert_eq!(
            formatter.format_event(&ProbeEvent::Timeout).as_deref(),
            Some(r#"{"type":"timeout"}"#)
        );
    }

    #[test]
    fn test_outcome_follows_terminal_event() {
        let mut coordinator = OutputCoordinator::new(Box::new(ColoredFormatter::new(false)), Vec::new());
        assert_eq!(coordinator.outcome(), RunOutcome::Exhausted);

        coordinator.display_event(&ProbeEvent::Result { ms: 10 }).unwrap();
        assert_eq!(coordinator.outcome(), RunOutcome::Exhausted);

        coordinator.display_event(&ProbeEvent::stopped("Test stopped by user")).unwrap();
        assert_eq!(coordinator.finish(&target()).unwrap(), RunOutcome::Stopped);
    }

    #[test]
    fn test_plain_stream_rendering() {
        let mut coordinator = OutputCoordinator::new(Box::new(ColoredFormatter::new(false)), Vec::new());
        coordinator.display_header(&target(), 2).unwrap();
        coordinator.display_event(&ProbeEvent::Result { ms: 42 }).unwrap();
        coordinator.display_event(&ProbeEvent::Timeout).unwrap();
        assert_eq!(coordinator.finish(&target()).unwrap(), RunOutcome::Exhausted);

        let text = rendered(coordinator);
        assert!(text.starts_with("→ Pinging Asia (ping-asia.ds.on.epicgames.com)"));
        assert!(text.contains("   42 ms\n"));
        assert!(text.contains("  TIMEOUT\n"));
        assert!(text.contains("No replies received"));
    }

    #[test]
    fn test_json_stream_is_one_object_per_line() {
        let mut coordinator = OutputCoordinator::new(Box::new(JsonFormatter::new()), Vec::new());
        coordinator.display_header(&target(), 1).unwrap();
        coordinator.display_event(&ProbeEvent::live("Reply from 1.2.3.4: time=5ms")).unwrap();
        coordinator.display_event(&ProbeEvent::Result { ms: 5 }).unwrap();
        coordinator.finish(&target()).unwrap();

        let text = rendered(coordinator);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            serde_json::from_str::<serde_json::Value>(line).unwrap();
        }
    }
}
