//! Text formatter with optional terminal colors

use super::formatter::EventFormatter;
use crate::types::{PerformanceLevel, ProbeEvent, ProbeSummary, RunOutcome, Target};
use colored::*;

/// Inner width of the summary box
const BOX_WIDTH: usize = 30;

impl PerformanceLevel {
    /// Get color for this performance level
    pub fn color(&self) -> Color {
        match self {
            Self::Good => Color::Green,
            Self::Moderate => Color::Yellow,
            Self::Poor => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub live: Color,
    pub timeout: Color,
    pub stats: Color,
    pub summary: Color,
    pub error: Color,
    pub stopped: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Cyan,
            live: Color::BrightBlack,
            timeout: Color::Red,
            stats: Color::Blue,
            summary: Color::Magenta,
            error: Color::Red,
            stopped: Color::Yellow,
        }
    }
}

/// Human-readable formatter; renders plain text when colors are disabled
pub struct ColoredFormatter {
    enable_color: bool,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new(enable_color: bool) -> Self {
        Self {
            enable_color,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn box_line(&self, content: &str) -> String {
        let line = format!("│{:<width$}│", content, width = BOX_WIDTH);
        self.colorize(&line, self.color_scheme.summary).to_string()
    }

    fn format_summary(&self, summary: &ProbeSummary) -> String {
        let border = "─".repeat(BOX_WIDTH);
        let avg_level = PerformanceLevel::from_ms(summary.avg);

        let mut lines = vec![self
            .colorize(&format!("┌{}┐", border), self.color_scheme.summary)
            .to_string()];
        lines.push(self.box_line(&format!("  Min: {:3} ms", summary.min)));

        let avg = format!("  Avg: {:5.1} ms", summary.avg);
        if self.enable_color {
            // color the value only so the box edges keep the summary color
            let padding = BOX_WIDTH.saturating_sub(avg.chars().count());
            lines.push(format!(
                "{}{}{}",
                "│".color(self.color_scheme.summary),
                avg.color(avg_level.color()).bold(),
                format!("{}│", " ".repeat(padding)).color(self.color_scheme.summary)
            ));
        } else {
            lines.push(self.box_line(&avg));
        }

        lines.push(self.box_line(&format!("  Max: {:3} ms", summary.max)));
        lines.push(self.box_line(&format!("  Packet loss: {}%", summary.loss_percent)));
        lines.push(self.box_line(&format!(
            "  Sent: {} / Received: {}",
            summary.sent, summary.received
        )));
        lines.push(
            self.colorize(&format!("└{}┘", border), self.color_scheme.summary)
                .to_string(),
        );

        lines.join("\n")
    }
}

impl EventFormatter for ColoredFormatter {
    fn format_header(&self, target: &Target, count: u32) -> Option<String> {
        let title = format!("→ Pinging {} ({})", target.name, target.host);
        let title = if self.enable_color {
            title.bold().color(self.color_scheme.header)
        } else {
            title.normal()
        };
        Some(format!(
            "{}\n{}\n",
            title,
            self.colorize(&format!("  {} packets", count), self.color_scheme.live)
        ))
    }

    fn format_event(&self, event: &ProbeEvent) -> Option<String> {
        let rendered = match event {
            ProbeEvent::Live { text } => self.colorize(text, self.color_scheme.live).to_string(),
            ProbeEvent::Result { ms } => {
                let level = PerformanceLevel::from_ms(f64::from(*ms));
                self.colorize(&format!("  {:3} ms", ms), level.color()).to_string()
            }
            ProbeEvent::Timeout => self.colorize("  TIMEOUT", self.color_scheme.timeout).to_string(),
            ProbeEvent::StatsLine { text } => {
                format!("\n{}", self.colorize(text, self.color_scheme.stats))
            }
            ProbeEvent::Summary(summary) => self.format_summary(summary),
            ProbeEvent::Error { text } => {
                format!("{}\n", self.colorize(text, self.color_scheme.error).bold())
            }
            ProbeEvent::Stopped { text } => {
                format!("{}\n", self.colorize(text, self.color_scheme.stopped))
            }
        };
        Some(rendered)
    }

    fn format_footer(&self, outcome: RunOutcome, target: &Target) -> Option<String> {
        match outcome {
            RunOutcome::Completed => Some(
                self.colorize(&format!("Test finished for {}", target.name), self.color_scheme.header)
                    .to_string(),
            ),
            RunOutcome::Exhausted => Some(
                self.colorize(
                    &format!("No replies received from {} ({})", target.name, target.host),
                    self.color_scheme.error,
                )
                .to_string(),
            ),
            RunOutcome::Stopped | RunOutcome::Failed => None,
        }
    }

    fn format_target_list(&self, targets: &[Target]) -> String {
        let width = targets.iter().map(|t| t.name.len()).max().unwrap_or(0);
        let mut output = format!("{}\n", self.bold("Available targets:"));
        for target in targets {
            output.push_str(&format!(
                "  {:<width$}  {}\n",
                target.name,
                self.colorize(&target.host, self.color_scheme.live),
                width = width
            ));
        }
        output
    }
}
