//! Core formatting trait and the JSON lines implementation

use crate::types::{ProbeEvent, RunOutcome, Target};
use serde_json::json;

/// Turns a run's events into console lines
pub trait EventFormatter: Send + Sync {
    /// Lines printed before the first event
    fn format_header(&self, target: &Target, count: u32) -> Option<String>;

    /// Rendering of a single event, or None to print nothing
    fn format_event(&self, event: &ProbeEvent) -> Option<String>;

    /// Closing line once the stream has ended
    fn format_footer(&self, outcome: RunOutcome, target: &Target) -> Option<String>;

    /// Output for `--list`
    fn format_target_list(&self, targets: &[Target]) -> String;
}

/// One JSON object per line, tagged by event type
#[derive(Debug, Default, Clone)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl EventFormatter for JsonFormatter {
    fn format_header(&self, _target: &Target, _count: u32) -> Option<String> {
        None
    }

    fn format_event(&self, event: &ProbeEvent) -> Option<String> {
        serde_json::to_string(event).ok()
    }

    fn format_footer(&self, _outcome: RunOutcome, _target: &Target) -> Option<String> {
        None
    }

    fn format_target_list(&self, targets: &[Target]) -> String {
        json!(targets).to_string()
    }
}
