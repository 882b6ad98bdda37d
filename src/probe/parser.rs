//! Line classification for ping utility output
//!
//! Ping output differs between vendors, so lines are matched against a small
//! ordered rule set rather than a grammar:
//!
//! 1. live gate: the line looks like a reply (`Reply from`, `time=`, `time<`)
//! 2. round-trip time: `time=NNms` / `time<NNms` / `time=NN.N ms`
//! 3. timeout, only when rule 2 did not match
//! 4. statistics fragment, checked independently of rules 1-3
//!
//! One line can therefore produce zero, one or several events.

use crate::types::{ProbeEvent, ProbeSummary};
use regex::Regex;
use std::sync::OnceLock;

const LIVE_MARKERS: &[&str] = &["Reply from", "time=", "time<"];

// Lowercased before matching. "request timeout" is the BSD/macOS wording.
const TIMEOUT_MARKERS: &[&str] = &["timed out", "request timeout"];

const STATS_MARKERS: &[&str] = &[
    "Packets:",
    "Lost =",
    "packets transmitted",
    "min/avg/max",
];

fn rtt_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"time[=<](\d+)(?:[.,]\d+)?\s?ms").expect("round-trip pattern is valid")
    })
}

/// Result of applying the rule set to one line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineClass {
    pub live: bool,
    pub rtt_ms: Option<u32>,
    pub timeout: bool,
    pub stats: bool,
}

impl LineClass {
    /// Whether no rule matched
    pub fn is_unmatched(&self) -> bool {
        !self.live && self.rtt_ms.is_none() && !self.timeout && !self.stats
    }
}

/// Apply the rule set to a trimmed line
pub fn classify(line: &str) -> LineClass {
    let live = LIVE_MARKERS.iter().any(|marker| line.contains(marker));
    let rtt_ms = parse_rtt(line);

    let timeout = rtt_ms.is_none() && {
        let lower = line.to_lowercase();
        TIMEOUT_MARKERS.iter().any(|marker| lower.contains(marker))
    };

    let stats = STATS_MARKERS.iter().any(|marker| line.contains(marker));

    LineClass {
        live,
        rtt_ms,
        timeout,
        stats,
    }
}

/// Extract the integer millisecond part of a round-trip time, if present
pub fn parse_rtt(line: &str) -> Option<u32> {
    rtt_pattern()
        .captures(line)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Round to one decimal place, halves away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Counters accumulated over one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeTally {
    /// Recorded round-trip times in arrival order
    pub times: Vec<u32>,
    pub sent: u32,
    pub received: u32,
}

impl ProbeTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_reply(&mut self, ms: u32) {
        self.times.push(ms);
        self.sent += 1;
        self.received += 1;
    }

    pub fn record_timeout(&mut self) {
        self.sent += 1;
    }

    /// Packet loss percentage, 100.0 when nothing was sent
    pub fn loss_percent(&self) -> f64 {
        if self.sent == 0 {
            return 100.0;
        }
        let lost = self.sent.saturating_sub(self.received) as f64;
        round1(lost / self.sent as f64 * 100.0)
    }

    /// Final statistics, or None when no round-trip time was recorded
    pub fn summary(&self) -> Option<ProbeSummary> {
        let min = *self.times.iter().min()?;
        let max = *self.times.iter().max()?;
        let total: u64 = self.times.iter().map(|&ms| u64::from(ms)).sum();
        let avg = round1(total as f64 / self.times.len() as f64);

        Some(ProbeSummary {
            min,
            max,
            avg,
            sent: self.sent,
            received: self.received,
            loss_percent: self.loss_percent(),
        })
    }
}

/// Stateful parser turning ping output lines into events
#[derive(Debug, Default)]
pub struct ProbeParser {
    tally: ProbeTally,
}

impl ProbeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one raw line and return its events in emission order
    pub fn feed_line(&mut self, raw: &str) -> Vec<ProbeEvent> {
        let line = raw.trim();
        if line.is_empty() {
            return Vec::new();
        }

        let class = classify(line);
        let mut events = Vec::new();

        if class.live {
            events.push(ProbeEvent::live(line));
        }

        if let Some(ms) = class.rtt_ms {
            self.tally.record_reply(ms);
            events.push(ProbeEvent::Result { ms });
        } else if class.timeout {
            self.tally.record_timeout();
            events.push(ProbeEvent::Timeout);
        }

        if class.stats {
            events.push(ProbeEvent::stats_line(line));
        }

        events
    }

    pub fn tally(&self) -> &ProbeTally {
        &self.tally
    }

    pub fn summary(&self) -> Option<ProbeSummary> {
        self.tally.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_windows_reply_line() {
        let line = "Reply from 1.2.3.4: bytes=32 time=20ms TTL=117";
        let class = classify(line);
        assert!(class.live);
        assert_eq!(class.rtt_ms, Some(20));
        assert!(!class.timeout);
        assert!(!class.stats);
    }

    #[test]
    fn test_sub_millisecond_reply() {
        assert_eq!(parse_rtt("Reply from 10.0.0.1: bytes=32 time<1ms TTL=64"), Some(1));
    }

    #[test]
    fn test_unix_reply_line_truncates_fraction() {
        let line = "64 bytes from 1.1.1.1: icmp_seq=1 ttl=57 time=14.7 ms";
        let class = classify(line);
        assert!(class.live);
        assert_eq!(class.rtt_ms, Some(14));
    }

    #[test]
    fn test_reply_without_time_is_live_only() {
        let class = classify("Reply from 192.168.1.1: Destination host unreachable.");
        assert!(class.live);
        assert_eq!(class.rtt_ms, None);
        assert!(!class.timeout);
    }

    #[test]
    fn test_timeout_lines() {
        assert!(classify("Request timed out.").timeout);
        assert!(classify("PING: transmit failed. General failure. TIMED OUT").timeout);
        assert!(classify("Request timeout for icmp_seq 3").timeout);
        assert!(!classify("Request timed out.").live);
    }

    #[test]
    fn test_rtt_takes_priority_over_timeout() {
        let class = classify("time=5ms (previous request timed out)");
        assert_eq!(class.rtt_ms, Some(5));
        assert!(!class.timeout);
    }

    #[test]
    fn test_stats_fragments() {
        assert!(classify("Packets: Sent = 4, Received = 4, Lost = 0 (0% loss),").stats);
        assert!(classify("4 packets transmitted, 4 received, 0% packet loss, time 3004ms").stats);
        assert!(classify("rtt min/avg/max/mdev = 13.1/14.2/15.0/0.7 ms").stats);
    }

    #[test]
    fn test_summary_header_line_with_time_is_not_an_rtt() {
        // "time 3004ms" has a space, not '=' or '<'
        let class = classify("4 packets transmitted, 4 received, 0% packet loss, time 3004ms");
        assert_eq!(class.rtt_ms, None);
        assert!(!class.live);
    }

    #[test]
    fn test_unmatched_lines() {
        assert!(classify("Pinging ping-eu.ds.on.epicgames.com [1.2.3.4] with 32 bytes of data:").is_unmatched());
        assert!(classify("PING 1.1.1.1 (1.1.1.1) 56(84) bytes of data.").is_unmatched());
        assert!(classify("Approximate round trip times in milli-seconds:").is_unmatched());
    }

    #[test]
    fn test_oversized_rtt_is_ignored() {
        assert_eq!(parse_rtt("time=99999999999ms"), None);
    }

    #[test]
    fn test_feed_line_emits_live_then_result() {
        let mut parser = ProbeParser::new();
        let events = parser.feed_line("  Reply from 1.2.3.4: time=20ms  ");
        assert_eq!(
            events,
            vec![
                ProbeEvent::live("Reply from 1.2.3.4: time=20ms"),
                ProbeEvent::Result { ms: 20 },
            ]
        );
    }

    #[test]
    fn test_feed_line_skips_blank_lines() {
        let mut parser = ProbeParser::new();
        assert!(parser.feed_line("").is_empty());
        assert!(parser.feed_line("   \r").is_empty());
        assert_eq!(parser.tally().sent, 0);
    }

    #[test]
    fn test_windows_stats_line_yields_stats_event() {
        let mut parser = ProbeParser::new();
        let events = parser.feed_line("    Packets: Sent = 4, Received = 3, Lost = 1 (25% loss),");
        assert_eq!(
            events,
            vec![ProbeEvent::stats_line("Packets: Sent = 4, Received = 3, Lost = 1 (25% loss),")]
        );
    }

    #[test]
    fn test_reply_with_stats_fragment_produces_three_events() {
        let mut parser = ProbeParser::new();
        let events = parser.feed_line("Reply from 1.2.3.4: time=20ms Lost = 0");
        assert_eq!(events.len(), 3);
        assert_eq!(events[1], ProbeEvent::Result { ms: 20 });
        assert!(matches!(events[2], ProbeEvent::StatsLine { .. }));
    }

    #[test]
    fn test_mixed_scenario_tally() {
        let mut parser = ProbeParser::new();
        let mut events = Vec::new();
        for line in ["Reply from 1.2.3.4: time=20ms", "Request timed out.", "time=30ms"] {
            events.extend(parser.feed_line(line));
        }

        let results: Vec<&ProbeEvent> = events
            .iter()
            .filter(|e| matches!(e, ProbeEvent::Result { .. } | ProbeEvent::Timeout))
            .collect();
        assert_eq!(
            results,
            vec![
                &ProbeEvent::Result { ms: 20 },
                &ProbeEvent::Timeout,
                &ProbeEvent::Result { ms: 30 },
            ]
        );

        let summary = parser.summary().unwrap();
        assert_eq!(summary.min, 20);
        assert_eq!(summary.max, 30);
        assert_eq!(summary.avg, 25.0);
        assert_eq!(summary.sent, 3);
        assert_eq!(summary.received, 2);
        assert_eq!(summary.loss_percent, 33.3);
    }

    #[test]
    fn test_no_summary_without_times() {
        let mut parser = ProbeParser::new();
        parser.feed_line("Request timed out.");
        parser.feed_line("Request timed out.");
        assert!(parser.summary().is_none());
        assert_eq!(parser.tally().loss_percent(), 100.0);
    }

    #[test]
    fn test_loss_with_nothing_sent() {
        assert_eq!(ProbeTally::new().loss_percent(), 100.0);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(25.0), 25.0);
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(14.25), 14.3);
    }

    #[derive(Debug, Clone)]
    enum SyntheticLine {
        Reply(u32),
        Bare(u32),
        Unix(u32, u8),
        Timeout,
        Stats,
        Noise,
        Blank,
    }

    impl SyntheticLine {
        fn render(&self) -> String {
            match self {
                Self::Reply(ms) => format!("Reply from 1.2.3.4: bytes=32 time={}ms TTL=117", ms),
                Self::Bare(ms) => format!("time<{}ms", ms),
                Self::Unix(ms, frac) => format!("64 bytes from 1.1.1.1: icmp_seq=1 ttl=57 time={}.{} ms", ms, frac % 10),
                Self::Timeout => "Request timed out.".to_string(),
                Self::Stats => "Packets: Sent = 4, Received = 4, Lost = 0 (0% loss),".to_string(),
                Self::Noise => "Pinging example.com [93.184.216.34] with 32 bytes of data:".to_string(),
                Self::Blank => "   ".to_string(),
            }
        }

        fn rtt(&self) -> Option<u32> {
            match self {
                Self::Reply(ms) | Self::Bare(ms) | Self::Unix(ms, _) => Some(*ms),
                _ => None,
            }
        }
    }

    fn synthetic_line() -> impl Strategy<Value = SyntheticLine> {
        prop_oneof![
            (0u32..5000).prop_map(SyntheticLine::Reply),
            (0u32..5000).prop_map(SyntheticLine::Bare),
            (0u32..5000, any::<u8>()).prop_map(|(ms, f)| SyntheticLine::Unix(ms, f)),
            Just(SyntheticLine::Timeout),
            Just(SyntheticLine::Stats),
            Just(SyntheticLine::Noise),
            Just(SyntheticLine::Blank),
        ]
    }

    proptest! {
        #[test]
        fn prop_results_match_rtt_lines(lines in prop::collection::vec(synthetic_line(), 0..60)) {
            let mut parser = ProbeParser::new();
            let mut parsed = Vec::new();
            for line in &lines {
                for event in parser.feed_line(&line.render()) {
                    if let ProbeEvent::Result { ms } = event {
                        parsed.push(ms);
                    }
                }
            }

            let expected: Vec<u32> = lines.iter().filter_map(SyntheticLine::rtt).collect();
            prop_assert_eq!(parsed, expected);
        }

        #[test]
        fn prop_summary_statistics(lines in prop::collection::vec(synthetic_line(), 0..60)) {
            let mut parser = ProbeParser::new();
            for line in &lines {
                parser.feed_line(&line.render());
            }

            let times: Vec<u32> = lines.iter().filter_map(SyntheticLine::rtt).collect();
            let timeouts = lines.iter().filter(|l| matches!(l, SyntheticLine::Timeout)).count() as u32;

            match parser.summary() {
                None => prop_assert!(times.is_empty()),
                Some(summary) => {
                    let mean = times.iter().map(|&t| t as f64).sum::<f64>() / times.len() as f64;
                    prop_assert_eq!(summary.min, *times.iter().min().unwrap());
                    prop_assert_eq!(summary.max, *times.iter().max().unwrap());
                    prop_assert!((summary.avg - mean).abs() <= 0.05 + 1e-9);
                    prop_assert_eq!(summary.avg, round1(mean));

                    let sent = times.len() as u32 + timeouts;
                    prop_assert_eq!(summary.sent, sent);
                    prop_assert_eq!(summary.received, times.len() as u32);
                    let loss = round1(timeouts as f64 / sent as f64 * 100.0);
                    prop_assert_eq!(summary.loss_percent, loss);
                }
            }
        }
    }
}
