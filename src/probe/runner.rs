//! Runs one ping process and turns its output into an event stream

use super::cancel::{terminate_child, RunContext, Termination};
use super::command::PingCommand;
use super::parser::ProbeParser;
use super::source::{LineSource, MergedOutput};
use crate::error::AppError;
use crate::logging::{LogLevel, Logger};
use crate::models::Config;
use crate::types::{ProbeEvent, Target};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Child;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Text carried by the `Stopped` event
pub const STOPPED_TEXT: &str = "Test stopped by user";

/// How the line loop ended
#[derive(Debug)]
pub enum StreamEnd {
    /// End of output reached
    Eof,
    /// The stop flag was observed
    Cancelled,
    /// The consumer went away
    Disconnected,
    /// Reading output failed
    Fault(AppError),
}

/// Spawns ping and drives it to a terminal event
#[derive(Clone)]
pub struct ProbeRunner {
    program: String,
    prefix_args: Vec<String>,
    reap_timeout: Duration,
    logger: Logger,
}

impl ProbeRunner {
    pub fn new(config: &Config) -> Self {
        Self::with_logger(config, Logger::with_config("PROBE", config))
    }

    pub fn with_logger(config: &Config, logger: Logger) -> Self {
        Self {
            program: config.ping_program.clone(),
            prefix_args: config.ping_args.clone(),
            reap_timeout: crate::defaults::DEFAULT_REAP_TIMEOUT,
            logger,
        }
    }

    pub fn command_for(&self, target: &Target, count: u32) -> PingCommand {
        PingCommand::new(self.program.clone(), count, target.host.clone())
            .with_prefix_args(self.prefix_args.clone())
    }

    /// Start a run on a background task and return its event stream
    ///
    /// The stream closes after at most one terminal event. Dropping the
    /// receiver stops the run.
    pub fn run(&self, target: &Target, count: u32, ctx: Arc<RunContext>) -> UnboundedReceiver<ProbeEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let runner = self.clone();
        let target = target.clone();

        tokio::spawn(async move {
            runner.drive(&target, count, ctx, tx).await;
        });

        rx
    }

    /// Perform a run on the current task, sending events into `tx`
    pub async fn drive(&self, target: &Target, count: u32, ctx: Arc<RunContext>, tx: UnboundedSender<ProbeEvent>) {
        let command = self.command_for(target, count);
        let operation = self.logger.start_operation("probe").await;

        if ctx.is_cancelled() {
            let _ = tx.send(ProbeEvent::stopped(STOPPED_TEXT));
            self.logger.end_operation(&operation, "probe", "stopped").await;
            return;
        }

        self.logger
            .debug(&format!("Spawning: {}", command.display_line()))
            .correlation_id(&operation)
            .log()
            .await;

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                self.logger
                    .warn("Failed to start ping")
                    .correlation_id(&operation)
                    .error_info(&e)
                    .log()
                    .await;
                let _ = tx.send(ProbeEvent::error(format!("Error: {}", e.detail())));
                self.logger.end_operation(&operation, "probe", "error").await;
                return;
            }
        };

        let outcome = self.supervise(child, &ctx, &tx, &operation).await;
        self.logger.end_operation(&operation, "probe", outcome).await;
    }

    /// Own a spawned child until its terminal event; returns the outcome label
    async fn supervise(
        &self,
        mut child: Child,
        ctx: &RunContext,
        tx: &UnboundedSender<ProbeEvent>,
        operation: &str,
    ) -> &'static str {
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // A stop that landed after spawn leaves the child with us
        if let Err(child) = ctx.attach_child(child) {
            self.log_termination(terminate_child(child, ctx.grace()).await, operation).await;
            let _ = tx.send(ProbeEvent::stopped(STOPPED_TEXT));
            return "stopped";
        }

        let mut source = MergedOutput::new(stdout, stderr);
        let (parser, end) = self.process(&mut source, ctx, tx).await;
        drop(source);

        if let StreamEnd::Fault(e) = &end {
            self.logger
                .error("Reading ping output failed")
                .correlation_id(operation)
                .error_info(e)
                .log()
                .await;
        }

        if let Some(child) = ctx.take_child() {
            if ctx.is_cancelled() {
                self.log_termination(terminate_child(child, ctx.grace()).await, operation).await;
            } else {
                self.reap(child, ctx, operation).await;
            }
        }

        let end = settle(end, ctx.is_cancelled());
        let outcome = match finish(&parser, &end) {
            Some(event) => {
                let kind = event.kind();
                let _ = tx.send(event);
                kind
            }
            None => "exhausted",
        };

        self.logger
            .info("Probe finished")
            .correlation_id(operation)
            .field("sent", parser.tally().sent)
            .field("received", parser.tally().received)
            .field("outcome", outcome)
            .log()
            .await;
        outcome
    }

    /// Feed lines into a fresh parser until the stream ends or the run stops
    pub async fn process<S: LineSource + ?Sized>(
        &self,
        source: &mut S,
        ctx: &RunContext,
        tx: &UnboundedSender<ProbeEvent>,
    ) -> (ProbeParser, StreamEnd) {
        let mut parser = ProbeParser::new();

        let end = loop {
            if ctx.is_cancelled() {
                break StreamEnd::Cancelled;
            }

            let read = tokio::select! {
                biased;
                _ = ctx.cancelled() => break StreamEnd::Cancelled,
                read = source.next_line() => read,
            };

            let line = match read {
                Ok(Some(line)) => line,
                Ok(None) => break StreamEnd::Eof,
                Err(_) if ctx.is_cancelled() => break StreamEnd::Cancelled,
                Err(e) => break StreamEnd::Fault(AppError::stream(e.to_string())),
            };

            let events = parser.feed_line(&line);
            if events.is_empty() && !line.trim().is_empty() && self.logger.would_log(LogLevel::Debug) {
                self.logger
                    .debug("Unclassified ping output")
                    .field("line", line.trim())
                    .log()
                    .await;
            }

            // The stop flag may have been set while this line was being read
            if ctx.is_cancelled() {
                break StreamEnd::Cancelled;
            }

            if events.into_iter().any(|event| tx.send(event).is_err()) {
                ctx.request();
                break StreamEnd::Disconnected;
            }
        };

        (parser, end)
    }

    /// Wait for a child whose output has ended, killing it if it lingers
    ///
    /// A stop requested while waiting terminates the child right away.
    async fn reap(&self, mut child: Child, ctx: &RunContext, operation: &str) {
        let waited = tokio::select! {
            waited = tokio::time::timeout(self.reap_timeout, child.wait()) => Some(waited),
            _ = ctx.cancelled() => None,
        };

        match waited {
            Some(Ok(Ok(status))) => {
                self.logger
                    .debug("Ping exited")
                    .correlation_id(operation)
                    .field("status", status.to_string())
                    .log()
                    .await;
            }
            Some(Ok(Err(e))) => {
                self.logger
                    .warn(&format!("Failed to wait for ping: {}", e))
                    .correlation_id(operation)
                    .log()
                    .await;
            }
            Some(Err(_)) => {
                let _ = child.kill().await;
                self.logger
                    .warn("Ping did not exit after closing its output; killed")
                    .correlation_id(operation)
                    .log()
                    .await;
            }
            None => {
                self.log_termination(terminate_child(child, ctx.grace()).await, operation).await;
            }
        }
    }

    async fn log_termination(&self, termination: Termination, operation: &str) {
        let builder = match &termination {
            Termination::KillFailed(reason) => self
                .logger
                .warn(&format!("Could not kill ping: {}", reason)),
            other => self.logger.debug(&format!("Ping terminated: {:?}", other)),
        };
        builder.correlation_id(operation).log().await;
    }
}

/// A stop that races with end of output still counts as a stop
///
/// Checked after teardown, so `cancelled` covers requests made while reaping.
fn settle(end: StreamEnd, cancelled: bool) -> StreamEnd {
    match end {
        StreamEnd::Eof if cancelled => StreamEnd::Cancelled,
        other => other,
    }
}

/// Terminal event for a finished stream, or None when the stream is simply exhausted
pub fn finish(parser: &ProbeParser, end: &StreamEnd) -> Option<ProbeEvent> {
    match end {
        StreamEnd::Fault(e) => Some(ProbeEvent::error(format!("Error: {}", e.detail()))),
        StreamEnd::Cancelled => Some(ProbeEvent::stopped(STOPPED_TEXT)),
        StreamEnd::Disconnected => None,
        StreamEnd::Eof => parser.summary().map(ProbeEvent::Summary),
    }
}
