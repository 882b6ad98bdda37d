//! Ping execution and output parsing
//!
//! A run spawns the platform ping utility, merges its stdout and stderr, and
//! classifies each line into [`ProbeEvent`](crate::types::ProbeEvent)s. Runs
//! are stopped through their own [`RunContext`].

pub mod cancel;
pub mod command;
pub mod parser;
pub mod runner;
pub mod source;

pub use cancel::{terminate_child, CancelHandle, RunContext, Termination};
pub use command::PingCommand;
pub use parser::{classify, LineClass, ProbeParser, ProbeTally};
pub use runner::{ProbeRunner, StreamEnd, STOPPED_TEXT};
pub use source::{LineSource, MergedOutput};
