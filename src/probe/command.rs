//! Platform-specific ping invocation

use crate::types::{AppError, Result};
use std::process::Stdio;
use tokio::process::{Child, Command};

/// Windows `CREATE_NO_WINDOW` process creation flag
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Flag selecting the number of echo requests on this platform
#[cfg(windows)]
pub const COUNT_FLAG: &str = "-n";
#[cfg(not(windows))]
pub const COUNT_FLAG: &str = "-c";

/// A fully described ping process, not yet started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingCommand {
    pub program: String,
    /// Arguments placed before the count flag
    pub prefix_args: Vec<String>,
    pub count: u32,
    pub host: String,
}

impl PingCommand {
    pub fn new(program: impl Into<String>, count: u32, host: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            prefix_args: Vec::new(),
            count,
            host: host.into(),
        }
    }

    pub fn with_prefix_args(mut self, args: Vec<String>) -> Self {
        self.prefix_args = args;
        self
    }

    /// Argument vector handed to the program
    pub fn args(&self) -> Vec<String> {
        let mut args = self.prefix_args.clone();
        args.push(COUNT_FLAG.to_string());
        args.push(self.count.to_string());
        args.push(self.host.clone());
        args
    }

    /// Render as a shell-like line for logging
    pub fn display_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args());
        parts.join(" ")
    }

    /// Build the process with both output streams captured and no console window
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        command
    }

    /// Start the process
    pub fn spawn(&self) -> Result<Child> {
        self.to_command().spawn().map_err(|e| {
            AppError::spawn(format!("failed to start '{}': {}", self.program, e))
        })
    }
}
