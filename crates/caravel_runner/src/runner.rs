//! Process runner trait and types.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RunnerResult;

/// Specification of a single external command invocation.
///
/// Arguments are always passed as discrete parameters to the operating
/// system; no shell is involved, so argument values are never subject to
/// shell interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Program to execute (resolved via PATH)
    pub program: String,
    /// Arguments, passed verbatim
    pub args: Vec<String>,
    /// Working directory (defaults to the caller's)
    pub cwd: Option<PathBuf>,
    /// Additional environment variables
    pub env: HashMap<String, String>,
}

impl CommandSpec {
    /// Create a new command specification.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: HashMap::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add an environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Render the command for log output.
    pub fn display_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Result of an external process execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Exit code of the process
    pub exit_code: i32,
    /// Captured stdout (empty for interactive executions)
    pub stdout: String,
    /// Captured stderr (empty for interactive executions)
    pub stderr: String,
    /// Execution start time
    pub started_at: DateTime<Utc>,
    /// Execution end time
    pub finished_at: DateTime<Utc>,
}

impl ExecutionResult {
    /// Check if execution was successful (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Get combined output (stdout + stderr).
    pub fn combined_output(&self) -> String {
        if self.stdout.is_empty() {
            self.stderr.clone()
        } else if self.stderr.is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// External process runner trait.
///
/// The two execution modes map to the two kinds of external calls the
/// workflow makes: `run_captured` for calls whose output the workflow
/// parses, `run_interactive` for calls a human observes and may interact
/// with on the controlling terminal.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the command to completion with stdout/stderr captured.
    async fn run_captured(&self, spec: &CommandSpec) -> RunnerResult<ExecutionResult>;

    /// Run the command with its streams attached to the controlling
    /// terminal. Blocks until the process exits; the returned result
    /// carries the exit code and empty output.
    async fn run_interactive(&self, spec: &CommandSpec) -> RunnerResult<ExecutionResult>;
}
