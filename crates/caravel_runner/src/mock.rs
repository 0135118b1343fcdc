//! Mock process runner for testing.
//!
//! Provides a configurable mock implementation of the ProcessRunner trait
//! for use in tests without invoking real external binaries.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::error::{RunnerError, RunnerResult};
use crate::runner::{CommandSpec, ExecutionResult, ProcessRunner};

/// Predefined mock response for a process execution.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl MockResponse {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Execution mode of a captured call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    Captured,
    Interactive,
}

/// Captured call information for verification.
#[derive(Debug, Clone)]
pub struct CapturedCall {
    pub mode: CallMode,
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<std::path::PathBuf>,
}

impl CapturedCall {
    /// Render the call the way CommandSpec renders itself for logs.
    pub fn display_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Mock process runner for testing.
///
/// This runner captures all calls and returns predefined responses in
/// order, allowing tests to verify which external commands a component
/// would have executed without actually running them.
#[derive(Clone, Default)]
pub struct MockRunner {
    /// Predefined responses, returned in order.
    responses: Arc<RwLock<Vec<MockResponse>>>,
    /// Index of next response to return.
    response_index: Arc<AtomicUsize>,
    /// Captured calls for verification.
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
    /// Simulated spawn failure message, if any.
    simulate_failure: Arc<RwLock<Option<String>>>,
}

impl MockRunner {
    /// Create a new mock runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mock response for the next call.
    pub fn add_response(self, response: MockResponse) -> Self {
        self.responses.write().push(response);
        self
    }

    /// Set multiple responses.
    pub fn with_responses(self, responses: Vec<MockResponse>) -> Self {
        *self.responses.write() = responses;
        self
    }

    /// Simulate a spawn failure for every subsequent call.
    pub fn simulate_failure(self, message: impl Into<String>) -> Self {
        *self.simulate_failure.write() = Some(message.into());
        self
    }

    /// Get all captured calls.
    pub fn get_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    /// Check if any call was made to the given program.
    pub fn was_run(&self, program: &str) -> bool {
        self.captured_calls.read().iter().any(|c| c.program == program)
    }

    /// Get calls made to a specific program.
    pub fn calls_to(&self, program: &str) -> Vec<CapturedCall> {
        self.captured_calls
            .read()
            .iter()
            .filter(|c| c.program == program)
            .cloned()
            .collect()
    }

    fn record_call(&self, mode: CallMode, spec: &CommandSpec) {
        self.captured_calls.write().push(CapturedCall {
            mode,
            program: spec.program.clone(),
            args: spec.args.clone(),
            cwd: spec.cwd.clone(),
        });
    }

    fn next_response(&self) -> MockResponse {
        let responses = self.responses.read();
        if responses.is_empty() {
            return MockResponse::success("");
        }
        let index = self.response_index.fetch_add(1, Ordering::SeqCst);
        responses
            .get(index)
            .cloned()
            .unwrap_or_else(|| MockResponse::success(""))
    }

    fn execute(&self, mode: CallMode, spec: &CommandSpec) -> RunnerResult<ExecutionResult> {
        self.record_call(mode, spec);

        if let Some(msg) = self.simulate_failure.read().clone() {
            return Err(RunnerError::Simulated(msg));
        }

        let response = self.next_response();
        let now = Utc::now();
        Ok(ExecutionResult {
            exit_code: response.exit_code,
            stdout: response.stdout,
            stderr: response.stderr,
            started_at: now,
            finished_at: now,
        })
    }
}

#[async_trait]
impl ProcessRunner for MockRunner {
    async fn run_captured(&self, spec: &CommandSpec) -> RunnerResult<ExecutionResult> {
        self.execute(CallMode::Captured, spec)
    }

    async fn run_interactive(&self, spec: &CommandSpec) -> RunnerResult<ExecutionResult> {
        self.execute(CallMode::Interactive, spec)
    }
}
