//! Process runner backed by real host processes.

use std::process::Stdio;

use async_trait::async_trait;
use chrono::Utc;
use tokio::process::Command;
use tracing::debug;

use crate::error::{RunnerError, RunnerResult};
use crate::runner::{CommandSpec, ExecutionResult, ProcessRunner};

/// Runs commands as child processes of the current process.
///
/// Interactive executions inherit the controlling terminal, so the human
/// operator sees the child's output live and can answer its prompts; the
/// runner has no way to interrupt a running child.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(&self, spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }
        cmd
    }
}

#[async_trait]
impl ProcessRunner for ShellRunner {
    async fn run_captured(&self, spec: &CommandSpec) -> RunnerResult<ExecutionResult> {
        debug!("Running (captured): {}", spec.display_line());

        let started_at = Utc::now();
        let output = self
            .command(spec)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| RunnerError::Spawn {
                program: spec.program.clone(),
                source,
            })?;
        let finished_at = Utc::now();

        let exit_code = output.status.code().ok_or_else(|| RunnerError::Terminated {
            program: spec.program.clone(),
        })?;

        Ok(ExecutionResult {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            started_at,
            finished_at,
        })
    }

    async fn run_interactive(&self, spec: &CommandSpec) -> RunnerResult<ExecutionResult> {
        debug!("Running (interactive): {}", spec.display_line());

        let started_at = Utc::now();
        let status = self
            .command(spec)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| RunnerError::Spawn {
                program: spec.program.clone(),
                source,
            })?;
        let finished_at = Utc::now();

        let exit_code = status.code().ok_or_else(|| RunnerError::Terminated {
            program: spec.program.clone(),
        })?;

        Ok(ExecutionResult {
            exit_code,
            stdout: String::new(),
            stderr: String::new(),
            started_at,
            finished_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_captured_success() {
        let runner = ShellRunner::new();
        let spec = CommandSpec::new("sh").args(["-c", "echo hello"]);

        let result = runner.run_captured(&spec).await.unwrap();
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_run_captured_nonzero_exit() {
        let runner = ShellRunner::new();
        let spec = CommandSpec::new("sh").args(["-c", "echo oops >&2; exit 3"]);

        let result = runner.run_captured(&spec).await.unwrap();
        assert_eq!(result.exit_code, 3);
        assert!(!result.success());
        assert_eq!(result.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_run_captured_missing_program() {
        let runner = ShellRunner::new();
        let spec = CommandSpec::new("definitely-not-a-real-binary-xyz");

        let err = runner.run_captured(&spec).await.unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_run_captured_respects_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ShellRunner::new();
        let spec = CommandSpec::new("pwd").current_dir(dir.path());

        let result = runner.run_captured(&spec).await.unwrap();
        let reported = std::fs::canonicalize(result.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }
}
