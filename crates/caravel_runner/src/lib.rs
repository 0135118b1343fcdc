//! # caravel_runner
//!
//! External process execution for Caravel.
//!
//! Every external collaborator (cloud CLI, IaC engine, git, package
//! manager) is invoked through the narrow [`ProcessRunner`] capability so
//! higher layers can be tested against [`MockRunner`] instead of real
//! binaries.
//!
//! ## Example
//!
//! ```rust,no_run
//! use caravel_runner::{CommandSpec, ProcessRunner, ShellRunner};
//!
//! # async fn run() -> caravel_runner::RunnerResult<()> {
//! let runner = ShellRunner::new();
//! let result = runner
//!     .run_captured(&CommandSpec::new("terraform").args(["output", "-json"]))
//!     .await?;
//! println!("{}", result.stdout);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod mock;
pub mod runner;
pub mod shell;

pub use error::{RunnerError, RunnerResult};
pub use mock::{CallMode, CapturedCall, MockResponse, MockRunner};
pub use runner::{CommandSpec, ExecutionResult, ProcessRunner};
pub use shell::ShellRunner;
