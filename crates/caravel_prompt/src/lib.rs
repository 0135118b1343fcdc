//! # caravel_prompt
//!
//! The interactive question/answer contract for Caravel, and the
//! checkpoint gates built on top of it.
//!
//! The workflow core only depends on the abstract [`Prompter`] contract
//! (`ask(list of questions) -> answers mapping`); the terminal
//! implementation and the scripted test double both live here.

pub mod error;
pub mod gate;
pub mod question;
pub mod scripted;
pub mod terminal;

pub use error::{PromptError, PromptResult};
pub use gate::{CheckpointGate, GateDecision, GateId};
pub use question::{Answer, Answers, Prompter, Question};
pub use scripted::ScriptedPrompter;
pub use terminal::TerminalPrompter;
