//! Question and answer types for the interview contract.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{PromptError, PromptResult};

/// A single question put to the operator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Question {
    /// Free-form text input, with an optional default.
    Input {
        name: String,
        message: String,
        default: Option<String>,
    },
    /// Single choice from a fixed list.
    Select {
        name: String,
        message: String,
        choices: Vec<String>,
    },
    /// Yes/no confirmation. No default: the operator must answer.
    Confirm { name: String, message: String },
}

impl Question {
    pub fn input(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Input {
            name: name.into(),
            message: message.into(),
            default: None,
        }
    }

    pub fn input_with_default(
        name: impl Into<String>,
        message: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self::Input {
            name: name.into(),
            message: message.into(),
            default: Some(default.into()),
        }
    }

    pub fn select(
        name: impl Into<String>,
        message: impl Into<String>,
        choices: Vec<String>,
    ) -> Self {
        Self::Select {
            name: name.into(),
            message: message.into(),
            choices,
        }
    }

    pub fn confirm(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Confirm {
            name: name.into(),
            message: message.into(),
        }
    }

    /// The answer key this question produces.
    pub fn name(&self) -> &str {
        match self {
            Self::Input { name, .. } | Self::Select { name, .. } | Self::Confirm { name, .. } => {
                name
            }
        }
    }

    /// The message shown to the operator.
    pub fn message(&self) -> &str {
        match self {
            Self::Input { message, .. }
            | Self::Select { message, .. }
            | Self::Confirm { message, .. } => message,
        }
    }
}

/// A recorded answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Text(String),
    Choice(String),
    Bool(bool),
}

/// Mapping of question name to answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Answers(HashMap<String, Answer>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, answer: Answer) {
        self.0.insert(name.into(), answer);
    }

    pub fn get(&self, name: &str) -> Option<&Answer> {
        self.0.get(name)
    }

    /// Get a textual answer (input or selection).
    pub fn text(&self, name: &str) -> PromptResult<&str> {
        match self.0.get(name) {
            Some(Answer::Text(s)) | Some(Answer::Choice(s)) => Ok(s),
            Some(Answer::Bool(_)) => Err(PromptError::WrongAnswerKind {
                name: name.to_string(),
                expected: "text",
            }),
            None => Err(PromptError::MissingAnswer(name.to_string())),
        }
    }

    /// Get a confirmation answer.
    pub fn confirmed(&self, name: &str) -> PromptResult<bool> {
        match self.0.get(name) {
            Some(Answer::Bool(b)) => Ok(*b),
            Some(_) => Err(PromptError::WrongAnswerKind {
                name: name.to_string(),
                expected: "confirmation",
            }),
            None => Err(PromptError::MissingAnswer(name.to_string())),
        }
    }
}

/// The scaffolding-host interview contract: a batch of questions answered
/// by a human. Implementations block until every question is answered;
/// there is no timeout and no implicit default.
pub trait Prompter: Send + Sync {
    fn ask(&self, questions: &[Question]) -> PromptResult<Answers>;
}
