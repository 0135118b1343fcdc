//! Scripted prompter for testing.
//!
//! Answers questions from a preconfigured map and records every question
//! asked, so tests can verify both what was asked and how the flow reacts
//! to specific answers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{PromptError, PromptResult};
use crate::question::{Answer, Answers, Prompter, Question};

/// Prompter that replays preconfigured answers.
#[derive(Clone, Default)]
pub struct ScriptedPrompter {
    answers: Arc<RwLock<HashMap<String, Answer>>>,
    asked: Arc<RwLock<Vec<Question>>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preconfigure an answer for a question name.
    pub fn with_answer(self, name: impl Into<String>, answer: Answer) -> Self {
        self.answers.write().insert(name.into(), answer);
        self
    }

    pub fn with_text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_answer(name, Answer::Text(value.into()))
    }

    pub fn with_choice(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_answer(name, Answer::Choice(value.into()))
    }

    pub fn with_confirm(self, name: impl Into<String>, value: bool) -> Self {
        self.with_answer(name, Answer::Bool(value))
    }

    /// All questions asked so far, in order.
    pub fn asked(&self) -> Vec<Question> {
        self.asked.read().clone()
    }

    /// Number of questions asked so far.
    pub fn ask_count(&self) -> usize {
        self.asked.read().len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, questions: &[Question]) -> PromptResult<Answers> {
        let mut result = Answers::new();
        for question in questions {
            self.asked.write().push(question.clone());
            let answer = self
                .answers
                .read()
                .get(question.name())
                .cloned()
                .ok_or_else(|| PromptError::MissingAnswer(question.name().to_string()))?;
            result.insert(question.name(), answer);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_prompter_replays_answers() {
        let prompter = ScriptedPrompter::new()
            .with_text("name", "demo")
            .with_confirm("go", false);

        let answers = prompter
            .ask(&[
                Question::input("name", "Project name?"),
                Question::confirm("go", "Proceed?"),
            ])
            .unwrap();

        assert_eq!(answers.text("name").unwrap(), "demo");
        assert!(!answers.confirmed("go").unwrap());
        assert_eq!(prompter.ask_count(), 2);
    }

    #[test]
    fn test_scripted_prompter_missing_answer() {
        let prompter = ScriptedPrompter::new();
        let err = prompter
            .ask(&[Question::confirm("go", "Proceed?")])
            .unwrap_err();
        assert!(matches!(err, PromptError::MissingAnswer(name) if name == "go"));
    }
}
