//! Terminal prompter reading answers from stdin.

use std::io::{self, BufRead, Write};

use crate::error::{PromptError, PromptResult};
use crate::question::{Answer, Answers, Prompter, Question};

/// Prompter backed by the controlling terminal.
///
/// Blocks on stdin until the operator answers; invalid input re-asks the
/// same question. EOF on stdin surfaces as `PromptError::InputClosed`.
#[derive(Debug, Clone, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&self) -> PromptResult<String> {
        let mut line = String::new();
        let bytes = io::stdin().lock().read_line(&mut line)?;
        if bytes == 0 {
            return Err(PromptError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    fn ask_input(&self, message: &str, default: Option<&str>) -> PromptResult<String> {
        match default {
            Some(d) => print!("{} [{}]: ", message, d),
            None => print!("{}: ", message),
        }
        io::stdout().flush()?;

        let line = self.read_line()?;
        if line.is_empty() {
            if let Some(d) = default {
                return Ok(d.to_string());
            }
        }
        Ok(line)
    }

    fn ask_select(&self, message: &str, choices: &[String]) -> PromptResult<String> {
        loop {
            println!("{}", message);
            for (i, choice) in choices.iter().enumerate() {
                println!("  [{}] {}", i + 1, choice);
            }
            print!("Enter a number [1-{}]: ", choices.len());
            io::stdout().flush()?;

            let line = self.read_line()?;
            match line.parse::<usize>() {
                Ok(n) if n >= 1 && n <= choices.len() => return Ok(choices[n - 1].clone()),
                _ => println!("Invalid selection."),
            }
        }
    }

    fn ask_confirm(&self, message: &str) -> PromptResult<bool> {
        loop {
            print!("{} [y/n]: ", message);
            io::stdout().flush()?;

            let line = self.read_line()?.to_lowercase();
            match line.as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => println!("Please answer y or n."),
            }
        }
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&self, questions: &[Question]) -> PromptResult<Answers> {
        let mut answers = Answers::new();
        for question in questions {
            let answer = match question {
                Question::Input { message, default, .. } => {
                    Answer::Text(self.ask_input(message, default.as_deref())?)
                }
                Question::Select { message, choices, .. } => {
                    Answer::Choice(self.ask_select(message, choices)?)
                }
                Question::Confirm { message, .. } => Answer::Bool(self.ask_confirm(message)?),
            };
            answers.insert(question.name(), answer);
        }
        Ok(answers)
    }
}
