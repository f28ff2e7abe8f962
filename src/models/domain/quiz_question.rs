use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: u8, // index into `options`, 0..=3
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestion {
    /// `position` is zero-based; error messages count from one.
    pub fn validate_at(&self, position: usize) -> AppResult<()> {
        let valid = !self.question.trim().is_empty()
            && self.options.len() == OPTIONS_PER_QUESTION
            && self.options.iter().all(|o| !o.trim().is_empty())
            && (self.correct_answer as usize) < OPTIONS_PER_QUESTION;

        if !valid {
            return Err(AppError::ValidationError(format!(
                "Question {} is invalid. Each question must have a question text, exactly {} options, and a valid correct answer index (0-3)",
                position + 1,
                OPTIONS_PER_QUESTION
            )));
        }
        Ok(())
    }

    /// Any submitted value is accepted; only the keyed option is correct.
    pub fn is_correct(&self, selected: i64) -> bool {
        i64::from(self.correct_answer) == selected
    }
}
