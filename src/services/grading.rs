use crate::errors::{AppError, AppResult};
use crate::models::domain::{AnswerDetail, Quiz};

/// Minimum percentage of correct answers needed to pass any quiz.
pub const PASS_THRESHOLD_PERCENT: u32 = 70;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeOutcome {
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub passed: bool,
    /// Marks equivalent of the threshold, reported alongside the outcome.
    pub passing_score: u32,
    pub details: Vec<AnswerDetail>,
}

pub struct GradingService;

impl GradingService {
    /// Grade a submission against the quiz's answer key.
    ///
    /// Position `i` of `answers` is compared to question `i`. The pass
    /// decision depends only on the percentage, never on the quiz's stored
    /// `passing_score`.
    pub fn grade(quiz: &Quiz, answers: &[i64]) -> AppResult<GradeOutcome> {
        if !quiz.is_active {
            return Err(AppError::ValidationError(
                "This quiz is not active".to_string(),
            ));
        }

        if answers.len() != quiz.questions.len() {
            return Err(AppError::ValidationError(format!(
                "Please answer all {} questions",
                quiz.questions.len()
            )));
        }

        let details: Vec<AnswerDetail> = quiz
            .questions
            .iter()
            .zip(answers)
            .enumerate()
            .map(|(i, (question, &selected))| AnswerDetail {
                question_index: i as u32,
                selected_answer: selected,
                is_correct: question.is_correct(selected),
            })
            .collect();

        let score = details.iter().filter(|d| d.is_correct).count() as u32;
        let total_questions = details.len() as u32;
        let percentage = Self::percentage(score, total_questions);

        Ok(GradeOutcome {
            score,
            total_questions,
            percentage,
            passed: percentage >= PASS_THRESHOLD_PERCENT,
            passing_score: Self::marks_to_pass(total_questions),
            details,
        })
    }

    /// `round(score / total * 100)` with halves rounded up.
    pub fn percentage(score: u32, total: u32) -> u32 {
        if total == 0 {
            return 0;
        }
        (score * 200 + total) / (2 * total)
    }

    /// `round(total * 0.7)` with halves rounded up.
    pub fn marks_to_pass(total: u32) -> u32 {
        (total * PASS_THRESHOLD_PERCENT + 50) / 100
    }
}
