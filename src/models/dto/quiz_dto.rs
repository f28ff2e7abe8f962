use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{AnswerDetail, Quiz, QuizCategory, QuizDifficulty, QuizQuestion, QuizResult};
use crate::models::dto::response::PaginationMetadata;
use crate::services::stats::QuizStats;

/// A question as shown to a client. The answer key is omitted unless
/// the caller is allowed to see it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub question: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuestionDto {
    fn from_question(question: QuizQuestion, include_answers: bool) -> Self {
        if include_answers {
            QuestionDto {
                question: question.question,
                options: question.options,
                correct_answer: Some(question.correct_answer),
                explanation: Some(question.explanation),
            }
        } else {
            QuestionDto {
                question: question.question,
                options: question.options,
                correct_answer: None,
                explanation: None,
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<QuestionDto>,
    pub total_questions: u32,
    pub passing_score: u32,
    pub time_limit: u32,
    pub is_active: bool,
    pub category: QuizCategory,
    pub difficulty: QuizDifficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl QuizDto {
    pub fn from_quiz(quiz: Quiz, include_answers: bool) -> Self {
        QuizDto {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            questions: quiz
                .questions
                .into_iter()
                .map(|q| QuestionDto::from_question(q, include_answers))
                .collect(),
            total_questions: quiz.total_questions,
            passing_score: quiz.passing_score,
            time_limit: quiz.time_limit,
            is_active: quiz.is_active,
            category: quiz.category,
            difficulty: quiz.difficulty,
            created_by: quiz.created_by,
            created_at: quiz.created_at,
            updated_at: quiz.updated_at,
        }
    }
}

impl From<Quiz> for QuizDto {
    fn from(quiz: Quiz) -> Self {
        QuizDto::from_quiz(quiz, true)
    }
}

/// Card shown in listings: no questions, optionally with attempt stats.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummaryDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub total_questions: u32,
    pub passing_score: u32,
    pub time_limit: u32,
    pub is_active: bool,
    pub category: QuizCategory,
    pub difficulty: QuizDifficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub stats: Option<QuizStats>,
}

impl QuizSummaryDto {
    pub fn with_stats(quiz: Quiz, stats: QuizStats) -> Self {
        let mut summary = QuizSummaryDto::from(quiz);
        summary.stats = Some(stats);
        summary
    }
}

impl From<Quiz> for QuizSummaryDto {
    fn from(quiz: Quiz) -> Self {
        QuizSummaryDto {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            total_questions: quiz.total_questions,
            passing_score: quiz.passing_score,
            time_limit: quiz.time_limit,
            is_active: quiz.is_active,
            category: quiz.category,
            difficulty: quiz.difficulty,
            created_at: quiz.created_at,
            stats: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDetailDto {
    pub question_index: u32,
    pub selected_answer: i64,
    pub is_correct: bool,
}

impl From<AnswerDetail> for AnswerDetailDto {
    fn from(detail: AnswerDetail) -> Self {
        AnswerDetailDto {
            question_index: detail.question_index,
            selected_answer: detail.selected_answer,
            is_correct: detail.is_correct,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultDto {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    pub score: u32,
    pub total_questions: u32,
    pub passed: bool,
    pub answers: Vec<AnswerDetailDto>,
    pub time_taken: u32,
    pub completed_at: DateTime<Utc>,
}

impl From<QuizResult> for QuizResultDto {
    fn from(result: QuizResult) -> Self {
        QuizResultDto {
            id: result.id,
            quiz_id: result.quiz_id,
            student_id: result.student_id,
            student_name: result.student_name,
            student_email: result.student_email,
            score: result.score,
            total_questions: result.total_questions,
            passed: result.passed,
            answers: result.answers.into_iter().map(AnswerDetailDto::from).collect(),
            time_taken: result.time_taken,
            completed_at: result.completed_at,
        }
    }
}

/// A result annotated with the quiz it belongs to, for cross-quiz views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedResultDto {
    #[serde(flatten)]
    pub result: QuizResultDto,
    pub quiz_title: String,
    pub category: QuizCategory,
    pub difficulty: QuizDifficulty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDto {
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub passed: bool,
    pub passing_score: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultsSummary {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub stats: QuizStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizResultsPage {
    pub quiz: QuizResultsSummary,
    pub results: Vec<QuizResultDto>,
    pub pagination: PaginationMetadata,
}
