use serde::Deserialize;
use validator::Validate;

use crate::models::domain::{QuizCategory, QuizDifficulty, QuizQuestion};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,

    #[validate(length(min = 1, max = 30))]
    pub phone: String,

    #[validate(length(min = 1, max = 300))]
    pub address: String,

    /// Security answer used for password recovery.
    #[validate(length(min = 1, max = 200))]
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Answer is required"))]
    pub answer: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyTokenRequest {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: Option<String>,

    #[validate(length(min = 1, max = 30))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 300))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: u8,
    #[serde(default)]
    pub explanation: String,
}

impl From<QuestionInput> for QuizQuestion {
    fn from(input: QuestionInput) -> Self {
        QuizQuestion {
            question: input.question.trim().to_string(),
            options: input.options.into_iter().map(|o| o.trim().to_string()).collect(),
            correct_answer: input.correct_answer,
            explanation: input.explanation.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, max = 2000, message = "Description is required"))]
    pub description: String,

    pub questions: Vec<QuestionInput>,

    pub passing_score: Option<u32>,

    #[validate(range(min = 1, max = 600))]
    pub time_limit: Option<u32>,

    pub category: Option<QuizCategory>,

    pub difficulty: Option<QuizDifficulty>,
}

/// Partial update. Results are never part of an update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 2000))]
    pub description: Option<String>,

    pub questions: Option<Vec<QuestionInput>>,

    pub passing_score: Option<u32>,

    #[validate(range(min = 1, max = 600))]
    pub time_limit: Option<u32>,

    pub is_active: Option<bool>,

    pub category: Option<QuizCategory>,

    pub difficulty: Option<QuizDifficulty>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    #[validate(length(min = 1, message = "Student id is required"))]
    pub student_id: String,

    #[validate(length(min = 1, message = "Student name is required"))]
    pub student_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub student_email: String,

    /// One entry per question; checked before the quiz is looked up.
    #[validate(length(equal = 40, message = "Please answer all 40 questions"))]
    pub answers: Vec<i64>,

    #[serde(default)]
    pub time_taken: u32, // seconds
}

/// Paging for listings. Validated by the services before any offset is computed.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct PageParams {
    #[validate(range(min = 1, max = 1_000_000, message = "Page must be between 1 and 1000000"))]
    pub page: Option<u64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u64>,
}

impl PageParams {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit_or(&self, default_limit: u64) -> u64 {
        self.limit.unwrap_or(default_limit).clamp(1, 100)
    }

    pub fn offset(&self, default_limit: u64) -> u64 {
        (self.page() - 1).saturating_mul(self.limit_or(default_limit))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,

    pub is_active: Option<bool>,
    pub category: Option<QuizCategory>,
    pub difficulty: Option<QuizDifficulty>,
}

impl QuizListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActiveQuizQuery {
    pub category: Option<QuizCategory>,
    pub difficulty: Option<QuizDifficulty>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetQuizQuery {
    #[serde(default)]
    pub include_answers: bool,
}
