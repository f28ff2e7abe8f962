use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One graded submission. Appended to the results log, never updated.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizResult {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    pub score: u32,
    pub total_questions: u32,
    pub passed: bool,
    pub answers: Vec<AnswerDetail>,
    pub time_taken: u32, // seconds
    pub completed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnswerDetail {
    pub question_index: u32,
    pub selected_answer: i64, // -1 when unanswered
    pub is_correct: bool,
}
