use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::quiz_question::QuizQuestion,
};

/// Every quiz in this domain has exactly this many questions.
pub const QUESTIONS_PER_QUIZ: usize = 40;
pub const DEFAULT_PASSING_SCORE: u32 = 28;
pub const DEFAULT_TIME_LIMIT_MINUTES: u32 = 30;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<QuizQuestion>,
    pub total_questions: u32,
    pub passing_score: u32, // marks, informational only
    pub time_limit: u32,    // minutes
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

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum QuizCategory {
    #[default]
    #[serde(rename = "IELTS preparation")]
    IeltsPreparation,
    #[serde(rename = "Spoken English")]
    SpokenEnglish,
    #[serde(rename = "English for competitive exams")]
    CompetitiveExams,
    #[serde(rename = "GRE Vocabulary")]
    GreVocabulary,
}

impl QuizCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizCategory::IeltsPreparation => "IELTS preparation",
            QuizCategory::SpokenEnglish => "Spoken English",
            QuizCategory::CompetitiveExams => "English for competitive exams",
            QuizCategory::GreVocabulary => "GRE Vocabulary",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl QuizDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizDifficulty::Easy => "easy",
            QuizDifficulty::Medium => "medium",
            QuizDifficulty::Hard => "hard",
        }
    }
}

impl Quiz {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: &str,
        description: &str,
        questions: Vec<QuizQuestion>,
        passing_score: u32,
        time_limit: u32,
        category: QuizCategory,
        difficulty: QuizDifficulty,
        created_by: Option<String>,
    ) -> AppResult<Self> {
        Self::validate_questions(&questions)?;

        let now = Utc::now();
        Ok(Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            total_questions: questions.len() as u32,
            questions,
            passing_score,
            time_limit,
            is_active: true,
            category,
            difficulty,
            created_by,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }

    pub fn validate_questions(questions: &[QuizQuestion]) -> AppResult<()> {
        if questions.len() != QUESTIONS_PER_QUIZ {
            return Err(AppError::ValidationError(format!(
                "Exactly {} questions are required, got {}",
                QUESTIONS_PER_QUIZ,
                questions.len()
            )));
        }

        questions
            .iter()
            .enumerate()
            .try_for_each(|(i, q)| q.validate_at(i))
    }

    /// Replaces the question set. Only reachable through an explicit update.
    pub fn replace_questions(&mut self, questions: Vec<QuizQuestion>) -> AppResult<()> {
        Self::validate_questions(&questions)?;
        self.total_questions = questions.len() as u32;
        self.questions = questions;
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
impl Quiz {
    /// A 40 question quiz whose answer key cycles `0, 1, 2, 3, ...`.
    pub fn test_quiz(title: &str) -> Self {
        Quiz::new(
            title,
            "Vocabulary drill",
            test_questions(),
            DEFAULT_PASSING_SCORE,
            DEFAULT_TIME_LIMIT_MINUTES,
            QuizCategory::default(),
            QuizDifficulty::default(),
            None,
        )
        .expect("test questions are valid")
    }
}

#[cfg(test)]
pub fn test_questions() -> Vec<QuizQuestion> {
    (0..QUESTIONS_PER_QUIZ)
        .map(|i| QuizQuestion {
            question: format!("Question {}", i + 1),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: (i % 4) as u8,
            explanation: String::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_quiz_defaults() {
        let quiz = Quiz::test_quiz("Week 1");

        assert!(quiz.is_active);
        assert_eq!(quiz.total_questions, 40);
        assert_eq!(quiz.passing_score, 28);
        assert_eq!(quiz.category, QuizCategory::IeltsPreparation);
        assert_eq!(quiz.difficulty, QuizDifficulty::Medium);
        assert!(Uuid::parse_str(&quiz.id).is_ok());
    }

    #[test]
    fn new_quiz_rejects_wrong_question_count() {
        let mut questions = test_questions();
        questions.pop();

        let result = Quiz::new(
            "Short",
            "Too few",
            questions,
            DEFAULT_PASSING_SCORE,
            DEFAULT_TIME_LIMIT_MINUTES,
            QuizCategory::default(),
            QuizDifficulty::default(),
            None,
        );
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn replace_questions_validates_each_question() {
        let mut quiz = Quiz::test_quiz("Week 2");
        let mut questions = test_questions();
        questions[10].options.truncate(2);

        assert!(quiz.replace_questions(questions).is_err());
        assert_eq!(quiz.questions, test_questions());
    }

    #[test]
    fn category_and_difficulty_use_display_names() {
        assert_eq!(
            serde_json::to_string(&QuizCategory::GreVocabulary).unwrap(),
            "\"GRE Vocabulary\""
        );
        assert_eq!(serde_json::to_string(&QuizDifficulty::Hard).unwrap(), "\"hard\"");
        assert!(serde_json::from_str::<QuizCategory>("\"Cooking\"").is_err());
        assert_eq!(QuizCategory::SpokenEnglish.as_str(), "Spoken English");
    }
}
