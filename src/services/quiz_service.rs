use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{
            quiz::{DEFAULT_PASSING_SCORE, DEFAULT_TIME_LIMIT_MINUTES},
            Quiz, QuizQuestion, QuizResult,
        },
        dto::{
            quiz_dto::{
                QuizDto, QuizResultDto, QuizResultsPage, QuizResultsSummary, QuizSummaryDto,
                SubmissionDto, TaggedResultDto,
            },
            request::{CreateQuizRequest, PageParams, SubmitQuizRequest, UpdateQuizRequest},
            response::PaginationMetadata,
        },
    },
    repositories::{QuizFilter, QuizRepository, QuizResultRepository},
    services::{
        grading::GradingService,
        stats::{self, QuizStats, StatsReport},
    },
};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const DEFAULT_RESULTS_PAGE_SIZE: u64 = 50;

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    results: Arc<dyn QuizResultRepository>,
}

impl QuizService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, results: Arc<dyn QuizResultRepository>) -> Self {
        Self { quizzes, results }
    }

    async fn find_quiz(&self, id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))
    }

    async fn summaries_with_stats(&self, quizzes: Vec<Quiz>) -> AppResult<Vec<QuizSummaryDto>> {
        let ids: Vec<String> = quizzes.iter().map(|q| q.id.clone()).collect();
        let results = self.results.find_by_quizzes(&ids).await?;
        let by_quiz = stats::stats_by_quiz(&results);

        Ok(quizzes
            .into_iter()
            .map(|quiz| {
                let stats = by_quiz.get(quiz.id.as_str()).cloned().unwrap_or_default();
                QuizSummaryDto::with_stats(quiz, stats)
            })
            .collect())
    }

    /// Paged listing for administrators, newest first.
    pub async fn list_quizzes(
        &self,
        filter: &QuizFilter,
        page: PageParams,
    ) -> AppResult<(Vec<QuizSummaryDto>, PaginationMetadata)> {
        page.validate()?;
        let limit = page.limit_or(DEFAULT_PAGE_SIZE);
        let (quizzes, total) = self
            .quizzes
            .list(filter, page.offset(DEFAULT_PAGE_SIZE), limit as i64)
            .await?;

        let summaries = self.summaries_with_stats(quizzes).await?;
        Ok((summaries, PaginationMetadata::new(page.page(), limit, total)))
    }

    /// Every active quiz matching the filter, for students.
    pub async fn active_quizzes(&self, filter: QuizFilter) -> AppResult<Vec<QuizSummaryDto>> {
        let filter = QuizFilter {
            is_active: Some(true),
            ..filter
        };
        let quizzes = self.quizzes.find_all(&filter).await?;
        self.summaries_with_stats(quizzes).await
    }

    pub async fn get_quiz(&self, id: &str, include_answers: bool) -> AppResult<QuizDto> {
        let quiz = self.find_quiz(id).await?;
        Ok(QuizDto::from_quiz(quiz, include_answers))
    }

    pub async fn create_quiz(&self, request: CreateQuizRequest, created_by: &str) -> AppResult<Quiz> {
        request.validate()?;

        let questions: Vec<QuizQuestion> = request.questions.into_iter().map(Into::into).collect();
        let quiz = Quiz::new(
            &request.title,
            &request.description,
            questions,
            request.passing_score.unwrap_or(DEFAULT_PASSING_SCORE),
            request.time_limit.unwrap_or(DEFAULT_TIME_LIMIT_MINUTES),
            request.category.unwrap_or_default(),
            request.difficulty.unwrap_or_default(),
            Some(created_by.to_string()),
        )?;

        let quiz = self.quizzes.create(quiz).await?;
        log::info!("Quiz '{}' created by {}", quiz.id, created_by);
        Ok(quiz)
    }

    pub async fn update_quiz(&self, id: &str, request: UpdateQuizRequest) -> AppResult<Quiz> {
        request.validate()?;
        let mut quiz = self.find_quiz(id).await?;

        if let Some(questions) = request.questions {
            quiz.replace_questions(questions.into_iter().map(Into::into).collect())?;
        }
        if let Some(title) = request.title {
            quiz.title = title.trim().to_string();
        }
        if let Some(description) = request.description {
            quiz.description = description.trim().to_string();
        }
        if let Some(passing_score) = request.passing_score {
            quiz.passing_score = passing_score;
        }
        if let Some(time_limit) = request.time_limit {
            quiz.time_limit = time_limit;
        }
        if let Some(is_active) = request.is_active {
            quiz.is_active = is_active;
        }
        if let Some(category) = request.category {
            quiz.category = category;
        }
        if let Some(difficulty) = request.difficulty {
            quiz.difficulty = difficulty;
        }
        quiz.touch();

        self.quizzes.update(quiz).await
    }

    /// Removes the quiz together with every result recorded against it.
    pub async fn delete_quiz(&self, id: &str) -> AppResult<()> {
        self.quizzes.delete(id).await?;
        let removed = self.results.delete_by_quiz(id).await?;
        log::info!("Quiz '{}' deleted along with {} results", id, removed);
        Ok(())
    }

    /// Grade a submission and append it to the results log.
    ///
    /// Repeat submissions by the same student are recorded as separate
    /// attempts.
    pub async fn submit(&self, quiz_id: &str, request: SubmitQuizRequest) -> AppResult<SubmissionDto> {
        request.validate()?;
        let quiz = self.find_quiz(quiz_id).await?;
        let outcome = GradingService::grade(&quiz, &request.answers)?;

        let result = QuizResult {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz.id.clone(),
            student_id: request.student_id,
            student_name: request.student_name,
            student_email: request.student_email,
            score: outcome.score,
            total_questions: outcome.total_questions,
            passed: outcome.passed,
            answers: outcome.details,
            time_taken: request.time_taken,
            completed_at: Utc::now(),
        };
        let result = self.results.append(result).await?;

        log::info!(
            "Student '{}' scored {}/{} on quiz '{}' (passed: {})",
            result.student_id,
            result.score,
            result.total_questions,
            quiz.id,
            result.passed
        );

        Ok(SubmissionDto {
            score: outcome.score,
            total_questions: outcome.total_questions,
            percentage: outcome.percentage,
            passed: outcome.passed,
            passing_score: outcome.passing_score,
        })
    }

    /// One quiz's results, newest first, with stats over all of them.
    pub async fn quiz_results(&self, quiz_id: &str, page: PageParams) -> AppResult<QuizResultsPage> {
        page.validate()?;
        let quiz = self.find_quiz(quiz_id).await?;
        let results = self.results.find_by_quiz(quiz_id).await?;
        let stats = QuizStats::aggregate(&results);

        let limit = page.limit_or(DEFAULT_PAGE_SIZE);
        let total = results.len() as u64;
        let page_items = results
            .into_iter()
            .skip(page.offset(DEFAULT_PAGE_SIZE) as usize)
            .take(limit as usize)
            .map(QuizResultDto::from)
            .collect();

        Ok(QuizResultsPage {
            quiz: QuizResultsSummary {
                id: quiz.id,
                title: quiz.title,
                stats,
            },
            results: page_items,
            pagination: PaginationMetadata::new(page.page(), limit, total),
        })
    }

    /// Results across every quiz, newest first, tagged with their quiz.
    ///
    /// Results whose quiz no longer exists are skipped.
    pub async fn all_results(
        &self,
        page: PageParams,
    ) -> AppResult<(Vec<TaggedResultDto>, PaginationMetadata)> {
        page.validate()?;
        let quizzes = self.quizzes.find_all(&QuizFilter::default()).await?;
        let by_id: HashMap<&str, &Quiz> = quizzes.iter().map(|q| (q.id.as_str(), q)).collect();

        let tagged: Vec<TaggedResultDto> = self
            .results
            .find_all()
            .await?
            .into_iter()
            .filter_map(|result| {
                let quiz = by_id.get(result.quiz_id.as_str())?;
                Some(TaggedResultDto {
                    quiz_title: quiz.title.clone(),
                    category: quiz.category,
                    difficulty: quiz.difficulty,
                    result: QuizResultDto::from(result),
                })
            })
            .collect();

        let limit = page.limit_or(DEFAULT_RESULTS_PAGE_SIZE);
        let total = tagged.len() as u64;
        let page_items = tagged
            .into_iter()
            .skip(page.offset(DEFAULT_RESULTS_PAGE_SIZE) as usize)
            .take(limit as usize)
            .collect();

        Ok((page_items, PaginationMetadata::new(page.page(), limit, total)))
    }

    pub async fn stats(&self) -> AppResult<StatsReport> {
        let quizzes = self.quizzes.find_all(&QuizFilter::default()).await?;
        let results = self.results.find_all().await?;
        Ok(stats::build_report(&quizzes, &results))
    }
}
