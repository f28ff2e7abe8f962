use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::QuizResult};

/// Append-only log of graded submissions, keyed by quiz id.
#[async_trait]
pub trait QuizResultRepository: Send + Sync {
    async fn append(&self, result: QuizResult) -> AppResult<QuizResult>;
    /// Newest first.
    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizResult>>;
    async fn find_by_quizzes(&self, quiz_ids: &[String]) -> AppResult<Vec<QuizResult>>;
    async fn find_all(&self) -> AppResult<Vec<QuizResult>>;
    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<u64>;
}

pub struct MongoQuizResultRepository {
    collection: Collection<QuizResult>,
}

impl MongoQuizResultRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.quiz_results();
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_results collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let quiz_completed_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "completed_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("quiz_completed".to_string())
                    .build(),
            )
            .build();

        let student_index = IndexModel::builder()
            .keys(doc! { "student_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("student_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(quiz_completed_index).await?;
        self.collection.create_index(student_index).await?;

        log::info!("Successfully created indexes for quiz_results collection");
        Ok(())
    }
}

#[async_trait]
impl QuizResultRepository for MongoQuizResultRepository {
    async fn append(&self, result: QuizResult) -> AppResult<QuizResult> {
        self.collection.insert_one(&result).await?;
        Ok(result)
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizResult>> {
        let results = self
            .collection
            .find(doc! { "quiz_id": quiz_id })
            .sort(doc! { "completed_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }

    async fn find_by_quizzes(&self, quiz_ids: &[String]) -> AppResult<Vec<QuizResult>> {
        if quiz_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = self
            .collection
            .find(doc! { "quiz_id": { "$in": quiz_ids.to_vec() } })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }

    async fn find_all(&self) -> AppResult<Vec<QuizResult>> {
        let results = self
            .collection
            .find(doc! {})
            .sort(doc! { "completed_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }

    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "quiz_id": quiz_id })
            .await?;
        Ok(result.deleted_count)
    }
}
