use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Quiz, QuizCategory, QuizDifficulty},
};

/// Optional equality filters for quiz listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizFilter {
    pub is_active: Option<bool>,
    pub category: Option<QuizCategory>,
    pub difficulty: Option<QuizDifficulty>,
}

impl QuizFilter {
    pub fn active() -> Self {
        Self {
            is_active: Some(true),
            ..Self::default()
        }
    }

    pub fn matches(&self, quiz: &Quiz) -> bool {
        self.is_active.map_or(true, |v| quiz.is_active == v)
            && self.category.map_or(true, |c| quiz.category == c)
            && self.difficulty.map_or(true, |d| quiz.difficulty == d)
    }

    pub fn to_document(&self) -> Document {
        let mut filter = doc! {};
        if let Some(is_active) = self.is_active {
            filter.insert("is_active", is_active);
        }
        if let Some(category) = self.category {
            filter.insert("category", category.as_str());
        }
        if let Some(difficulty) = self.difficulty {
            filter.insert("difficulty", difficulty.as_str());
        }
        filter
    }
}

#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    /// Newest first.
    async fn list(&self, filter: &QuizFilter, offset: u64, limit: i64) -> AppResult<(Vec<Quiz>, u64)>;
    async fn find_all(&self, filter: &QuizFilter) -> AppResult<Vec<Quiz>>;
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn update(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.quizzes();
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let active_category_index = IndexModel::builder()
            .keys(doc! { "is_active": 1, "category": 1 })
            .options(
                IndexOptions::builder()
                    .name("active_category".to_string())
                    .build(),
            )
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(active_category_index).await?;
        self.collection.create_index(created_at_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn list(&self, filter: &QuizFilter, offset: u64, limit: i64) -> AppResult<(Vec<Quiz>, u64)> {
        let filter = filter.to_document();

        let total = self.collection.count_documents(filter.clone()).await?;

        let items = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(offset)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((items, total))
    }

    async fn find_all(&self, filter: &QuizFilter) -> AppResult<Vec<Quiz>> {
        let items = self
            .collection
            .find(filter.to_document())
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(items)
    }

    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        let result = self
            .collection
            .replace_one(doc! { "id": &quiz.id }, &quiz)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Quiz with id '{}' not found",
                quiz.id
            )));
        }
        Ok(quiz)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", id)));
        }
        Ok(())
    }
}
