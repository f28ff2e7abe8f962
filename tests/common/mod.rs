#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use tutor_server::{
    app_state::AppState,
    auth::password::hash_secret,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        quiz::{DEFAULT_PASSING_SCORE, DEFAULT_TIME_LIMIT_MINUTES, QUESTIONS_PER_QUIZ},
        Quiz, QuizCategory, QuizDifficulty, QuizQuestion, QuizResult, User, UserRole,
    },
    repositories::{QuizFilter, QuizRepository, QuizResultRepository, UserRepository},
};

pub const TEST_SECRET: &str = "integration_jwt_secret_that_is_long_enough";

pub fn test_config(honor_expired: bool) -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        "JWT_EXPIRATION_HOURS" => Some("1".to_string()),
        "JWT_HONOR_EXPIRED" => Some(honor_expired.to_string()),
        _ => None,
    })
    .expect("test config is valid")
}

pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn sorted(&self, filter: &QuizFilter) -> Vec<Quiz> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<Quiz> = quizzes.values().filter(|q| filter.matches(q)).cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        items
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }

    async fn list(&self, filter: &QuizFilter, offset: u64, limit: i64) -> AppResult<(Vec<Quiz>, u64)> {
        let items = self.sorted(filter).await;
        let total = items.len() as u64;
        let page = items
            .into_iter()
            .skip(offset as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn find_all(&self, filter: &QuizFilter) -> AppResult<Vec<Quiz>> {
        Ok(self.sorted(filter).await)
    }

    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::AlreadyExists(format!(
                "Quiz with id '{}' already exists",
                quiz.id
            )));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if !quizzes.contains_key(&quiz.id) {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", quiz.id)));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.quizzes
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }
}

pub struct InMemoryQuizResultRepository {
    results: Arc<RwLock<Vec<QuizResult>>>,
}

impl InMemoryQuizResultRepository {
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
        }
    }

    async fn newest_first<F>(&self, keep: F) -> Vec<QuizResult>
    where
        F: Fn(&QuizResult) -> bool,
    {
        let results = self.results.read().await;
        let mut items: Vec<QuizResult> = results.iter().filter(|r| keep(r)).cloned().collect();
        items.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        items
    }
}

#[async_trait]
impl QuizResultRepository for InMemoryQuizResultRepository {
    async fn append(&self, result: QuizResult) -> AppResult<QuizResult> {
        self.results.write().await.push(result.clone());
        Ok(result)
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizResult>> {
        Ok(self.newest_first(|r| r.quiz_id == quiz_id).await)
    }

    async fn find_by_quizzes(&self, quiz_ids: &[String]) -> AppResult<Vec<QuizResult>> {
        Ok(self.newest_first(|r| quiz_ids.contains(&r.quiz_id)).await)
    }

    async fn find_all(&self) -> AppResult<Vec<QuizResult>> {
        Ok(self.newest_first(|_| true).await)
    }

    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<u64> {
        let mut results = self.results.write().await;
        let before = results.len();
        results.retain(|r| r.quiz_id != quiz_id);
        Ok((before - results.len()) as u64)
    }
}

pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::AlreadyExists(format!(
                "User with email '{}' already exists",
                user.email
            )));
        }
        users.insert(user.id_hex(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_lowercase();
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        let id = user.id_hex();
        if !users.contains_key(&id) {
            return Err(AppError::NotFound(format!("User with id '{}' not found", id)));
        }
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

/// 40 questions whose answer key cycles `0, 1, 2, 3, ...`.
pub fn questions() -> Vec<QuizQuestion> {
    (0..QUESTIONS_PER_QUIZ)
        .map(|i| QuizQuestion {
            question: format!("Which word fits blank {}?", i + 1),
            options: vec!["apt".into(), "brisk".into(), "candid".into(), "deft".into()],
            correct_answer: (i % 4) as u8,
            explanation: format!("Explanation {}", i + 1),
        })
        .collect()
}

/// Submitted answers with exactly `correct` right, matching `questions()`.
pub fn answers_with_correct(correct: usize) -> Vec<i64> {
    (0..QUESTIONS_PER_QUIZ)
        .map(|i| {
            let key = (i % 4) as i64;
            if i < correct { key } else { (key + 1) % 4 }
        })
        .collect()
}

pub fn make_quiz(title: &str, category: QuizCategory, difficulty: QuizDifficulty) -> Quiz {
    Quiz::new(
        title,
        "Practice set",
        questions(),
        DEFAULT_PASSING_SCORE,
        DEFAULT_TIME_LIMIT_MINUTES,
        category,
        difficulty,
        None,
    )
    .expect("quiz is valid")
}

pub fn make_user(name: &str, password: &str, role: UserRole) -> User {
    let mut user = User::new(
        name,
        &format!("{}@example.com", name.to_lowercase()),
        &hash_secret(password).expect("hash"),
        "5550100",
        "12 Library Road",
        &hash_secret("blue").expect("hash"),
    );
    user.role = role;
    user
}

pub struct TestContext {
    pub state: AppState,
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub results: Arc<InMemoryQuizResultRepository>,
    pub users: Arc<InMemoryUserRepository>,
}

impl TestContext {
    pub fn new(honor_expired: bool) -> Self {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let results = Arc::new(InMemoryQuizResultRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());

        let state = AppState::from_parts(
            test_config(honor_expired),
            quizzes.clone(),
            results.clone(),
            users.clone(),
        );

        Self {
            state,
            quizzes,
            results,
            users,
        }
    }

    /// Stores a user and returns a valid bearer token for them.
    pub async fn login_as(&self, user: User) -> String {
        let user = self.users.create(user).await.expect("create user");
        self.state.jwt_service.create_token(&user).expect("token")
    }
}
