use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoQuizRepository, MongoQuizResultRepository, MongoUserRepository, QuizRepository,
        QuizResultRepository, UserRepository,
    },
    services::{AuthService, QuizService},
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub quiz_service: Arc<QuizService>,
    pub jwt_service: Arc<JwtService>,
    pub config: Arc<Config>,
    /// `None` when the state was built over non-Mongo repositories.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let result_repository = Arc::new(MongoQuizResultRepository::new(&db));
        result_repository.ensure_indexes().await?;

        let mut state = Self::from_parts(config, quiz_repository, result_repository, user_repository);
        state.db = Some(db);
        Ok(state)
    }

    /// Wires services over the given repositories.
    pub fn from_parts(
        config: Config,
        quizzes: Arc<dyn QuizRepository>,
        results: Arc<dyn QuizResultRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
            config.jwt_honor_expired,
        ));
        if config.jwt_honor_expired {
            log::warn!("Expired session tokens are honored (JWT_HONOR_EXPIRED=true)");
        }

        Self {
            auth_service: Arc::new(AuthService::new(users, Arc::clone(&jwt_service))),
            quiz_service: Arc::new(QuizService::new(quizzes, results)),
            jwt_service,
            config: Arc::new(config),
            db: None,
        }
    }
}
