use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use std::time::Duration;

use crate::{
    config::Config,
    errors::AppResult,
    models::domain::{Quiz, QuizResult, User},
};

pub const QUIZZES: &str = "quizzes";
pub const QUIZ_RESULTS: &str = "quiz_results";
pub const USERS: &str = "users";

/// Handle to the tutoring database. Cheap to clone; the driver pools connections.
#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ClientOptions::parse(&config.mongo_conn_string).await?;

        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.max_pool_size = Some(10);
        options.min_pool_size = Some(2);
        options.connect_timeout = Some(Duration::from_secs(5));
        options.server_selection_timeout = Some(Duration::from_secs(5));

        let db = Self {
            client: Client::with_options(options)?,
            db_name: config.mongo_db_name.clone(),
        };
        db.ping().await?;

        log::info!("Connected to MongoDB database '{}'", db.db_name);
        Ok(db)
    }

    pub fn quizzes(&self) -> Collection<Quiz> {
        self.collection(QUIZZES)
    }

    pub fn quiz_results(&self) -> Collection<QuizResult> {
        self.collection(QUIZ_RESULTS)
    }

    pub fn users(&self) -> Collection<User> {
        self.collection(USERS)
    }

    fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.client.database(&self.db_name).collection(name)
    }

    /// Round trip to the server; used at startup and by the readiness probe.
    pub async fn ping(&self) -> AppResult<()> {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
