pub mod quiz_repository;
pub mod quiz_result_repository;
pub mod user_repository;

pub use quiz_repository::{MongoQuizRepository, QuizFilter, QuizRepository};
pub use quiz_result_repository::{MongoQuizResultRepository, QuizResultRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
