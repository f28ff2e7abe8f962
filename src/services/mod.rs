pub mod auth_service;
pub mod grading;
pub mod quiz_service;
pub mod stats;

pub use auth_service::AuthService;
pub use quiz_service::QuizService;
