pub mod auth_handler;
pub mod health_handler;
pub mod quiz_handler;

use actix_web::{web, HttpRequest};

use crate::errors::AppError;

fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::ValidationError(err.to_string()).into()
}

fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::ValidationError(err.to_string()).into()
}

/// Registers every route. Shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(health_handler::health_check)
        .service(health_handler::health_check_ready)
        .service(health_handler::health_check_live)
        .service(
            web::scope("/api/auth")
                .service(auth_handler::register)
                .service(auth_handler::login)
                .service(auth_handler::admin_login)
                .route("/forgot-password", web::post().to(auth_handler::forgot_password))
                .route("/ForgetPassword", web::post().to(auth_handler::forgot_password))
                .service(auth_handler::verify_token)
                .service(auth_handler::logout)
                .service(auth_handler::user_auth)
                .service(auth_handler::admin_auth)
                .service(auth_handler::update_profile),
        )
        .service(
            web::scope("/api/quizzes")
                .service(quiz_handler::get_active_quizzes)
                .service(quiz_handler::get_all_results)
                .service(quiz_handler::get_stats)
                .service(quiz_handler::list_quizzes)
                .service(quiz_handler::create_quiz)
                .service(quiz_handler::submit_quiz)
                .service(quiz_handler::get_quiz_results)
                .service(quiz_handler::get_quiz)
                .service(quiz_handler::update_quiz)
                .service(quiz_handler::delete_quiz),
        );
}
