use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AdminUser,
    errors::AppError,
    middleware::get_request_id,
    models::dto::{
        quiz_dto::QuizDto,
        request::{
            ActiveQuizQuery, CreateQuizRequest, GetQuizQuery, PageParams, QuizListQuery,
            SubmitQuizRequest, UpdateQuizRequest,
        },
        response::{ApiResponse, MessageResponse, PaginatedResponse},
    },
    repositories::QuizFilter,
};

// Fixed paths are registered before `/{id}` so they are not captured by it.

#[get("/active")]
pub async fn get_active_quizzes(
    state: web::Data<AppState>,
    query: web::Query<ActiveQuizQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let filter = QuizFilter {
        is_active: Some(true),
        category: query.category,
        difficulty: query.difficulty,
    };
    let quizzes = state.quiz_service.active_quizzes(filter).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(quizzes)))
}

#[get("/all-results")]
pub async fn get_all_results(
    state: web::Data<AppState>,
    query: web::Query<PageParams>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let (results, pagination) = state.quiz_service.all_results(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(results, pagination)))
}

#[get("/stats")]
pub async fn get_stats(state: web::Data<AppState>, _admin: AdminUser) -> Result<HttpResponse, AppError> {
    let report = state.quiz_service.stats().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(report)))
}

#[get("")]
pub async fn list_quizzes(
    state: web::Data<AppState>,
    query: web::Query<QuizListQuery>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let filter = QuizFilter {
        is_active: query.is_active,
        category: query.category,
        difficulty: query.difficulty,
    };
    let (quizzes, pagination) = state
        .quiz_service
        .list_quizzes(&filter, query.page_params())
        .await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(quizzes, pagination)))
}

#[post("")]
pub async fn create_quiz(
    state: web::Data<AppState>,
    request: web::Json<CreateQuizRequest>,
    admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .create_quiz(request.into_inner(), &admin.0.id_hex())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        "Quiz created successfully",
        QuizDto::from(quiz),
    )))
}

#[post("/{id}/submit")]
pub async fn submit_quiz(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitQuizRequest>,
) -> Result<HttpResponse, AppError> {
    log::debug!(
        "[{}] submission for quiz {}",
        get_request_id(&req).unwrap_or_default(),
        id
    );
    let outcome = state.quiz_service.submit(&id, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message("Quiz submitted successfully", outcome)))
}

#[get("/{id}/results")]
pub async fn get_quiz_results(
    state: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<PageParams>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let page = state.quiz_service.quiz_results(&id, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// Students get the quiz without its answer key; `includeAnswers=true`
/// is honored for administrators only.
#[get("/{id}")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<GetQuizQuery>,
    admin: Option<AdminUser>,
) -> Result<HttpResponse, AppError> {
    if query.include_answers && admin.is_none() {
        return Err(AppError::Forbidden(
            "Admin privileges required to view answers".to_string(),
        ));
    }
    let quiz = state.quiz_service.get_quiz(&id, query.include_answers).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(quiz)))
}

#[put("/{id}")]
pub async fn update_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuizRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.update_quiz(&id, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        "Quiz updated successfully",
        QuizDto::from(quiz),
    )))
}

#[delete("/{id}")]
pub async fn delete_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete_quiz(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Quiz deleted successfully")))
}
