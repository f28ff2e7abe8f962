use actix_web::{get, post, put, web, HttpResponse};
use serde_json::json;

use crate::{
    app_state::AppState,
    auth::{AdminUser, AuthMiddleware, AuthenticatedUser},
    errors::AppError,
    models::dto::{
        request::{
            ForgotPasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
            VerifyTokenRequest,
        },
        response::{ApiResponse, AuthResponse, MessageResponse, UserDto, VerifyTokenResponse},
    },
};

#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.auth_service.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        "User registered successfully",
        UserDto::from(user),
    )))
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let session = state.auth_service.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        message: "Logged in successfully".to_string(),
        user: session.user.into(),
        token: session.token,
    }))
}

#[post("/admin-login")]
pub async fn admin_login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let session = state.auth_service.admin_login(request.into_inner()).await?;
    log::info!("Admin {} logged in", session.user.id_hex());
    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        message: "Admin logged in successfully".to_string(),
        user: session.user.into(),
        token: session.token,
    }))
}

/// Mounted at `/forgot-password` and at the older `/ForgetPassword` path.
pub async fn forgot_password(
    state: web::Data<AppState>,
    request: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    state.auth_service.forgot_password(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Password reset successfully")))
}

#[post("/verify-token")]
pub async fn verify_token(
    state: web::Data<AppState>,
    request: web::Json<VerifyTokenRequest>,
) -> Result<HttpResponse, AppError> {
    let (user, token_expired) = state.auth_service.verify_token(&request.token).await?;
    Ok(HttpResponse::Ok().json(VerifyTokenResponse {
        success: true,
        valid: true,
        user: user.into(),
        token_expired,
    }))
}

/// Tokens are stateless; the client discards its copy.
#[post("/logout")]
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse::new("Logged out successfully"))
}

#[get("/user-auth", wrap = "AuthMiddleware")]
pub async fn user_auth(auth: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "ok": true, "tokenExpired": auth.token_expired }))
}

#[get("/admin-auth")]
pub async fn admin_auth(_admin: AdminUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "ok": true }))
}

#[put("/profile", wrap = "AuthMiddleware")]
pub async fn update_profile(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .auth_service
        .update_profile(&auth.claims, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        "Profile updated successfully",
        UserDto::from(user),
    )))
}
