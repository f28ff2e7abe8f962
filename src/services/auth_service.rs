use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{
        password::{hash_secret, verify_secret},
        Claims, JwtService,
    },
    errors::{AppError, AppResult},
    models::{
        domain::User,
        dto::request::{ForgotPasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest},
    },
    repositories::UserRepository,
};

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
}

/// Outcome of a successful login: the user and a fresh token.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Security answers are compared case- and whitespace-insensitively.
fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: Arc<JwtService>) -> Self {
        Self { users, jwt }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        request.validate()?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::AlreadyExists(
                "User already registered. Please log in.".to_string(),
            ));
        }

        let password_hash = hash_secret(&request.password)?;
        let answer_hash = hash_secret(&normalize_answer(&request.answer))?;
        let user = User::new(
            request.name.trim(),
            request.email.trim(),
            &password_hash,
            request.phone.trim(),
            request.address.trim(),
            &answer_hash,
        );

        let user = self.users.create(user).await?;
        log::info!("Registered user {}", user.id_hex());
        Ok(user)
    }

    async fn check_credentials(&self, request: &LoginRequest, unknown: &str) -> AppResult<User> {
        request.validate()?;

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::NotFound(unknown.to_string()))?;

        if !verify_secret(&request.password, &user.password_hash)? {
            return Err(AppError::Unauthorized("Incorrect password".to_string()));
        }
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<Session> {
        let user = self.check_credentials(&request, "User not registered").await?;
        let token = self.jwt.create_token(&user)?;
        Ok(Session { user, token })
    }

    /// Like `login`, but the stored role must be admin. The role is checked
    /// before the password.
    pub async fn admin_login(&self, request: LoginRequest) -> AppResult<Session> {
        request.validate()?;

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

        if !user.is_admin() {
            log::warn!("Non-admin {} attempted admin login", user.id_hex());
            return Err(AppError::Forbidden(
                "Access denied. Admin privileges required.".to_string(),
            ));
        }
        if !verify_secret(&request.password, &user.password_hash)? {
            return Err(AppError::Unauthorized("Incorrect password".to_string()));
        }

        let token = self.jwt.create_token(&user)?;
        Ok(Session { user, token })
    }

    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> AppResult<()> {
        request.validate()?;

        let wrong = || AppError::NotFound("Wrong email or answer".to_string());
        let mut user = self.users.find_by_email(&request.email).await?.ok_or_else(wrong)?;

        if !verify_secret(&normalize_answer(&request.answer), &user.security_answer_hash)? {
            return Err(wrong());
        }

        user.password_hash = hash_secret(&request.new_password)?;
        self.users.update(user).await?;
        Ok(())
    }

    /// Verify a session token and resolve it to a stored user.
    ///
    /// Returns the user and whether the token had expired. Expired tokens
    /// only pass when the verifier honors them.
    pub async fn verify_token(&self, token: &str) -> AppResult<(User, bool)> {
        if token.trim().is_empty() {
            return Err(AppError::ValidationError("Token is required".to_string()));
        }

        let (claims, expired) = self.jwt.verify(token).into_principal()?;

        let user = self.current_user(&claims).await?;
        Ok((user, expired))
    }

    /// The stored user behind a token's subject.
    pub async fn current_user(&self, claims: &Claims) -> AppResult<User> {
        self.users
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))
    }

    /// The role is read from the stored user, not from the token.
    pub async fn require_admin(&self, claims: &Claims) -> AppResult<User> {
        let user = self.current_user(claims).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden(
                "Unauthorized Access - Admin privileges required".to_string(),
            ));
        }
        Ok(user)
    }

    pub async fn update_profile(&self, claims: &Claims, request: UpdateProfileRequest) -> AppResult<User> {
        request.validate()?;
        let mut user = self.current_user(claims).await?;

        if let Some(email) = request.email {
            let email = email.trim().to_lowercase();
            if email != user.email {
                if self.users.find_by_email(&email).await?.is_some() {
                    return Err(AppError::AlreadyExists("Email is already in use".to_string()));
                }
                user.email = email;
            }
        }
        if let Some(password) = request.password {
            user.password_hash = hash_secret(&password)?;
        }
        if let Some(name) = request.name {
            user.name = name.trim().to_string();
        }
        if let Some(phone) = request.phone {
            user.phone = phone.trim().to_string();
        }
        if let Some(address) = request.address {
            user.address = address.trim().to_string();
        }

        self.users.update(user).await
    }
}
