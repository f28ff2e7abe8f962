use std::env;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

const MIN_JWT_SECRET_LEN: usize = 32;

const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:8080",
    "http://localhost:8081",
    "http://localhost:3000",
    "http://127.0.0.1:8080",
    "http://127.0.0.1:8081",
    "http://127.0.0.1:3000",
];

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    /// Expired but correctly signed tokens still authenticate (persistent sessions).
    pub jwt_honor_expired: bool,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Fails when the signing
    /// secret is missing or too short; every other key has a default.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                AppError::ConfigError("JWT_SECRET environment variable is required".to_string())
            })?;

        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AppError::ConfigError(format!(
                "JWT_SECRET is too short ({}). Must be at least {} characters",
                jwt_secret.len(),
                MIN_JWT_SECRET_LEN
            )));
        }

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect());

        Ok(Self {
            mongo_conn_string: lookup("MONGO_CONN_STRING")
                .unwrap_or_else(|| "mongodb://localhost:27017".to_string()),
            mongo_db_name: lookup("MONGO_DB_NAME").unwrap_or_else(|| "tutor-local".to_string()),
            web_server_host: lookup("WEB_SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            web_server_port: lookup("WEB_SERVER_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            jwt_secret: SecretString::from(jwt_secret),
            jwt_expiration_hours: lookup("JWT_EXPIRATION_HOURS")
                .and_then(|h| h.parse().ok())
                .unwrap_or(24 * 365),
            jwt_honor_expired: lookup("JWT_HONOR_EXPIRED")
                .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),
            cors_allowed_origins,
        })
    }

    pub fn jwt_secret_len(&self) -> usize {
        self.jwt_secret.expose_secret().len()
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "tutor-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8000,
            jwt_secret: SecretString::from("test_jwt_secret_key_that_is_long_enough".to_string()),
            jwt_expiration_hours: 1,
            jwt_honor_expired: true,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}
