use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    auth::claims::Claims,
    errors::{AppError, AppResult},
    models::domain::user::User,
};

const INVALID_TOKEN: &str = "Invalid token";

/// Outcome of checking a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenVerification {
    /// Signature and expiry both valid.
    Fresh(Claims),
    /// Signature valid but past `exp`; still honored for persistent sessions.
    Expired(Claims),
    Invalid(String),
}

impl TokenVerification {
    /// Claims plus whether they had expired, or 401 for anything invalid.
    pub fn into_principal(self) -> AppResult<(Claims, bool)> {
        match self {
            TokenVerification::Fresh(claims) => Ok((claims, false)),
            TokenVerification::Expired(claims) => Ok((claims, true)),
            TokenVerification::Invalid(msg) => Err(AppError::Unauthorized(msg)),
        }
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expired_validation: Validation,
    expiration_hours: i64,
    honor_expired: bool,
}

impl JwtService {
    pub fn new(secret: &SecretString, expiration_hours: i64, honor_expired: bool) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        // Expiry is exact: a token one second past `exp` is already expired.
        let mut validation = Validation::default();
        validation.leeway = 0;

        let mut expired_validation = Validation::default();
        expired_validation.leeway = 0;
        expired_validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            validation,
            expired_validation,
            expiration_hours,
            honor_expired,
        }
    }

    pub fn create_token(&self, user: &User) -> AppResult<String> {
        let claims = Claims::new(user, self.expiration_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to create JWT: {}", e)))
    }

    /// Never fails: every malformed or tampered input maps to `Invalid`.
    pub fn verify(&self, token: &str) -> TokenVerification {
        let token = token.trim();
        if token.is_empty() {
            return TokenVerification::Invalid("Token is required".to_string());
        }

        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => TokenVerification::Fresh(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) && self.honor_expired => {
                // The signature was already checked before expiry was evaluated.
                match decode::<Claims>(token, &self.decoding_key, &self.expired_validation) {
                    Ok(data) => TokenVerification::Expired(data.claims),
                    Err(e) => {
                        log::warn!("Expired token could not be decoded: {}", e);
                        TokenVerification::Invalid(INVALID_TOKEN.to_string())
                    }
                }
            }
            Err(e) => {
                log::debug!("Token rejected: {}", e);
                TokenVerification::Invalid(INVALID_TOKEN.to_string())
            }
        }
    }
}
