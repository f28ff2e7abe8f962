use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{User, UserRole};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
}

impl PaginationMetadata {
    pub fn new(current_page: u64, items_per_page: u64, total_items: u64) -> Self {
        Self {
            current_page,
            total_pages: total_items.div_ceil(items_per_page.max(1)),
            total_items,
            items_per_page,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: PaginationMetadata,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, pagination: PaginationMetadata) -> Self {
        Self {
            success: true,
            data,
            pagination,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id_hex(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: UserDto,
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTokenResponse {
    pub success: bool,
    pub valid: bool,
    pub user: UserDto,
    pub token_expired: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_dto_hides_secrets() {
        let user = User::test_user("Nina", UserRole::Admin);
        let id = user.id_hex();

        let json = serde_json::to_value(UserDto::from(user)).unwrap();
        assert_eq!(json["_id"], id);
        assert_eq!(json["role"], 1);
        assert!(json.get("password_hash").is_none());
        assert!(json.get("security_answer_hash").is_none());
    }

    #[test]
    fn test_pagination_metadata_rounds_pages_up() {
        let meta = PaginationMetadata::new(2, 10, 21);
        assert_eq!(meta.total_pages, 3);

        let empty = PaginationMetadata::new(1, 10, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_verify_response_uses_camel_case() {
        let response = VerifyTokenResponse {
            success: true,
            valid: true,
            user: UserDto::from(User::test_user("Omar", UserRole::User)),
            token_expired: true,
        };
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["tokenExpired"], true);
    }
}
