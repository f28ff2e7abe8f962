use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Stored as `0` / `1` to stay compatible with existing user documents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl From<UserRole> for i32 {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::User => 0,
            UserRole::Admin => 1,
        }
    }
}

impl TryFrom<i32> for UserRole {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(UserRole::User),
            1 => Ok(UserRole::Admin),
            other => Err(format!("unknown user role {}", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub security_answer_hash: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        name: &str,
        email: &str,
        password_hash: &str,
        phone: &str,
        address: &str,
        security_answer_hash: &str,
    ) -> Self {
        User {
            id: Some(ObjectId::new()),
            name: name.to_string(),
            email: email.to_lowercase(),
            password_hash: password_hash.to_string(),
            phone: phone.to_string(),
            address: address.to_string(),
            security_answer_hash: security_answer_hash.to_string(),
            role: UserRole::User,
            created_at: Some(Utc::now()),
        }
    }

    /// Hex form of the document id, used as the token subject.
    pub fn id_hex(&self) -> String {
        self.id.map(|oid| oid.to_hex()).unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
impl User {
    pub fn test_user(name: &str, role: UserRole) -> Self {
        let mut user = User::new(
            name,
            &format!("{}@example.com", name.to_lowercase()),
            "hash",
            "0000000000",
            "1 Test Street",
            "answer-hash",
        );
        user.role = role;
        user
    }
}
