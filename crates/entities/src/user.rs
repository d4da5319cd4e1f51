//! User-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user, including the stored password hash.
///
/// This type is never serialized into API responses. Use [`User::to_public`]
/// or [`UserSummary`] to build a client-facing projection.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Email address, unique across users.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user from an already-hashed password.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds the public projection of this user.
    pub fn to_public(&self) -> UserPublic {
        UserPublic {
            id: self.id,
            email: self.email.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Builds the summary embedded in order views.
    pub fn to_summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// Client-facing view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User fields joined into an order view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("driver@example.com", "$argon2id$v=19$stub");

        assert_eq!(user.email, "driver@example.com");
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_public_projection_has_no_password() {
        let user = User::new("driver@example.com", "$argon2id$v=19$secret-hash");
        let json = serde_json::to_value(user.to_public()).unwrap();

        assert_eq!(json["email"], "driver@example.com");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("secret-hash"));
    }

    #[test]
    fn test_summary_fields() {
        let user = User::new("driver@example.com", "hash");
        let json = serde_json::to_value(user.to_summary()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();

        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"id"));
        assert!(keys.contains(&"email"));
    }
}
