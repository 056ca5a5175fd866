use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Minimum number of characters accepted for a new password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A user row. The password hash only ever lives server-side: it is skipped
/// by serde and left empty by queries that do not select it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    #[serde(skip)]
    #[sqlx(default)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload of `POST /users`. Older clients send `name` instead of `user_name`.
#[derive(Debug, Default, Deserialize)]
pub struct UserInput {
    #[serde(default, alias = "name")]
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl UserInput {
    /// Trims the user name and email, then checks every field in a fixed
    /// order, returning the message for the first violation.
    pub fn normalize_and_check(&mut self) -> Result<(), &'static str> {
        self.user_name = self.user_name.trim().to_string();
        if self.user_name.is_empty() {
            return Err("user_name field is required");
        }
        self.email = self.email.trim().to_string();
        if self.email.is_empty() {
            return Err("email field is required");
        }
        if !is_valid_email(&self.email) {
            return Err("invalid email format");
        }
        if self.password.trim().is_empty() || self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("password must be at least 6 characters");
        }
        Ok(())
    }
}

/// Payload of `PUT /users/{user_name}`.
#[derive(Debug, Default, Deserialize)]
pub struct RenameInput {
    #[serde(default, alias = "name")]
    pub user_name: String,
}

/// `local@domain` with both parts present and no whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    !email.chars().any(char::is_whitespace) && validator::validate_email(email)
}
