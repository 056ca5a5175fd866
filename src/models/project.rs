use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project owned by a user. Names are unique across all owners.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload of `POST /projects`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProjectInput {
    #[serde(default)]
    #[validate(range(min = 1))]
    pub owner_id: i64,

    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
}
