use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Priority;

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    /// Identifier of the user who owns the task.
    pub user_id: i64,
    pub title: String,
    pub description: String,
    /// Free-form status text, stored as given.
    pub status: String,
    pub priority: Priority,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Payload of `POST /tasks`.
///
/// Everything except `user_id` is free-form; a missing field is the same as
/// an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

/// A validated task ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: Priority,
    pub deadline: Option<DateTime<Utc>>,
}

impl TaskInput {
    /// Checks the owner id and normalizes the priority.
    pub fn into_new_task(self) -> Result<NewTask, &'static str> {
        if self.user_id == 0 {
            return Err("missing user_id");
        }
        if self.user_id < 0 {
            return Err("invalid user_id");
        }
        Ok(NewTask {
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: Priority::parse_lenient(&self.priority),
            deadline: self.deadline,
        })
    }
}

/// Payload of `PUT /tasks/{id}`. Both fields have to be supplied together.
#[derive(Debug, Default, Deserialize)]
pub struct TaskUpdate {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

impl TaskUpdate {
    /// Returns the status and normalized priority, rejecting partial updates.
    pub fn into_fields(self) -> Result<(String, Priority), &'static str> {
        let status = self.status.filter(|s| !s.is_empty());
        let priority = self.priority.filter(|p| !p.is_empty());
        match (status, priority) {
            (Some(status), Some(priority)) => Ok((status, Priority::parse_lenient(&priority))),
            (None, None) => Err("nothing to update"),
            _ => Err("provide both status and priority"),
        }
    }
}
