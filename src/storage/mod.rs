//!
//! # Storage
//!
//! The [`Storage`] trait is the only way handlers reach persisted data. Each
//! call is a single statement against the backing store; there are no
//! transactions spanning calls.
//!
//! Implementations classify failures exactly once: a violated uniqueness
//! constraint becomes [`StorageError::AlreadyExists`], a missing row (or a
//! statement that affected none) becomes [`StorageError::NotFound`], and
//! everything else is wrapped as [`StorageError::Internal`] together with the
//! name of the failing operation.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewTask, Priority, Project, Task, User};

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced by [`Storage`] implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No row matched the lookup, or a delete/update affected zero rows.
    #[error("not found")]
    NotFound,

    /// A unique constraint rejected the write.
    #[error("already exists")]
    AlreadyExists,

    /// Any other failure, tagged with the operation that hit it.
    #[error("{op}: {source}")]
    Internal {
        op: &'static str,
        #[source]
        source: BoxError,
    },
}

impl StorageError {
    pub fn internal(op: &'static str, err: impl Into<BoxError>) -> Self {
        StorageError::Internal {
            op,
            source: err.into(),
        }
    }
}

/// Persistence contract shared by the Postgres and in-memory stores.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Connectivity probe used by the health check.
    async fn ping(&self) -> StorageResult<()>;

    /// Inserts a user and returns its id. The caller hashes the password.
    async fn save_user(&self, user_name: &str, email: &str, password_hash: &str)
        -> StorageResult<i64>;

    /// Looks a user up by user name or email, preferring a user name match.
    /// The returned user carries its password hash.
    async fn user(&self, name_or_email: &str) -> StorageResult<User>;

    async fn update_user_name(&self, name: &str, new_name: &str) -> StorageResult<User>;

    async fn delete_user(&self, name: &str) -> StorageResult<()>;

    async fn list_all_users(&self) -> StorageResult<Vec<User>>;

    async fn save_task(&self, task: &NewTask) -> StorageResult<i64>;

    async fn task(&self, id: i64) -> StorageResult<Task>;

    /// Overwrites status and priority and returns the updated row.
    async fn update_task_fields(&self, id: i64, status: &str, priority: Priority)
        -> StorageResult<Task>;

    async fn delete_task(&self, id: i64) -> StorageResult<()>;

    async fn list_all_tasks(&self) -> StorageResult<Vec<Task>>;

    async fn list_tasks_by_user(&self, user_id: i64) -> StorageResult<Vec<Task>>;

    async fn save_project(&self, owner_id: i64, name: &str, description: &str)
        -> StorageResult<i64>;

    async fn project(&self, name: &str) -> StorageResult<Project>;

    /// Removes every project of the owner.
    async fn delete_project(&self, owner_id: i64) -> StorageResult<()>;

    async fn list_all_projects(&self) -> StorageResult<Vec<Project>>;
}
