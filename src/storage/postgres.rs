use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use std::time::Duration;

use super::{Storage, StorageError, StorageResult};
use crate::models::{NewTask, Priority, Project, Task, User};

/// SQLSTATE reported by Postgres for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Postgres-backed store over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PgStorage {
    pool: PgPool,
}

/// Raw `tasks` row; the priority is still the smallint code.
#[derive(Debug, FromRow)]
struct TaskRow {
    id: i64,
    user_id: i64,
    title: String,
    description: String,
    status: String,
    priority: i16,
    deadline: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            status: row.status,
            priority: Priority::from_code(row.priority),
            deadline: row.deadline,
            created_at: row.created_at,
        }
    }
}

fn classify(op: &'static str, err: sqlx::Error) -> StorageError {
    if matches!(err, sqlx::Error::RowNotFound) {
        return StorageError::NotFound;
    }
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StorageError::AlreadyExists;
        }
    }
    StorageError::internal(op, err)
}

fn expect_affected(rows_affected: u64) -> StorageResult<()> {
    if rows_affected == 0 {
        return Err(StorageError::NotFound);
    }
    Ok(())
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .map_err(|e| StorageError::internal("storage.postgres.connect", e))?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> StorageResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::internal("storage.postgres.migrate", e))
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn ping(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::internal("storage.postgres.ping", e))?;
        Ok(())
    }

    async fn save_user(
        &self,
        user_name: &str,
        email: &str,
        password_hash: &str,
    ) -> StorageResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (user_name, email, password_hash) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(user_name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify("storage.postgres.save_user", e))
    }

    async fn user(&self, name_or_email: &str) -> StorageResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, user_name, email, password_hash, created_at
             FROM users
             WHERE user_name = $1 OR email = $1
             ORDER BY (user_name = $1) DESC
             LIMIT 1",
        )
        .bind(name_or_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify("storage.postgres.user", e))
    }

    async fn update_user_name(&self, name: &str, new_name: &str) -> StorageResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET user_name = $2 WHERE user_name = $1
             RETURNING id, user_name, email, created_at",
        )
        .bind(name)
        .bind(new_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify("storage.postgres.update_user_name", e))
    }

    async fn delete_user(&self, name: &str) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_name = $1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| classify("storage.postgres.delete_user", e))?;
        expect_affected(result.rows_affected())
    }

    async fn list_all_users(&self) -> StorageResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT id, user_name, email, created_at FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify("storage.postgres.list_all_users", e))
    }

    async fn save_task(&self, task: &NewTask) -> StorageResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO tasks (user_id, title, description, status, priority, deadline)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(task.user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .bind(task.priority.code())
        .bind(task.deadline)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify("storage.postgres.save_task", e))
    }

    async fn task(&self, id: i64) -> StorageResult<Task> {
        sqlx::query_as::<_, TaskRow>(
            "SELECT id, user_id, title, description, status, priority, deadline, created_at
             FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map(Task::from)
        .map_err(|e| classify("storage.postgres.task", e))
    }

    async fn update_task_fields(
        &self,
        id: i64,
        status: &str,
        priority: Priority,
    ) -> StorageResult<Task> {
        sqlx::query_as::<_, TaskRow>(
            "UPDATE tasks SET status = $1, priority = $2
             WHERE id = $3
             RETURNING id, user_id, title, description, status, priority, deadline, created_at",
        )
        .bind(status)
        .bind(priority.code())
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map(Task::from)
        .map_err(|e| classify("storage.postgres.update_task_fields", e))
    }

    async fn delete_task(&self, id: i64) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| classify("storage.postgres.delete_task", e))?;
        expect_affected(result.rows_affected())
    }

    async fn list_all_tasks(&self) -> StorageResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, user_id, title, description, status, priority, deadline, created_at
             FROM tasks ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify("storage.postgres.list_all_tasks", e))?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn list_tasks_by_user(&self, user_id: i64) -> StorageResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, user_id, title, description, status, priority, deadline, created_at
             FROM tasks WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify("storage.postgres.list_tasks_by_user", e))?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn save_project(
        &self,
        owner_id: i64,
        name: &str,
        description: &str,
    ) -> StorageResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO project (owner_id, name, description) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(owner_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify("storage.postgres.save_project", e))
    }

    async fn project(&self, name: &str) -> StorageResult<Project> {
        sqlx::query_as::<_, Project>(
            "SELECT id, owner_id, name, description, created_at, updated_at
             FROM project WHERE name = $1",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify("storage.postgres.project", e))
    }

    async fn delete_project(&self, owner_id: i64) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM project WHERE owner_id = $1")
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| classify("storage.postgres.delete_project", e))?;
        expect_affected(result.rows_affected())
    }

    async fn list_all_projects(&self) -> StorageResult<Vec<Project>> {
        sqlx::query_as::<_, Project>(
            "SELECT id, owner_id, name, description, created_at, updated_at
             FROM project ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify("storage.postgres.list_all_projects", e))
    }
}
