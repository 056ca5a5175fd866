//! In-memory store with the same contract as the Postgres one: unique user
//! names, emails and project names, owner references checked on insert, and
//! cascading deletes of a user's tasks and projects.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Storage, StorageError, StorageResult};
use crate::models::{NewTask, Priority, Project, Task, User};

/// Thread-safe in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    projects: BTreeMap<i64, Project>,
    last_id: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn user_id_by_name(&self, name: &str) -> Option<i64> {
        self.users
            .values()
            .find(|u| u.user_name == name)
            .map(|u| u.id)
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self, op: &'static str) -> StorageResult<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|e| StorageError::internal(op, e.to_string()))
    }

    fn write(&self, op: &'static str) -> StorageResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|e| StorageError::internal(op, e.to_string()))
    }
}

fn public_user(user: &User) -> User {
    User {
        password_hash: None,
        ..user.clone()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> StorageResult<()> {
        self.read("storage.memory.ping").map(|_| ())
    }

    async fn save_user(
        &self,
        user_name: &str,
        email: &str,
        password_hash: &str,
    ) -> StorageResult<i64> {
        let mut state = self.write("storage.memory.save_user")?;
        if state
            .users
            .values()
            .any(|u| u.user_name == user_name || u.email == email)
        {
            return Err(StorageError::AlreadyExists);
        }
        let id = state.next_id();
        state.users.insert(
            id,
            User {
                id,
                user_name: user_name.to_string(),
                email: email.to_string(),
                password_hash: Some(password_hash.to_string()),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn user(&self, name_or_email: &str) -> StorageResult<User> {
        let state = self.read("storage.memory.user")?;
        state
            .users
            .values()
            .find(|u| u.user_name == name_or_email)
            .or_else(|| state.users.values().find(|u| u.email == name_or_email))
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn update_user_name(&self, name: &str, new_name: &str) -> StorageResult<User> {
        let mut state = self.write("storage.memory.update_user_name")?;
        let id = state.user_id_by_name(name).ok_or(StorageError::NotFound)?;
        if name != new_name && state.user_id_by_name(new_name).is_some() {
            return Err(StorageError::AlreadyExists);
        }
        let user = state.users.get_mut(&id).ok_or(StorageError::NotFound)?;
        user.user_name = new_name.to_string();
        Ok(public_user(user))
    }

    async fn delete_user(&self, name: &str) -> StorageResult<()> {
        let mut state = self.write("storage.memory.delete_user")?;
        let id = state.user_id_by_name(name).ok_or(StorageError::NotFound)?;
        state.users.remove(&id);
        state.tasks.retain(|_, t| t.user_id != id);
        state.projects.retain(|_, p| p.owner_id != id);
        Ok(())
    }

    async fn list_all_users(&self) -> StorageResult<Vec<User>> {
        let state = self.read("storage.memory.list_all_users")?;
        Ok(state.users.values().map(public_user).collect())
    }

    async fn save_task(&self, task: &NewTask) -> StorageResult<i64> {
        let mut state = self.write("storage.memory.save_task")?;
        if !state.users.contains_key(&task.user_id) {
            return Err(StorageError::internal(
                "storage.memory.save_task",
                format!("user {} does not exist", task.user_id),
            ));
        }
        let id = state.next_id();
        state.tasks.insert(
            id,
            Task {
                id,
                user_id: task.user_id,
                title: task.title.clone(),
                description: task.description.clone(),
                status: task.status.clone(),
                priority: task.priority,
                deadline: task.deadline,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn task(&self, id: i64) -> StorageResult<Task> {
        let state = self.read("storage.memory.task")?;
        state.tasks.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn update_task_fields(
        &self,
        id: i64,
        status: &str,
        priority: Priority,
    ) -> StorageResult<Task> {
        let mut state = self.write("storage.memory.update_task_fields")?;
        let task = state.tasks.get_mut(&id).ok_or(StorageError::NotFound)?;
        task.status = status.to_string();
        task.priority = priority;
        Ok(task.clone())
    }

    async fn delete_task(&self, id: i64) -> StorageResult<()> {
        let mut state = self.write("storage.memory.delete_task")?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    async fn list_all_tasks(&self) -> StorageResult<Vec<Task>> {
        let state = self.read("storage.memory.list_all_tasks")?;
        Ok(state.tasks.values().cloned().collect())
    }

    async fn list_tasks_by_user(&self, user_id: i64) -> StorageResult<Vec<Task>> {
        let state = self.read("storage.memory.list_tasks_by_user")?;
        Ok(state
            .tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save_project(
        &self,
        owner_id: i64,
        name: &str,
        description: &str,
    ) -> StorageResult<i64> {
        let mut state = self.write("storage.memory.save_project")?;
        if !state.users.contains_key(&owner_id) {
            return Err(StorageError::internal(
                "storage.memory.save_project",
                format!("user {} does not exist", owner_id),
            ));
        }
        if state.projects.values().any(|p| p.name == name) {
            return Err(StorageError::AlreadyExists);
        }
        let id = state.next_id();
        let now = Utc::now();
        state.projects.insert(
            id,
            Project {
                id,
                owner_id,
                name: name.to_string(),
                description: description.to_string(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn project(&self, name: &str) -> StorageResult<Project> {
        let state = self.read("storage.memory.project")?;
        state
            .projects
            .values()
            .find(|p| p.name == name)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn delete_project(&self, owner_id: i64) -> StorageResult<()> {
        let mut state = self.write("storage.memory.delete_project")?;
        let before = state.projects.len();
        state.projects.retain(|_, p| p.owner_id != owner_id);
        if state.projects.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn list_all_projects(&self) -> StorageResult<Vec<Project>> {
        let state = self.read("storage.memory.list_all_projects")?;
        Ok(state.projects.values().cloned().collect())
    }
}
