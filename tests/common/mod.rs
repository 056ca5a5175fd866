#![allow(dead_code)]

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test, web, App,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};

use task_manager::{
    middleware::RequestIdMiddleware,
    models::{NewTask, Priority, Project, Task, User},
    routes::{self, HealthCheck},
    storage::{MemoryStorage, Storage, StorageError, StorageResult},
};

/// Builds the full route table over `storage`, the way `startup::run` does.
pub async fn init_app(
    storage: Arc<dyn Storage>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    init_app_with_health(storage, HealthCheck::default()).await
}

pub async fn init_app_with_health(
    storage: Arc<dyn Storage>,
    health: HealthCheck,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::from(storage))
            .app_data(web::Data::new(health))
            .wrap(actix_web::middleware::NormalizePath::trim())
            .wrap(RequestIdMiddleware)
            .configure(routes::config),
    )
    .await
}

pub fn memory() -> Arc<dyn Storage> {
    Arc::new(MemoryStorage::new())
}

/// Sends `req` and returns the status with the decoded JSON body
/// (`Value::Null` for an empty or non-JSON body).
pub async fn call<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Registers a user and returns its id.
pub async fn create_user<S, B>(app: &S, user_name: &str, email: &str, password: &str) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({"user_name": user_name, "email": email, "password": password}))
        .to_request();
    let (status, body) = call(app, req).await;
    assert_eq!(status, StatusCode::OK, "user creation failed: {}", body);
    body["data"]["id"].as_i64().unwrap()
}

/// A store whose every call fails with an internal error. `ping` can be made
/// to hang for a while instead.
#[derive(Debug, Default)]
pub struct BrokenStorage {
    pub ping_delay: Option<Duration>,
}

fn broken<T>(op: &'static str) -> StorageResult<T> {
    Err(StorageError::internal(op, "connection refused"))
}

#[async_trait]
impl Storage for BrokenStorage {
    async fn ping(&self) -> StorageResult<()> {
        if let Some(delay) = self.ping_delay {
            tokio::time::sleep(delay).await;
            return Ok(());
        }
        broken("storage.broken.ping")
    }

    async fn save_user(&self, _: &str, _: &str, _: &str) -> StorageResult<i64> {
        broken("storage.broken.save_user")
    }

    async fn user(&self, _: &str) -> StorageResult<User> {
        broken("storage.broken.user")
    }

    async fn update_user_name(&self, _: &str, _: &str) -> StorageResult<User> {
        broken("storage.broken.update_user_name")
    }

    async fn delete_user(&self, _: &str) -> StorageResult<()> {
        broken("storage.broken.delete_user")
    }

    async fn list_all_users(&self) -> StorageResult<Vec<User>> {
        broken("storage.broken.list_all_users")
    }

    async fn save_task(&self, _: &NewTask) -> StorageResult<i64> {
        broken("storage.broken.save_task")
    }

    async fn task(&self, _: i64) -> StorageResult<Task> {
        broken("storage.broken.task")
    }

    async fn update_task_fields(&self, _: i64, _: &str, _: Priority) -> StorageResult<Task> {
        broken("storage.broken.update_task_fields")
    }

    async fn delete_task(&self, _: i64) -> StorageResult<()> {
        broken("storage.broken.delete_task")
    }

    async fn list_all_tasks(&self) -> StorageResult<Vec<Task>> {
        broken("storage.broken.list_all_tasks")
    }

    async fn list_tasks_by_user(&self, _: i64) -> StorageResult<Vec<Task>> {
        broken("storage.broken.list_tasks_by_user")
    }

    async fn save_project(&self, _: i64, _: &str, _: &str) -> StorageResult<i64> {
        broken("storage.broken.save_project")
    }

    async fn project(&self, _: &str) -> StorageResult<Project> {
        broken("storage.broken.project")
    }

    async fn delete_project(&self, _: i64) -> StorageResult<()> {
        broken("storage.broken.delete_project")
    }

    async fn list_all_projects(&self) -> StorageResult<Vec<Project>> {
        broken("storage.broken.list_all_projects")
    }
}
