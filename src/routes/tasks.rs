use actix_web::{web, HttpResponse};
use serde::Serialize;

use super::positive_id;
use crate::{
    error::{AppError, Resource},
    middleware::RequestId,
    models::{TaskInput, TaskUpdate},
    response::Envelope,
    storage::Storage,
};

const INVALID_TASK_ID: &str = "invalid task id";

#[derive(Debug, Serialize)]
struct SavedTask {
    id: i64,
    user_id: i64,
}

/// Creates a task for `user_id`.
///
/// Unknown priority strings are stored as `low`.
///
/// ## Responses:
/// - `200 OK`: `{"status":"OK","data":{"id","user_id"}}`.
/// - `400 Bad Request`: undecodable body, `missing user_id` or `invalid user_id`.
/// - `500 Internal Server Error`: store failure, including an unknown owner.
pub async fn save(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
    body: web::Json<TaskInput>,
) -> Result<HttpResponse, AppError> {
    let task = body
        .into_inner()
        .into_new_task()
        .map_err(|msg| AppError::BadRequest(msg.to_string()))?;

    let id = storage
        .save_task(&task)
        .await
        .map_err(|e| AppError::from_storage(e, Resource::Task))?;

    log::info!("[{}] task saved id={} user_id={}", request_id, id, task.user_id);
    Ok(Envelope::with_data(SavedTask {
        id,
        user_id: task.user_id,
    })
    .into_response())
}

pub async fn get(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = positive_id(&path, INVALID_TASK_ID)?;
    let task = storage
        .task(id)
        .await
        .map_err(|e| AppError::from_storage(e, Resource::Task))?;

    log::info!("[{}] got task {}", request_id, id);
    Ok(Envelope::with_data(task).into_response())
}

/// Replaces status and priority of a task. Both have to be present.
pub async fn update(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
    path: web::Path<String>,
    body: web::Json<TaskUpdate>,
) -> Result<HttpResponse, AppError> {
    let id = positive_id(&path, INVALID_TASK_ID)?;
    let (status, priority) = body
        .into_inner()
        .into_fields()
        .map_err(|msg| AppError::BadRequest(msg.to_string()))?;

    let task = storage
        .update_task_fields(id, &status, priority)
        .await
        .map_err(|e| AppError::from_storage(e, Resource::Task))?;

    log::info!(
        "[{}] task {} updated status={} priority={}",
        request_id,
        id,
        task.status,
        task.priority
    );
    Ok(Envelope::with_data(task).into_response())
}

pub async fn delete(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = positive_id(&path, INVALID_TASK_ID)?;
    storage
        .delete_task(id)
        .await
        .map_err(|e| AppError::from_storage(e, Resource::Task))?;

    log::info!("[{}] deleted task {}", request_id, id);
    Ok(Envelope::ok().into_response())
}

pub async fn list_all(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
) -> Result<HttpResponse, AppError> {
    let tasks = storage
        .list_all_tasks()
        .await
        .map_err(|e| AppError::from_storage(e, Resource::Task))?;

    log::info!("[{}] listed {} tasks", request_id, tasks.len());
    Ok(Envelope::with_data(tasks).into_response())
}

/// Lists the tasks owned by `user_id`; an unknown owner yields an empty list.
pub async fn list_by_user(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = positive_id(&path, "invalid user_id")?;
    let tasks = storage
        .list_tasks_by_user(user_id)
        .await
        .map_err(|e| AppError::from_storage(e, Resource::Task))?;

    log::info!("[{}] listed {} tasks of user {}", request_id, tasks.len(), user_id);
    Ok(Envelope::with_data(tasks).into_response())
}
