use actix_web::{web, HttpResponse};
use serde::Serialize;
use validator::Validate;

use super::{non_empty, positive_id};
use crate::{
    error::{AppError, Resource},
    middleware::RequestId,
    models::ProjectInput,
    response::Envelope,
    storage::Storage,
};

#[derive(Debug, Serialize)]
struct SavedProject {
    id: i64,
    owner_id: i64,
    name: String,
}

/// Creates a project for an existing owner. Project names are unique.
///
/// ## Responses:
/// - `200 OK`: `{"status":"OK","data":{"id","owner_id","name"}}`.
/// - `400 Bad Request`: undecodable body or `<field> is not valid`.
/// - `409 Conflict`: `project already exists`.
pub async fn save(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
    body: web::Json<ProjectInput>,
) -> Result<HttpResponse, AppError> {
    let mut input = body.into_inner();
    input.name = input.name.trim().to_string();
    input.validate()?;

    let id = storage
        .save_project(input.owner_id, &input.name, &input.description)
        .await
        .map_err(|e| AppError::from_storage(e, Resource::Project))?;

    log::info!("[{}] project saved id={} owner_id={}", request_id, id, input.owner_id);
    Ok(Envelope::with_data(SavedProject {
        id,
        owner_id: input.owner_id,
        name: input.name,
    })
    .into_response())
}

pub async fn get(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let name = non_empty(&path, "name is empty")?;
    let project = storage
        .project(name)
        .await
        .map_err(|e| AppError::from_storage(e, Resource::Project))?;

    log::info!("[{}] got project {}", request_id, project.name);
    Ok(Envelope::with_data(project).into_response())
}

pub async fn list_all(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
) -> Result<HttpResponse, AppError> {
    let projects = storage
        .list_all_projects()
        .await
        .map_err(|e| AppError::from_storage(e, Resource::Project))?;

    log::info!("[{}] listed {} projects", request_id, projects.len());
    Ok(Envelope::with_data(projects).into_response())
}

/// Deletes every project of an owner; `404` when the owner has none.
pub async fn delete_by_owner(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let owner_id = positive_id(&path, "invalid owner_id")?;
    storage
        .delete_project(owner_id)
        .await
        .map_err(|e| AppError::from_storage(e, Resource::Project))?;

    log::info!("[{}] deleted projects of owner {}", request_id, owner_id);
    Ok(Envelope::ok().into_response())
}
