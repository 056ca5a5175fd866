use actix_web::{web, HttpResponse};
use serde::Serialize;

use super::non_empty;
use crate::{
    auth::hash_password,
    error::{AppError, Resource},
    middleware::RequestId,
    models::{RenameInput, UserInput},
    response::Envelope,
    storage::Storage,
};

/// Data returned after a user is created. Never includes the password.
#[derive(Debug, Serialize)]
struct SavedUser {
    id: i64,
    user_name: String,
    email: String,
}

/// Creates a user.
///
/// Fields are checked in order (`user_name`, `email`, email format, password
/// length) and the first failure is reported. The password is hashed with
/// bcrypt before it reaches the store.
///
/// ## Responses:
/// - `200 OK`: `{"status":"OK","data":{"id","user_name","email"}}`.
/// - `400 Bad Request`: undecodable body or a field check failed.
/// - `409 Conflict`: `user already exists` (user name or email taken).
/// - `500 Internal Server Error`: hashing or store failure.
pub async fn save(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
    body: web::Json<UserInput>,
) -> Result<HttpResponse, AppError> {
    let mut input = body.into_inner();
    if let Err(msg) = input.normalize_and_check() {
        log::info!("[{}] rejected user: {}", request_id, msg);
        return Err(AppError::BadRequest(msg.to_string()));
    }

    let password = std::mem::take(&mut input.password);
    let password_hash = web::block(move || hash_password(&password))
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))??;

    let id = storage
        .save_user(&input.user_name, &input.email, &password_hash)
        .await
        .map_err(|e| AppError::from_storage(e, Resource::User))?;

    log::info!("[{}] user saved id={}", request_id, id);
    Ok(Envelope::with_data(SavedUser {
        id,
        user_name: input.user_name,
        email: input.email,
    })
    .into_response())
}

pub async fn get(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let name = non_empty(&path, "user_name is empty")?;
    let user = storage
        .user(name)
        .await
        .map_err(|e| AppError::from_storage(e, Resource::User))?;

    log::info!("[{}] got user {}", request_id, user.user_name);
    Ok(Envelope::with_data(user).into_response())
}

pub async fn list_all(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
) -> Result<HttpResponse, AppError> {
    let users = storage
        .list_all_users()
        .await
        .map_err(|e| AppError::from_storage(e, Resource::User))?;

    log::info!("[{}] listed {} users", request_id, users.len());
    Ok(Envelope::with_data(users).into_response())
}

/// Renames the user addressed by the path to the `user_name` in the body.
pub async fn rename(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
    path: web::Path<String>,
    body: web::Json<RenameInput>,
) -> Result<HttpResponse, AppError> {
    let name = non_empty(&path, "user_name is empty")?;
    let new_name = non_empty(&body.user_name, "user_name field is required")?;

    let user = storage
        .update_user_name(name, new_name)
        .await
        .map_err(|e| AppError::from_storage(e, Resource::User))?;

    log::info!("[{}] renamed user {} to {}", request_id, name, user.user_name);
    Ok(Envelope::with_data(user).into_response())
}

pub async fn delete(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let name = non_empty(&path, "user_name is empty")?;
    storage
        .delete_user(name)
        .await
        .map_err(|e| AppError::from_storage(e, Resource::User))?;

    log::info!("[{}] deleted user {}", request_id, name);
    Ok(Envelope::ok().into_response())
}
