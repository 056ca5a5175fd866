use actix_web::{web, HttpResponse};

use crate::{
    auth::{verify_dummy, verify_password, LoginRequest},
    error::AppError,
    middleware::RequestId,
    models::User,
    response::Envelope,
    storage::{Storage, StorageError},
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Authenticates a user by user name and password.
///
/// An unknown user and a wrong password produce the same `401` answer, and
/// both cost one bcrypt verification.
///
/// ## Responses:
/// - `200 OK`: the user without any password field.
/// - `401 Unauthorized`: `missing credentials` or `invalid credentials`.
/// - `500 Internal Server Error`: store or hashing failure.
pub async fn login(
    storage: web::Data<dyn Storage>,
    request_id: RequestId,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let name = req.login_name().trim().to_string();
    if name.is_empty() || req.password.is_empty() {
        log::info!("[{}] login without credentials", request_id);
        return Err(AppError::Unauthorized("missing credentials".to_string()));
    }

    let user = match storage.user(&name).await {
        Ok(user) => Some(user),
        Err(StorageError::NotFound) => None,
        Err(e) => return Err(AppError::InternalServerError(e.to_string())),
    };

    let password = req.password;
    let (user, verified) = web::block(move || -> Result<(Option<User>, bool), AppError> {
        let hash = user.as_ref().and_then(|u| u.password_hash.as_deref());
        let verified = match hash {
            Some(hash) => verify_password(&password, hash)?,
            None => {
                verify_dummy(&password);
                false
            }
        };
        Ok((user, verified))
    })
    .await
    .map_err(|e| AppError::InternalServerError(e.to_string()))??;

    match user {
        Some(mut user) if verified => {
            user.password_hash = None;
            log::info!("[{}] user {} logged in", request_id, user.user_name);
            Ok(Envelope::with_data(user).into_response())
        }
        _ => {
            log::info!("[{}] login rejected for {}", request_id, name);
            Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
        }
    }
}
