pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::error::{AppError, DECODE_ERROR};

pub use health::HealthCheck;

/// The route table. Handlers expect `web::Data<dyn Storage>` and
/// `web::Data<HealthCheck>` to be registered on the app.
///
/// Fixed segments (`/all`, `/by-user`, `/by-owner`) are registered before the
/// catch-all `{param}` resources so they are matched first.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/healthz", web::get().to(health::healthz))
        .service(web::scope("/auth").route("/login", web::post().to(auth::login)))
        .service(
            web::scope("/users")
                .route("", web::post().to(users::save))
                .route("/all", web::get().to(users::list_all))
                .service(
                    web::resource("/{user_name}")
                        .route(web::get().to(users::get))
                        .route(web::put().to(users::rename))
                        .route(web::delete().to(users::delete)),
                ),
        )
        .service(
            web::scope("/tasks")
                .route("", web::post().to(tasks::save))
                .route("/all", web::get().to(tasks::list_all))
                .route("/by-user/{user_id}", web::get().to(tasks::list_by_user))
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(tasks::get))
                        .route(web::put().to(tasks::update))
                        .route(web::delete().to(tasks::delete)),
                ),
        )
        .service(
            web::scope("/projects")
                .route("", web::post().to(projects::save))
                .route("/all", web::get().to(projects::list_all))
                .route(
                    "/by-owner/{owner_id}",
                    web::delete().to(projects::delete_by_owner),
                )
                .route("/{name}", web::get().to(projects::get)),
        );
}

/// Every undecodable body gets the same answer, whatever the resource.
fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("failed to decode request body for {}: {}", req.path(), err);
    AppError::BadRequest(DECODE_ERROR.into()).into()
}

/// Parses a positive numeric path identifier.
pub(crate) fn positive_id(raw: &str, msg: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest(msg.to_string())),
    }
}

/// Trims a textual path identifier and rejects it when blank.
pub(crate) fn non_empty<'a>(raw: &'a str, msg: &str) -> Result<&'a str, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(msg.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_id() {
        assert_eq!(positive_id("12", "invalid").unwrap(), 12);
        for bad in ["0", "-4", "abc", "", "1.5"] {
            let err = positive_id(bad, "invalid task id").unwrap_err();
            assert_eq!(err.client_message(), "invalid task id");
        }
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  alice ", "empty").unwrap(), "alice");
        assert!(non_empty("   ", "user_name is empty").is_err());
    }
}
