//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the error type returned by every request handler.
//! It implements `actix_web::error::ResponseError`, so a handler can bail out with `?`
//! and the client receives the JSON envelope `{"status": "ERROR", "error": ...}` with a
//! matching HTTP status.
//!
//! Store failures are translated in exactly one place, [`AppError::from_storage`]. Messages
//! sent to clients are fixed strings; the details of internal failures only reach the log.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;
use validator::ValidationErrors;

use crate::response::Envelope;
use crate::storage::StorageError;

/// Message returned for every failure that is not the client's fault.
pub const INTERNAL_ERROR: &str = "internal error";

/// Message returned when a request body cannot be decoded.
pub const DECODE_ERROR: &str = "failed to decode request";

/// The resource a handler was working on, used to phrase store errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Task,
    Project,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Resource::User => write!(f, "user"),
            Resource::Task => write!(f, "task"),
            Resource::Project => write!(f, "project"),
        }
    }
}

/// Represents all possible errors a handler can answer with.
#[derive(Debug)]
pub enum AppError {
    /// Malformed body, missing identifier or failed field validation (HTTP 400).
    BadRequest(String),
    /// Rejected credentials (HTTP 401).
    Unauthorized(String),
    /// The addressed row does not exist (HTTP 404).
    NotFound(String),
    /// A uniqueness constraint rejected the write (HTTP 409).
    Conflict(String),
    /// Anything else (HTTP 500). The detail is logged, never sent.
    InternalServerError(String),
}

impl AppError {
    /// Maps a classified store error to the response for `resource`.
    pub fn from_storage(err: StorageError, resource: Resource) -> Self {
        match err {
            StorageError::NotFound => AppError::NotFound(format!("{} not found", resource)),
            StorageError::AlreadyExists => {
                AppError::Conflict(format!("{} already exists", resource))
            }
            internal @ StorageError::Internal { .. } => {
                AppError::InternalServerError(internal.to_string())
            }
        }
    }

    /// The message placed in the envelope's `error` field.
    pub fn client_message(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg,
            AppError::InternalServerError(_) => INTERNAL_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::InternalServerError(detail) = self {
            log::error!("{}", detail);
        }
        HttpResponse::build(self.status_code()).json(Envelope::error(self.client_message()))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::BadRequest`.
///
/// Field names are sorted so the message does not depend on hash order.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let field_errors = errors.field_errors();
        let mut fields: Vec<&str> = field_errors.keys().copied().collect();
        fields.sort_unstable();
        let msg = fields
            .iter()
            .map(|field| format!("{} is not valid", field))
            .collect::<Vec<_>>()
            .join(",");
        AppError::BadRequest(msg)
    }
}

/// Password hashing failures are internal errors.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("password hashing failed: {}", error))
    }
}
