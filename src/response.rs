//! The `{status, error?, data?}` envelope every JSON endpoint answers with.

use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERROR")]
    Error,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T = ()> {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl Envelope<()> {
    pub fn ok() -> Self {
        Envelope {
            status: Status::Ok,
            error: None,
            data: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Envelope {
            status: Status::Error,
            error: Some(msg.into()),
            data: None,
        }
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn with_data(data: T) -> Self {
        Envelope {
            status: Status::Ok,
            error: None,
            data: Some(data),
        }
    }

    /// `200 OK` carrying this envelope.
    pub fn into_response(self) -> HttpResponse {
        HttpResponse::Ok().json(self)
    }
}
