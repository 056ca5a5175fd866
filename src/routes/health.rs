use actix_web::{web, HttpResponse};
use std::time::Duration;

use crate::storage::Storage;

/// Settings for the `/healthz` probe.
#[derive(Debug, Clone, Copy)]
pub struct HealthCheck {
    pub timeout: Duration,
}

impl Default for HealthCheck {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

/// Health check endpoint
///
/// Pings the store within the configured deadline. Answers `200 ok` or
/// `503 unhealthy` as plain text.
pub async fn healthz(
    storage: web::Data<dyn Storage>,
    check: web::Data<HealthCheck>,
) -> HttpResponse {
    match tokio::time::timeout(check.timeout, storage.ping()).await {
        Ok(Ok(())) => HttpResponse::Ok().content_type("text/plain").body("ok"),
        Ok(Err(e)) => {
            log::error!("health probe failed: {}", e);
            unhealthy()
        }
        Err(_) => {
            log::error!("health probe timed out after {:?}", check.timeout);
            unhealthy()
        }
    }
}

fn unhealthy() -> HttpResponse {
    HttpResponse::ServiceUnavailable()
        .content_type("text/plain")
        .body("unhealthy")
}
