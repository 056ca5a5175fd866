use actix_cors::Cors;
use actix_web::{
    dev::Server,
    http::header::{self, HeaderName},
    middleware::{Logger, NormalizePath},
    web, App, HttpServer,
};
use std::{net::TcpListener, sync::Arc};

use crate::{
    config::Config,
    middleware::RequestIdMiddleware,
    routes::{self, HealthCheck},
    storage::Storage,
};

/// Access log line; ends with the request id echoed in the response.
const ACCESS_LOG_FORMAT: &str = r#"%a "%r" %s %b %Dms %{x-request-id}o"#;

/// Cross-origin policy for browser clients.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .expose_headers(vec![header::LINK])
        .max_age(300)
}

/// Builds the HTTP server on an already bound listener.
///
/// The returned [`Server`] has to be awaited (or spawned) to start serving.
pub fn run(
    listener: TcpListener,
    storage: Arc<dyn Storage>,
    config: &Config,
) -> std::io::Result<Server> {
    let health = HealthCheck {
        timeout: config.health_timeout,
    };

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(storage.clone()))
            .app_data(web::Data::new(health))
            .wrap(NormalizePath::trim())
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(ACCESS_LOG_FORMAT))
            .wrap(cors())
            .configure(routes::config)
    })
    .client_request_timeout(config.http.timeout)
    .client_disconnect_timeout(config.http.timeout)
    .keep_alive(config.http.idle_timeout)
    .listen(listener)?
    .run();

    Ok(server)
}
