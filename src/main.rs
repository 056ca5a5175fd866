use std::{io, net::TcpListener, sync::Arc};

use task_manager::{
    config::Config,
    logging, startup,
    storage::{PgStorage, Storage},
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    logging::init(config.env);

    log::info!(
        "starting task-manager env={} database={}",
        config.env,
        config.masked_database_url()
    );

    let storage = PgStorage::connect(&config.database_url, config.max_connections)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    storage
        .migrate()
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let listener = TcpListener::bind(&config.http.address)?;
    log::info!("listening on http://{}", config.http.address);

    let storage: Arc<dyn Storage> = Arc::new(storage);
    startup::run(listener, storage, &config)?.await
}
