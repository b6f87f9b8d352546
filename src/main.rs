use std::io;
use std::sync::Arc;

use actix_web::HttpServer;
use taskboard::{
    build_app,
    config::Config,
    store::{InMemoryStore, PgStore},
    AppServices,
};

fn to_io_error<E: std::fmt::Display>(error: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, error.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(to_io_error)?;

    let services = match &config.database_url {
        Some(database_url) => {
            let store = Arc::new(
                PgStore::connect(database_url, config.database_max_connections)
                    .await
                    .map_err(to_io_error)?,
            );
            store.migrate().await.map_err(to_io_error)?;
            log::info!("Connected to PostgreSQL");
            AppServices::new(store.clone(), store, &config)
        }
        None => {
            log::warn!("DATABASE_URL is not set; using in-memory storage (data is lost on restart)");
            let store = Arc::new(InMemoryStore::new());
            AppServices::new(store.clone(), store, &config)
        }
    };

    log::info!("Starting taskboard server at {}", config.server_url());
    let cors_origin = config.cors_origin.clone();
    HttpServer::new(move || build_app(services.clone(), cors_origin.as_deref()))
        .bind((config.server_host.as_str(), config.server_port))?
        .run()
        .await
}
