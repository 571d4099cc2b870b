mod analytics;
mod api;
mod config;
mod error;
mod models;
mod redirect;
mod shortcode;
mod storage;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use analytics::{ClickRecorder, CountryNames};
use api::AppState;
use config::Config;
use storage::{SqliteStorage, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Arc::new(Config::from_env()?);
    info!("Loaded configuration");

    let storage: Arc<dyn Storage> = Arc::new(
        SqliteStorage::new(&config.database.url, config.database.max_connections).await?,
    );
    info!("Using SQLite storage: {}", config.database.url);

    storage.init().await?;
    info!("Database initialized");

    let recorder = ClickRecorder::new(Arc::clone(&storage), config.event_buffer_size);

    let state = Arc::new(AppState {
        storage,
        recorder,
        config: Arc::clone(&config),
        country_names: CountryNames::new(),
    });

    let app = api::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
