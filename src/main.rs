mod config_manager;
mod routes;
mod state;
mod translate;
mod utils;

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config_manager::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up HF_TOKEN and RUST_LOG from a local .env before logging starts
    let dotenv_path = dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("legalis_relay=debug,tower_http=debug")),
        )
        .init();

    if let Some(path) = dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    // Configuration is validated here so a bad provider setup fails before binding
    let (config, loaded_path) = Config::discover()?;
    info!(
        "Loaded configuration from: {} (provider: {})",
        loaded_path,
        config.translation_config.provider.as_str()
    );

    let addr: SocketAddr = format!("{}:{}", config.system_config.host, config.system_config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;

    let app_state = AppState::new(config)?;

    // Build application
    let app = Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
