//! Fuel planning server.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fuel_server::api;
use fuel_server::config::Config;
use fuel_server::state::{load_catalog, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fuel_server=debug".parse()?)
                .add_directive("fuel_core=info".parse()?),
        )
        .init();

    tracing::info!("Starting fuel planning server...");

    let config = Config::from_env();
    config.planner.validate()?;
    let port = config.server_port;

    let catalog = match &config.stations_path {
        Some(path) => {
            let catalog = load_catalog(path)?;
            tracing::info!(
                path = %path.display(),
                stations = catalog.len(),
                skipped = catalog.skipped(),
                "loaded station catalog"
            );
            Some(catalog)
        }
        None => {
            tracing::warn!("FUEL_STATIONS_PATH not set; starting with an empty catalog");
            None
        }
    };
    let state = match catalog {
        Some(catalog) => AppState::with_catalog(config, catalog),
        None => AppState::new(config),
    };

    let app = api::routes()
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
