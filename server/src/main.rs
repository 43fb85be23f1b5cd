//! Zavvi Application Service - Main Entry Point

use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zavvi_server::{create_app, store::ZavviStore, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,zavvi_server=debug")),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting Zavvi Application Service");

    let store_path = std::env::var("ZAVVI_STORE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/zavvi.json"));

    let store = match ZavviStore::open(store_path.clone()) {
        Ok(store) => store,
        Err(err) => {
            error!("Failed to open store at {}: {}", store_path.display(), err);
            return Err(err);
        }
    };
    info!("Opened store at {}", store_path.display());

    let app = create_app(AppState::new(store));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Zavvi listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
