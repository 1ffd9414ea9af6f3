use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use mini_pm_api::config::{config, AppConfig, StoreBackend};
use mini_pm_api::database::{MemoryStore, PgStore};
use mini_pm_api::services::{seed_pairs, OrganizationService};
use mini_pm_api::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, STORE_BACKEND, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config();
    tracing::info!("Starting Mini PM API in {:?} mode", config.environment);

    let state = build_state(config).await?;
    let app = build_router(state, config);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Mini PM API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    match config.store.backend {
        StoreBackend::Postgres => {
            let store = Arc::new(
                PgStore::connect(&config.database)
                    .await
                    .context("failed to connect to database")?,
            );
            if config.database.run_migrations {
                store.migrate().await.context("failed to apply migrations")?;
            }
            Ok(AppState::new(store.clone(), store))
        }
        StoreBackend::Memory => {
            let store = Arc::new(MemoryStore::new());
            let seeded = OrganizationService::new(store.clone())
                .ensure(&seed_pairs(&config.store.seed_organizations))
                .await?;
            tracing::info!("Using in-memory store with {} seeded organization(s)", seeded.len());
            Ok(AppState::new(store.clone(), store))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
