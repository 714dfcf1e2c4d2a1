mod api_doc;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod state;
mod store;

use std::sync::Arc;

use anyhow::Context;
use config::{Config, StoreBackend};
use state::AppState;
use store::{InMemoryStore, ItemStore, SpannerStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("item-gateway starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store: Arc<dyn ItemStore> = match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory item store; items are lost on shutdown");
            Arc::new(InMemoryStore::new())
        }
        StoreBackend::Spanner => {
            let spanner = config
                .spanner
                .as_ref()
                .context("Spanner backend selected without Spanner configuration")?;
            Arc::new(SpannerStore::from_config(spanner, &config.item_table).await?)
        }
    };

    let app = routes::build_router(AppState::new(store), &config.route_prefix);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
