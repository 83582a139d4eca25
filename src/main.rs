use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use url::Url;

use bundleflow_api as api;

use api::config::StoreBackend;
use api::convert::{ConversionEngine, LocalConversionEngine};
use api::store::{DocumentStore, ErpClient, InMemoryDocumentStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(&cfg.log_level, cfg.log_json);

    let (event_sender, event_rx) = api::events::channel(cfg.event_channel_capacity);
    tokio::spawn(api::events::process_events(event_rx));

    let (store, engine): (Arc<dyn DocumentStore>, Arc<dyn ConversionEngine>) =
        match cfg.store_backend {
            StoreBackend::Memory => {
                info!("Using in-memory document backend");
                let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
                let engine = Arc::new(LocalConversionEngine::new(store.clone()));
                (store, engine)
            }
            StoreBackend::Erp => {
                let base_url = cfg
                    .erp_base_url
                    .as_deref()
                    .context("erp_base_url missing for the erp backend")?;
                info!(%base_url, "Using host ERP document backend");
                let url = Url::parse(base_url).context("invalid erp_base_url")?;
                let client = Arc::new(ErpClient::new(url, cfg.erp_auth_token.clone())?);
                (client.clone() as Arc<dyn DocumentStore>, client)
            }
        };

    let capabilities = cfg.capabilities.clone();
    let state = api::AppState {
        propagation: api::services::BundlePropagationService::new(
            store.clone(),
            engine,
            capabilities.clone(),
            Some(event_sender.clone()),
        ),
        rollup: api::services::BundleRollupService::new(
            store.clone(),
            capabilities,
            Some(event_sender.clone()),
        ),
        receivables: api::services::ReceivablesService::new(store),
        event_sender,
        config: cfg.clone(),
    };

    let router = api::app_router(state);
    let listener = tokio::net::TcpListener::bind(cfg.bind_address())
        .await
        .context("failed to bind listen address")?;
    info!("Listening on {}", cfg.bind_address());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
