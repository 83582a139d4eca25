use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use bundleflow_api::{
    config::AppConfig,
    convert::LocalConversionEngine,
    events,
    schema::SchemaCapabilities,
    services::{BundlePropagationService, BundleRollupService, ReceivablesService},
    store::{DocumentStore, InMemoryDocumentStore},
    AppState,
};

/// Application harness backed by the in-memory store and the local
/// conversion engine.
pub struct TestApp {
    pub store: Arc<InMemoryDocumentStore>,
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_capabilities(SchemaCapabilities::default())
    }

    pub fn with_capabilities(capabilities: SchemaCapabilities) -> Self {
        let store = Arc::new(InMemoryDocumentStore::new());
        let store_dyn: Arc<dyn DocumentStore> = store.clone();
        let engine = Arc::new(LocalConversionEngine::new(store_dyn.clone()));
        let (event_sender, event_rx) = events::channel(64);
        tokio::spawn(events::process_events(event_rx));

        let state = AppState {
            config: AppConfig::default(),
            propagation: BundlePropagationService::new(
                store_dyn.clone(),
                engine,
                capabilities.clone(),
                Some(event_sender.clone()),
            ),
            rollup: BundleRollupService::new(
                store_dyn.clone(),
                capabilities,
                Some(event_sender.clone()),
            ),
            receivables: ReceivablesService::new(store_dyn),
            event_sender,
        };
        let router = bundleflow_api::app_router(state.clone());
        Self {
            store,
            state,
            router,
        }
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let request = Request::get(path).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}
