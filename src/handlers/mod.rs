pub mod common;
pub mod conversions;
pub mod delivery_bom;
pub mod opportunities;
pub mod receivables;

use axum::{routing::get, Json, Router};
use serde_json::json;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Assembles the versioned API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/bundles", conversions::conversion_routes())
        .nest("/delivery-bom", delivery_bom::delivery_bom_routes())
        .nest("/opportunities", opportunities::opportunity_routes())
        .nest("/receivables", receivables::receivables_routes())
}

/// Liveness probe.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
