//! Bundleflow API Library
//!
//! Carries delivery bill-of-materials rows across the sales pipeline's
//! document conversions and rolls bundle component costs into Opportunity
//! line margins. Document persistence, permissions and base field mapping
//! belong to the host ERP and are consumed through the `store` and
//! `convert` traits.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod convert;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod schema;
pub mod services;
pub mod store;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub propagation: services::BundlePropagationService,
    pub rollup: services::BundleRollupService,
    pub receivables: services::ReceivablesService,
}

/// Builds the full application router with middleware applied.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", handlers::api_routes())
        .merge(handlers::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
