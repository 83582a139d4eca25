use super::common::{map_service_error, success_response, validate_input};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

/// Creates the router for document conversion endpoints
pub fn conversion_routes() -> Router<AppState> {
    Router::new()
        .route("/quotation", post(make_quotation))
        .route("/sales-order", post(make_sales_order))
        .route("/delivery-note", post(make_delivery_note))
        .route("/sales-invoice", post(make_sales_invoice))
        .route("/purchase-order", post(make_purchase_order))
}

// Request DTOs

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ConvertRequest {
    /// Name of the source document to convert
    #[validate(length(min = 1))]
    pub source_name: String,
    /// Optional payload merged into the mapped target by the host
    pub overrides: Option<Value>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PurchaseOrderRequest {
    /// Name of the source Sales Order
    #[validate(length(min = 1))]
    pub sales_order: String,
}

/// Draft a Quotation from an Opportunity, carrying the bundle rows
#[utoipa::path(
    post,
    path = "/api/v1/bundles/quotation",
    request_body = ConvertRequest,
    responses(
        (status = 200, description = "Enriched quotation returned"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Base conversion source missing", body = crate::errors::ErrorResponse),
        (status = 502, description = "Host document service unreachable", body = crate::errors::ErrorResponse)
    ),
    tag = "bundles"
)]
pub async fn make_quotation(
    State(state): State<AppState>,
    Json(payload): Json<ConvertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let outcome = state
        .propagation
        .make_quotation_with_bundle(&payload.source_name, payload.overrides)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(outcome))
}

/// Draft a Sales Order from a Quotation, carrying the delivery BOM
#[utoipa::path(
    post,
    path = "/api/v1/bundles/sales-order",
    request_body = ConvertRequest,
    responses(
        (status = 200, description = "Enriched sales order returned"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Base conversion source missing", body = crate::errors::ErrorResponse),
        (status = 502, description = "Host document service unreachable", body = crate::errors::ErrorResponse)
    ),
    tag = "bundles"
)]
pub async fn make_sales_order(
    State(state): State<AppState>,
    Json(payload): Json<ConvertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let outcome = state
        .propagation
        .make_sales_order_with_bundle(&payload.source_name, payload.overrides)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(outcome))
}

/// Draft a Delivery Note from a Sales Order, appending component rows
#[utoipa::path(
    post,
    path = "/api/v1/bundles/delivery-note",
    request_body = ConvertRequest,
    responses(
        (status = 200, description = "Enriched delivery note returned"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Base conversion source missing", body = crate::errors::ErrorResponse),
        (status = 502, description = "Host document service unreachable", body = crate::errors::ErrorResponse)
    ),
    tag = "bundles"
)]
pub async fn make_delivery_note(
    State(state): State<AppState>,
    Json(payload): Json<ConvertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let outcome = state
        .propagation
        .make_delivery_note_merged(&payload.source_name, payload.overrides)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(outcome))
}

/// Draft a Sales Invoice from a Sales Order, merging component rows
#[utoipa::path(
    post,
    path = "/api/v1/bundles/sales-invoice",
    request_body = ConvertRequest,
    responses(
        (status = 200, description = "Enriched sales invoice returned"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Base conversion source missing", body = crate::errors::ErrorResponse),
        (status = 502, description = "Host document service unreachable", body = crate::errors::ErrorResponse)
    ),
    tag = "bundles"
)]
pub async fn make_sales_invoice(
    State(state): State<AppState>,
    Json(payload): Json<ConvertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let outcome = state
        .propagation
        .make_sales_invoice_merged(&payload.source_name, payload.overrides)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(outcome))
}

/// Draft a Purchase Order from a Sales Order's lines and delivery BOM
#[utoipa::path(
    post,
    path = "/api/v1/bundles/purchase-order",
    request_body = PurchaseOrderRequest,
    responses(
        (status = 200, description = "Drafted purchase order returned"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Sales order not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "Host document service unreachable", body = crate::errors::ErrorResponse)
    ),
    tag = "bundles"
)]
pub async fn make_purchase_order(
    State(state): State<AppState>,
    Json(payload): Json<PurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let po = state
        .propagation
        .make_purchase_order_from_sales_order_bundle(&payload.sales_order)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(po))
}
