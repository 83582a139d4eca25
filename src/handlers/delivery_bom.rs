use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Creates the router for read-only delivery-BOM lookups
pub fn delivery_bom_routes() -> Router<AppState> {
    Router::new()
        .route("/opportunity/:name", get(from_opportunity))
        .route("/quotation/:name", get(from_quotation))
        .route("/sales-order/:name", get(from_sales_order))
}

/// Delivery-BOM rows derived from an Opportunity's bundle table
#[utoipa::path(
    get,
    path = "/api/v1/delivery-bom/opportunity/{name}",
    params(("name" = String, Path, description = "Opportunity name")),
    responses(
        (status = 200, description = "Derived rows returned", body = [crate::models::DeliveryComponentRow]),
        (status = 404, description = "Opportunity not found", body = crate::errors::ErrorResponse)
    ),
    tag = "delivery-bom"
)]
pub async fn from_opportunity(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .propagation
        .delivery_bom_from_opportunity(&name)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

/// A Quotation's delivery-BOM table, normalized
#[utoipa::path(
    get,
    path = "/api/v1/delivery-bom/quotation/{name}",
    params(("name" = String, Path, description = "Quotation name")),
    responses(
        (status = 200, description = "Rows returned", body = [crate::models::DeliveryComponentRow]),
        (status = 404, description = "Quotation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "delivery-bom"
)]
pub async fn from_quotation(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .propagation
        .delivery_bom_from_quotation(&name)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

/// A Sales Order's delivery-BOM table, normalized
#[utoipa::path(
    get,
    path = "/api/v1/delivery-bom/sales-order/{name}",
    params(("name" = String, Path, description = "Sales Order name")),
    responses(
        (status = 200, description = "Rows returned", body = [crate::models::DeliveryComponentRow]),
        (status = 404, description = "Sales order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "delivery-bom"
)]
pub async fn from_sales_order(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .propagation
        .delivery_bom_from_sales_order(&name)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}
