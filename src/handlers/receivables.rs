use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Creates the router for receivables queries
pub fn receivables_routes() -> Router<AppState> {
    Router::new().route("/:customer", get(outstanding_invoices))
}

/// Submitted sales invoices for a customer, newest first
#[utoipa::path(
    get,
    path = "/api/v1/receivables/{customer}",
    params(("customer" = String, Path, description = "Customer name")),
    responses(
        (status = 200, description = "Invoice listing returned", body = [crate::models::OutstandingInvoice]),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 502, description = "Host document service unreachable", body = crate::errors::ErrorResponse)
    ),
    tag = "receivables"
)]
pub async fn outstanding_invoices(
    State(state): State<AppState>,
    Path(customer): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .receivables
        .outstanding_sales_invoices(&customer)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}
