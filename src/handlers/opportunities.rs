use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState, models::Opportunity};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::post,
    Router,
};

/// Creates the router for Opportunity hooks
pub fn opportunity_routes() -> Router<AppState> {
    Router::new().route("/rollup", post(rollup))
}

/// Run the bundle cost rollup on an Opportunity document.
///
/// The host calls this as a pre-save hook: it posts the document about to
/// be saved and persists whatever comes back.
#[utoipa::path(
    post,
    path = "/api/v1/opportunities/rollup",
    request_body = Opportunity,
    responses(
        (status = 200, description = "Rolled-up document returned", body = Opportunity),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 502, description = "Host document service unreachable", body = crate::errors::ErrorResponse)
    ),
    tag = "opportunities"
)]
pub async fn rollup(
    State(state): State<AppState>,
    Json(mut document): Json<Opportunity>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .rollup
        .on_validate(&mut document)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(document))
}
