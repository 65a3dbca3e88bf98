//! The relay handler: one inbound GET, one outbound GET, same JSON back.

use axum::{
    extract::{Extension, State},
    Json,
};

use crate::error::AppError;
use crate::middleware::RequestId;
use crate::state::AppState;
use crate::upstream::JsonObject;

/// Forward the request to the upstream service and return its JSON object.
///
/// The response is only written once the upstream exchange has finished.
/// Any upstream failure becomes a 5xx through `AppError`.
pub async fn relay(
    State(state): State<AppState>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<JsonObject>, AppError> {
    let body = state.upstream.fetch_json(Some(request_id)).await?;
    tracing::debug!(fields = body.len(), "Relaying upstream response");
    Ok(Json(body))
}
