//! Model service version proxy
//!
//! Unlike `/predict`, this endpoint does not pass failures through. Every
//! failure, whether the service is down or rejected the credential, is
//! flattened into one sentinel body by [`deny_detail_on_failure`].

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::backend::BackendError;
use crate::handlers::AppState;
use crate::middleware::RequestId;

/// Sentinel version reported when the model service cannot be queried
pub const UNAVAILABLE: &str = "unavailable";

/// GET /model-version handler
///
/// On success the model service's JSON body and status are returned as-is.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    match state.backend().version().await {
        Ok(reply) => {
            tracing::debug!(
                request_id = %request_id,
                status = %reply.status,
                "Model service version fetched"
            );
            (reply.status, Json(reply.body)).into_response()
        }
        Err(e) => {
            state.metrics().record_backend_error(e.kind());
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                failure_kind = e.kind().as_str(),
                "Model service version unavailable"
            );
            deny_detail_on_failure(&e).into_response()
        }
    }
}

/// Failure policy for the version proxy: hide what went wrong
///
/// The caller always gets HTTP 500 with the sentinel, regardless of the
/// error. The real cause is only visible in logs and metrics.
pub fn deny_detail_on_failure(_error: &BackendError) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "model_service_version": UNAVAILABLE })),
    )
}
