//! Prediction endpoint handler
//!
//! Handles POST /predict by forwarding the review to the model service and
//! normalizing its answer.
//!
//! Metrics per request:
//! - validation failure or oversized body: nothing recorded, backend never called
//! - after validation: review length gauge is set
//! - backend answered (2xx or 4xx/5xx): one latency observation
//! - transport failure or unreadable body: no latency observation

use crate::backend::BackendError;
use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::middleware::RequestId;
use crate::normalize::normalize;
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Instant;

/// Error message for any request without a usable review
pub const MISSING_REVIEW: &str = "Missing 'review'";

/// Prediction request from client
///
/// Validation is enforced during deserialization - an instance always holds
/// a non-empty review.
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    review: String,
}

impl PredictRequest {
    /// Get the review text
    pub fn review(&self) -> &str {
        &self.review
    }

    /// Review length in characters
    pub fn char_count(&self) -> usize {
        self.review.chars().count()
    }
}

impl<'de> Deserialize<'de> for PredictRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawPredictRequest {
            #[serde(default)]
            review: Option<String>,
        }

        let raw = RawPredictRequest::deserialize(deserializer)?;
        match raw.review {
            Some(review) if !review.is_empty() => Ok(PredictRequest { review }),
            _ => Err(serde::de::Error::custom(MISSING_REVIEW)),
        }
    }
}

/// POST /predict handler
///
/// The single blocking point is the model service call, bounded by
/// `backend.timeout_seconds`. There are no retries.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(
            request_id = %request_id,
            rejection = %rejection.body_text(),
            "Rejected prediction request"
        );
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge {
                limit: state.config().server.max_body_bytes,
            }
        } else {
            AppError::Validation(MISSING_REVIEW.to_string())
        }
    })?;

    let review_chars = request.char_count();
    state.metrics().set_review_length(review_chars);

    let started = Instant::now();
    match state.backend().predict(request.review()).await {
        Ok(reply) => {
            let result = normalize(&reply.body);
            observe_latency(&state, started, &request_id);

            tracing::info!(
                request_id = %request_id,
                review_chars,
                status = %reply.status,
                sentiment_label = result.sentiment_label.as_str(),
                confidence = result.confidence,
                "Prediction served"
            );
            Ok((reply.status, Json(result)).into_response())
        }
        Err(e) => {
            if e.reached_backend() {
                observe_latency(&state, started, &request_id);
            }
            state.metrics().record_backend_error(e.kind());
            log_backend_failure(&request_id, &e);
            Err(AppError::Backend(e))
        }
    }
}

fn observe_latency(state: &AppState, started: Instant, request_id: &RequestId) {
    let seconds = started.elapsed().as_secs_f64();
    if let Err(e) = state.metrics().record_response_time(seconds) {
        tracing::warn!(
            request_id = %request_id,
            error = %e,
            seconds,
            "Failed to record response time"
        );
    }
}

fn log_backend_failure(request_id: &RequestId, error: &BackendError) {
    match error {
        BackendError::Upstream { status, message } => tracing::warn!(
            request_id = %request_id,
            status = %status,
            details = %message,
            "Model service returned an error"
        ),
        BackendError::Network(message) => tracing::error!(
            request_id = %request_id,
            error = %message,
            "Model service call failed"
        ),
    }
}
