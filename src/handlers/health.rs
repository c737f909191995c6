//! Health check endpoint
//!
//! Provides a simple liveness check for monitoring and load balancers.
//! The model service is not contacted.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::handlers::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Whether a model service credential was found at startup
    pub credential_loaded: bool,
}

/// Health check handler
pub async fn handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK".to_string(),
            credential_loaded: state.backend().has_credential(),
        }),
    )
}
