//! Application version endpoint

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::handlers::AppState;

/// Version response
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

/// GET /version handler
///
/// Returns the configured application version. Never touches the model service.
pub async fn handler(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: state.config().app.version.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{FakeBackend, state_with};

    #[tokio::test]
    async fn test_version_reports_configured_version() {
        let (state, backend, _) = state_with(FakeBackend::new());
        let Json(body) = handler(State(state)).await;
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(backend.predict_calls(), 0);
        assert_eq!(backend.version_calls(), 0);
    }
}
