//! HTTP request handlers for the sentiment proxy API

use crate::backend::{ModelBackend, ModelServiceClient};
use crate::config::Config;
use crate::credentials::Credential;
use crate::error::{AppError, AppResult};
use crate::metrics::Metrics;
use crate::middleware::request_id_middleware;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod health;
pub mod index;
pub mod metrics;
pub mod model_version;
pub mod predict;
pub mod version;

/// Application state shared across all handlers
///
/// Contains configuration, the metrics registry, and the model service
/// backend. All fields are Arc'd for cheap cloning across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    metrics: Arc<Metrics>,
    backend: Arc<dyn ModelBackend>,
}

impl AppState {
    /// Assemble state from already-built parts
    pub fn new(config: Arc<Config>, metrics: Arc<Metrics>, backend: Arc<dyn ModelBackend>) -> Self {
        Self {
            config,
            metrics,
            backend,
        }
    }

    /// Build production state: fresh metrics registry and HTTP backend client
    ///
    /// # Errors
    ///
    /// Returns an error if metrics registration or HTTP client construction fails.
    pub fn from_config(config: Arc<Config>, credential: Option<Credential>) -> AppResult<Self> {
        let metrics = Metrics::new()
            .map_err(|e| AppError::Internal(format!("Failed to register metrics: {}", e)))?;
        let backend = ModelServiceClient::new(&config.backend, credential)?;

        Ok(Self::new(config, Arc::new(metrics), Arc::new(backend)))
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the metrics registry
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Get reference to the model service backend
    pub fn backend(&self) -> &dyn ModelBackend {
        self.backend.as_ref()
    }
}

/// Build the full application router
///
/// Request bodies are capped at `server.max_body_bytes`.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config().server.max_body_bytes;
    Router::new()
        .route("/", get(index::handler))
        .route("/version", get(version::handler))
        .route("/model-version", get(model_version::handler))
        .route("/predict", post(predict::handler))
        .route("/metrics", get(metrics::handler))
        .route("/health", get(health::handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}
