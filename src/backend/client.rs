//! HTTP client for the model service
//!
//! One outbound attempt per call, no retries. The outcome is classified into
//! a [`Reply`] or a [`BackendError`] so handlers never see `reqwest` types.

use super::error::BackendError;
use super::types::{PredictBody, RawPrediction, RawVersion, Reply};
use crate::config::BackendConfig;
use crate::credentials::Credential;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Header carrying the model service API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Longest slice of an upstream error body kept in messages
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Calls against the model service
///
/// Allows dependency injection of fake backends in handler tests.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Score a review via `POST /predict`
    async fn predict(&self, review: &str) -> Result<Reply<RawPrediction>, BackendError>;

    /// Fetch the model service version via `GET /version`
    async fn version(&self) -> Result<Reply<RawVersion>, BackendError>;

    /// Whether outbound calls carry a credential
    fn has_credential(&self) -> bool;
}

/// `reqwest`-backed [`ModelBackend`]
///
/// The credential is fixed at construction and attached to every call.
pub struct ModelServiceClient {
    http: reqwest::Client,
    base_url: String,
    credential: Option<Credential>,
}

impl ModelServiceClient {
    /// Build a client for the configured model service
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the HTTP client cannot be built
    /// (e.g., TLS backend initialization failure).
    pub fn new(config: &BackendConfig, credential: Option<Credential>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        tracing::info!(
            base_url = %config.base_url(),
            timeout_seconds = config.timeout_seconds(),
            credential_present = credential.is_some(),
            "Model service client configured"
        );

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            credential,
        })
    }

    /// Base URL the client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credential {
            Some(credential) => request.header(API_KEY_HEADER, credential.expose()),
            None => request,
        }
    }
}

#[async_trait]
impl ModelBackend for ModelServiceClient {
    async fn predict(&self, review: &str) -> Result<Reply<RawPrediction>, BackendError> {
        let url = self.url("/predict");
        tracing::debug!(
            url = %url,
            credential_attached = self.credential.is_some(),
            review_chars = review.chars().count(),
            "Calling model service"
        );

        let request = self.authorize(self.http.post(&url).json(&PredictBody { review }));
        classify(&url, request.send().await).await
    }

    async fn version(&self) -> Result<Reply<RawVersion>, BackendError> {
        let url = self.url("/version");
        tracing::debug!(url = %url, "Fetching model service version");

        let request = self.authorize(self.http.get(&url));
        classify(&url, request.send().await).await
    }

    fn has_credential(&self) -> bool {
        self.credential.is_some()
    }
}

/// Map a transport result into a typed reply or a classified error
async fn classify<T: DeserializeOwned>(
    url: &str,
    sent: Result<reqwest::Response, reqwest::Error>,
) -> Result<Reply<T>, BackendError> {
    let response = sent.map_err(|e| BackendError::Network(describe_transport_error(url, &e)))?;
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::Upstream {
            status,
            message: upstream_message(status, url, &body),
        });
    }

    let bytes = response.bytes().await.map_err(|e| {
        BackendError::Network(format!(
            "Failed to read model service response from {}: {}",
            url, e
        ))
    })?;

    let body = serde_json::from_slice(&bytes).map_err(|e| {
        BackendError::Network(format!(
            "Model service at {} returned an unreadable body ({} bytes): {}",
            url,
            bytes.len(),
            e
        ))
    })?;

    Ok(Reply { status, body })
}

fn describe_transport_error(url: &str, e: &reqwest::Error) -> String {
    let what = if e.is_timeout() {
        "timed out"
    } else if e.is_connect() {
        "could not connect"
    } else {
        "failed"
    };
    format!("Model service request to {} {}: {}", url, what, e)
}

fn upstream_message(status: reqwest::StatusCode, url: &str, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("{} for url: {}", status, url);
    }

    let preview = if body.chars().count() > MAX_ERROR_BODY_CHARS {
        format!(
            "{}... [truncated]",
            body.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>()
        )
    } else {
        body.to_string()
    };
    format!("{} for url: {}: {}", status, url, preview)
}
