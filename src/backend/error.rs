//! Classified failures from the model service

use crate::metrics::FailureKind;
use axum::http::StatusCode;

/// Outcome classification for a failed model service call
///
/// Transport problems and unreadable success bodies are both `Network`:
/// nothing structured came back that could be passed to the caller.
/// `Upstream` means the service answered with a 4xx/5xx and its status is
/// preserved for pass-through.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{0}")]
    Network(String),

    #[error("model service responded with {status}: {message}")]
    Upstream { status: StatusCode, message: String },
}

impl BackendError {
    /// Metrics label for this failure
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network(_) => FailureKind::Network,
            Self::Upstream { .. } => FailureKind::Upstream,
        }
    }

    /// Whether an HTTP error response was received from the model service
    ///
    /// Latency is only observed for calls that reached the service.
    pub fn reached_backend(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_does_not_count_as_reaching_backend() {
        let err = BackendError::Network("connection refused".to_string());
        assert!(!err.reached_backend());
        assert_eq!(err.kind(), FailureKind::Network);
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn upstream_error_keeps_status() {
        let err = BackendError::Upstream {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "model loading".to_string(),
        };
        assert!(err.reached_backend());
        assert_eq!(err.kind(), FailureKind::Upstream);
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("model loading"));
    }
}
