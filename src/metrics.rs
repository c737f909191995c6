//! Prometheus metrics collection for the sentiment proxy
//!
//! This module provides metrics instrumentation for tracking:
//! - Landing page hits
//! - Length of the most recent review
//! - Round-trip latency to the model service
//! - Classified model service failures
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.
//! The registry is owned by [`Metrics`] and injected through application
//! state, so every test can build an isolated instance.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

/// Latency buckets in seconds
const RESPONSE_TIME_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Model service failure kind for type-safe metrics labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport failure or unreadable success body
    Network,
    /// Model service answered with 4xx/5xx
    Upstream,
}

impl FailureKind {
    /// Convert failure kind to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Network => "network",
            FailureKind::Upstream => "upstream",
        }
    }
}

/// Metrics collector for the sentiment proxy
///
/// Cloning is cheap and clones share the same underlying instruments.
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    requests_total: IntCounter,
    review_length: IntGauge,
    response_time: Histogram,
    backend_errors: IntCounterVec,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// Registers all metrics with a new Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Counts landing page hits, not /predict calls
        let requests_total = IntCounter::with_opts(Opts::new(
            "sentiment_app_requests_total",
            "Total number of requests",
        ))?;

        let review_length = IntGauge::with_opts(Opts::new(
            "sentiment_app_review_length",
            "Length of last review",
        ))?;

        let response_time = Histogram::with_opts(
            HistogramOpts::new("sentiment_app_response_time_seconds", "Response time")
                .buckets(RESPONSE_TIME_BUCKETS.to_vec()),
        )?;

        // Cardinality: 2 failure kinds = 2 time series
        let backend_errors = IntCounterVec::new(
            Opts::new(
                "sentiment_app_backend_errors_total",
                "Total number of failed model service calls by failure kind",
            ),
            &["kind"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(review_length.clone()))?;
        registry.register(Box::new(response_time.clone()))?;
        registry.register(Box::new(backend_errors.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            review_length,
            response_time,
            backend_errors,
        })
    }

    /// Record a landing page hit
    pub fn record_landing_request(&self) {
        self.requests_total.inc();
    }

    /// Set the review length gauge (last write wins)
    ///
    /// `chars` is a character count, not a byte count.
    pub fn set_review_length(&self, chars: usize) {
        self.review_length
            .set(i64::try_from(chars).unwrap_or(i64::MAX));
    }

    /// Observe one model service round trip
    ///
    /// # Errors
    ///
    /// Returns an error if `seconds` is NaN, infinite, or negative. Such
    /// values would corrupt every quantile computed from the histogram.
    pub fn record_response_time(&self, seconds: f64) -> Result<(), prometheus::Error> {
        if !seconds.is_finite() {
            return Err(prometheus::Error::Msg(format!(
                "Histogram value must be finite (not NaN or Infinity), got: {}",
                seconds
            )));
        }

        if seconds < 0.0 {
            return Err(prometheus::Error::Msg(format!(
                "Histogram value must be non-negative (duration cannot be negative), got: {}",
                seconds
            )));
        }

        self.response_time.observe(seconds);
        Ok(())
    }

    /// Record a classified model service failure
    pub fn record_backend_error(&self, kind: FailureKind) {
        self.backend_errors.with_label_values(&[kind.as_str()]).inc();
    }

    /// Current landing page hit count
    pub fn requests_total(&self) -> u64 {
        self.requests_total.get()
    }

    /// Current review length gauge value
    pub fn review_length(&self) -> i64 {
        self.review_length.get()
    }

    /// Number of latency observations recorded so far
    pub fn response_time_count(&self) -> u64 {
        self.response_time.get_sample_count()
    }

    /// Failure count for one kind
    pub fn backend_errors(&self, kind: FailureKind) -> u64 {
        self.backend_errors.with_label_values(&[kind.as_str()]).get()
    }

    /// Gather all metrics and encode them in Prometheus text format
    ///
    /// # Errors
    ///
    /// Returns an error if metric encoding fails.
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();
        let metric_count = metric_families.len();

        tracing::debug!(
            metric_family_count = metric_count,
            "Encoding metrics to Prometheus text format"
        );

        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();

        encoder.encode(&metric_families, &mut buffer).map_err(|e| {
            let metric_names: Vec<_> = metric_families.iter().map(|mf| mf.name()).collect();

            tracing::error!(
                error = %e,
                metric_family_count = metric_count,
                metric_names = ?metric_names,
                "Prometheus text encoder failed"
            );

            prometheus::Error::Msg(format!(
                "Failed to encode {} metric families: {}. Metrics: {:?}",
                metric_count, e, metric_names
            ))
        })?;

        String::from_utf8(buffer).map_err(|e| {
            let valid_up_to = e.utf8_error().valid_up_to();
            tracing::error!(
                invalid_byte_index = valid_up_to,
                "Prometheus encoder produced invalid UTF-8"
            );
            prometheus::Error::Msg(format!(
                "Failed to convert metrics to UTF-8 at byte {}: {}",
                valid_up_to, e
            ))
        })
    }
}
