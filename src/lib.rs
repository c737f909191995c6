//! Sentiment proxy - observable front-end for a remote sentiment model
//!
//! This library accepts review text over HTTP, forwards it to a model
//! service with the mounted API key, normalizes the answer, and records
//! Prometheus metrics around the call.

pub mod backend;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod normalize;
pub mod telemetry;
