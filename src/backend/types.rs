//! Wire types exchanged with the model service

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Outbound body for `POST /predict`
#[derive(Debug, Serialize)]
pub(crate) struct PredictBody<'a> {
    pub review: &'a str,
}

/// Raw scoring output from the model service
///
/// `sentiment` is expected to be `0` or `1` but is not range-checked here;
/// see [`crate::normalize`] for how other values are treated.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RawPrediction {
    pub sentiment: f64,
    pub confidence: f64,
}

/// Raw `/version` body, passed through untouched
pub type RawVersion = serde_json::Value;

/// Successful model service reply with the status it was sent with
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub status: StatusCode,
    pub body: T,
}
