//! Translation of raw model output into the public response shape
//!
//! The mapping is deliberately lenient: only an exact `1` is positive and
//! every other value, including out-of-range or fractional scores, maps to
//! negative. Confidence is copied through without range checks. Tightening
//! either rule would change what callers see for existing backends.

use crate::backend::RawPrediction;
use serde::{Deserialize, Serialize};

/// Public sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    /// Map a raw model score to a label
    pub fn from_score(sentiment: f64) -> Self {
        if sentiment == 1.0 {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
        }
    }
}

/// Response body for a successful `/predict`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub sentiment_label: SentimentLabel,
    pub confidence: f64,
}

/// Normalize a raw prediction
pub fn normalize(raw: &RawPrediction) -> PredictionResult {
    PredictionResult {
        sentiment_label: SentimentLabel::from_score(raw.sentiment),
        confidence: raw.confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw(sentiment: f64, confidence: f64) -> RawPrediction {
        RawPrediction {
            sentiment,
            confidence,
        }
    }

    #[test]
    fn one_is_positive() {
        let result = normalize(&raw(1.0, 0.91));
        assert_eq!(result.sentiment_label, SentimentLabel::Positive);
        assert_eq!(result.confidence, 0.91);
    }

    #[test]
    fn zero_is_negative() {
        let result = normalize(&raw(0.0, 0.77));
        assert_eq!(result.sentiment_label, SentimentLabel::Negative);
        assert_eq!(result.confidence, 0.77);
    }

    #[test]
    fn unexpected_scores_are_negative() {
        for score in [2.0, -1.0, 0.5, 0.999, f64::NAN] {
            assert_eq!(
                normalize(&raw(score, 0.5)).sentiment_label,
                SentimentLabel::Negative,
                "score {} should map to negative",
                score
            );
        }
    }

    #[test]
    fn serializes_to_public_shape() {
        let body = serde_json::to_value(normalize(&raw(1.0, 0.88))).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "sentiment_label": "positive", "confidence": 0.88 })
        );
    }

    #[test]
    fn label_as_str_matches_serde() {
        for label in [SentimentLabel::Positive, SentimentLabel::Negative] {
            let json = serde_json::to_value(label).unwrap();
            assert_eq!(json, label.as_str());
        }
    }

    proptest! {
        #[test]
        fn confidence_is_copied_unchanged(confidence in -10.0f64..10.0, positive in any::<bool>()) {
            let sentiment = if positive { 1.0 } else { 0.0 };
            let result = normalize(&raw(sentiment, confidence));
            prop_assert_eq!(result.confidence, confidence);
        }

        #[test]
        fn only_exact_one_is_positive(sentiment in -100.0f64..100.0) {
            let expected = if sentiment == 1.0 {
                SentimentLabel::Positive
            } else {
                SentimentLabel::Negative
            };
            prop_assert_eq!(normalize(&raw(sentiment, 0.5)).sentiment_label, expected);
        }

        #[test]
        fn integer_scores_other_than_one_are_negative(sentiment in any::<i32>().prop_filter("not one", |s| *s != 1)) {
            prop_assert_eq!(
                normalize(&raw(sentiment as f64, 0.5)).sentiment_label,
                SentimentLabel::Negative
            );
        }
    }
}
