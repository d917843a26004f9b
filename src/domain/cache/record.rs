//! Cached prediction record

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::features::NormalizedFeatures;
use crate::domain::inference::Prediction;

/// A stored inference result
///
/// Written once after a successful remote call and never updated; it only
/// disappears through expiry or an explicit clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Model name the prediction was made with
    pub model: String,
    /// Model version, empty when not configured
    pub version: String,
    /// Normalized input the key was derived from
    pub features: NormalizedFeatures,
    /// Raw response payload of the inference endpoint
    #[serde(rename = "result_json")]
    pub response: serde_json::Value,
    /// Derived 0/1 label, absent for unrecognized response shapes
    pub pred_label: Option<u8>,
    /// Derived positive-class probability, when the response carried one
    pub prob: Option<f64>,
    /// Wall-clock latency of the remote call in milliseconds
    pub latency_ms: f64,
    /// When the record was created, whole seconds as stored
    #[serde(with = "chrono::serde::ts_seconds")]
    pub stored_at: DateTime<Utc>,
}

impl CacheRecord {
    pub fn new(
        model: impl Into<String>,
        version: impl Into<String>,
        features: NormalizedFeatures,
        response: serde_json::Value,
        prediction: Prediction,
        latency_ms: f64,
    ) -> Self {
        Self {
            model: model.into(),
            version: version.into(),
            features,
            response,
            pred_label: prediction.label,
            prob: prediction.probability,
            latency_ms,
            stored_at: Utc::now().trunc_subsecs(0),
        }
    }
}
