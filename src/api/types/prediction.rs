//! Prediction request and response bodies

use serde::{Deserialize, Serialize};

use crate::domain::features::{FeatureVector, Scalar};
use crate::infrastructure::services::{PredictionOutcome, PredictionSource};

/// Body of `POST /v1/predict`
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub features: Vec<Scalar>,
    #[serde(default)]
    pub bypass_cache: bool,
}

impl PredictRequest {
    pub fn feature_vector(&self) -> FeatureVector {
        FeatureVector::new(self.features.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub source: PredictionSource,
    pub cache_key: String,
    pub model: String,
    pub version: String,
    pub pred_label: Option<u8>,
    pub prob: Option<f64>,
    pub latency_ms: f64,
    /// Unix seconds
    pub stored_at: i64,
    pub response: serde_json::Value,
}

impl From<PredictionOutcome> for PredictResponse {
    fn from(outcome: PredictionOutcome) -> Self {
        let record = outcome.record;

        Self {
            source: outcome.source,
            cache_key: outcome.cache_key.to_string(),
            model: record.model,
            version: record.version,
            pred_label: record.pred_label,
            prob: record.prob,
            latency_ms: record.latency_ms,
            stored_at: record.stored_at.timestamp(),
            response: record.response,
        }
    }
}

/// Body of `DELETE /admin/cache`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClearCacheResponse {
    pub deleted: usize,
}
