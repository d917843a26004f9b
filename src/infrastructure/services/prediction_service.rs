//! Prediction service - cache-aside orchestration of remote inference

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::prediction_cache_service::{CacheStatus, PredictionCacheService};
use crate::domain::cache::{CacheKey, CacheKeyGenerator, CacheRecord};
use crate::domain::features::{normalize, FeatureVector};
use crate::domain::inference::InferenceProvider;
use crate::domain::DomainError;
use crate::infrastructure::observability;

/// Per-call options
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictOptions {
    /// Skip the lookup and always call the model; the result is still cached
    pub bypass_cache: bool,
}

impl PredictOptions {
    pub fn bypass() -> Self {
        Self { bypass_cache: true }
    }
}

/// Where a prediction came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    Cache,
    Remote,
}

impl std::fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictionSource::Cache => write!(f, "cache"),
            PredictionSource::Remote => write!(f, "remote"),
        }
    }
}

/// Result of a prediction request
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub source: PredictionSource,
    pub record: CacheRecord,
    pub cache_key: CacheKey,
}

/// Serves predictions from the cache when possible, from the model otherwise
///
/// Concurrent requests for the same uncached input each call the model; the
/// last write wins.
#[derive(Debug)]
pub struct PredictionService {
    provider: Arc<dyn InferenceProvider>,
    cache: Arc<PredictionCacheService>,
    key_generator: Arc<dyn CacheKeyGenerator>,
    model_name: String,
    model_version: String,
}

impl PredictionService {
    pub fn new(
        provider: Arc<dyn InferenceProvider>,
        cache: Arc<PredictionCacheService>,
        key_generator: Arc<dyn CacheKeyGenerator>,
        model_name: impl Into<String>,
        model_version: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            cache,
            key_generator,
            model_name: model_name.into(),
            model_version: model_version.into(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Endpoint of the underlying inference provider
    pub fn endpoint(&self) -> &str {
        self.provider.endpoint()
    }

    pub async fn cache_status(&self) -> CacheStatus {
        self.cache.status().await
    }

    /// Derives the cache key a feature vector maps to
    pub fn cache_key(&self, features: &FeatureVector) -> CacheKey {
        let normalized = normalize(features);
        self.key_generator
            .derive(&self.model_name, &self.model_version, &normalized)
    }

    /// Returns a prediction for the feature vector
    ///
    /// Only remote failures surface as errors; store problems degrade to a
    /// plain remote call.
    pub async fn predict(
        &self,
        features: &FeatureVector,
        options: PredictOptions,
    ) -> Result<PredictionOutcome, DomainError> {
        let normalized = normalize(features);
        let cache_key = self
            .key_generator
            .derive(&self.model_name, &self.model_version, &normalized);

        if options.bypass_cache {
            debug!(key = %cache_key, "Cache bypass requested");
        } else if let Some(record) = self.cache.get(&cache_key).await {
            debug!(key = %cache_key, "Cache hit");
            observability::record_cache_lookup(true);

            return Ok(PredictionOutcome {
                source: PredictionSource::Cache,
                record,
                cache_key,
            });
        } else {
            debug!(key = %cache_key, "Cache miss");
            observability::record_cache_lookup(false);
        }

        let result = self.provider.infer(features).await?;

        let record = CacheRecord::new(
            self.model_name.clone(),
            self.model_version.clone(),
            normalized,
            result.response,
            result.prediction,
            result.latency_ms,
        );

        if let Err(e) = self.cache.set(&cache_key, &record).await {
            warn!(key = %cache_key, error = %e, "Cache write failed");
            observability::record_cache_write_failure();
        }

        Ok(PredictionOutcome {
            source: PredictionSource::Remote,
            record,
            cache_key,
        })
    }

    /// Removes every cached prediction in the namespace
    pub async fn clear_cache(&self) -> Result<usize, DomainError> {
        self.cache.clear_all().await
    }
}
