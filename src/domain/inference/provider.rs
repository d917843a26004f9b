//! Inference provider trait

use async_trait::async_trait;
use serde_json::Value;

use super::extract::Prediction;
use crate::domain::features::FeatureVector;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Outcome of a successful remote inference call
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceResult {
    /// Raw response payload, delivered even when no prediction could be extracted
    pub response: Value,
    /// Wall-clock latency of the call in milliseconds
    pub latency_ms: f64,
    pub prediction: Prediction,
}

/// Remote model inference
///
/// Implementations issue exactly one call per invocation; retry policy belongs
/// to the caller.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InferenceProvider: Send + Sync + std::fmt::Debug {
    /// Runs the model on a single feature vector
    async fn infer(&self, features: &FeatureVector) -> Result<InferenceResult, DomainError>;

    /// Endpoint the provider calls
    fn endpoint(&self) -> &str;
}
