//! Domain layer - Core prediction caching logic and entities

pub mod cache;
pub mod error;
pub mod features;
pub mod inference;

pub use cache::{
    Cache, CacheExt, CacheKey, CacheKeyGenerator, CacheRecord, HmacKeyGenerator,
};
pub use error::DomainError;
pub use features::{normalize, validate_features, FeatureVector, NormalizedFeatures, Scalar};
pub use inference::{
    extract_prediction, InferenceProtocol, InferenceProvider, InferenceResult, InputSpec,
    Prediction, ResponseShape,
};
