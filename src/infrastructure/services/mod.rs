//! Infrastructure services

mod prediction_cache_service;
mod prediction_service;

pub use prediction_cache_service::{
    CacheStatus, PredictionCacheConfig, PredictionCacheService, DEFAULT_CACHE_TTL_SECS,
};
pub use prediction_service::{
    PredictOptions, PredictionOutcome, PredictionService, PredictionSource,
};
