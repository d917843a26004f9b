//! Inference Cache Gateway
//!
//! Read-through caching in front of a remote model inference endpoint:
//! - Feature normalization and HMAC-derived cache keys
//! - Redis or in-memory record storage with TTL
//! - KServe v1 and v2 (open inference protocol) endpoints
//! - Graceful degradation when the cache store is unavailable

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use crate::config::{CacheSettings, InferenceConfig};
use domain::cache::HmacKeyGenerator;
use domain::inference::InferenceProvider;
use domain::DomainError;
use infrastructure::cache::{CacheConfig, CacheFactory, CacheType};
use infrastructure::inference::{HttpClient, HttpInferenceProvider};
use infrastructure::services::{PredictionCacheConfig, PredictionCacheService, PredictionService};
use tracing::{info, warn};

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let prediction_service = build_prediction_service(config).await?;

    if config.admin.token().is_none() {
        info!("No admin token configured, admin endpoints are disabled");
    }

    Ok(AppState::new(Arc::new(prediction_service))
        .with_feature_count(config.inference.feature_count)
        .with_admin_token(config.admin.token()))
}

/// Wires the prediction service from configuration
///
/// Fails only on invalid inference settings; cache store problems degrade to
/// running without a cache.
pub async fn build_prediction_service(config: &AppConfig) -> anyhow::Result<PredictionService> {
    let provider = build_inference_provider(&config.inference)?;
    info!(
        endpoint = %provider.endpoint(),
        model = %config.inference.model_name,
        protocol = %config.inference.protocol,
        "Inference provider configured"
    );

    let cache = build_cache_service(&config.cache).await;

    if config.cache.enabled && config.cache.uses_default_secret() {
        warn!("cache.secret (CACHE_SECRET) is the built-in default, configure a deployment secret");
    }

    let key_generator =
        HmacKeyGenerator::with_namespace(config.cache.secret.as_bytes(), &config.cache.namespace);

    Ok(PredictionService::new(
        Arc::new(provider),
        Arc::new(cache),
        Arc::new(key_generator),
        config.inference.model_name.trim(),
        config.inference.model_version.trim(),
    ))
}

fn build_inference_provider(
    inference: &InferenceConfig,
) -> Result<HttpInferenceProvider<HttpClient>, DomainError> {
    let endpoint = inference.endpoint()?;
    let client = HttpClient::new(inference.timeout()?, inference.verify_tls)?;

    if !inference.verify_tls {
        warn!("TLS verification disabled for inference endpoint");
    }

    Ok(
        HttpInferenceProvider::new(client, endpoint, inference.protocol, inference.input_spec())
            .with_model_name(inference.model_name.trim()),
    )
}

async fn build_cache_service(settings: &CacheSettings) -> PredictionCacheService {
    if !settings.enabled {
        info!("Prediction cache disabled by configuration");
        return PredictionCacheService::disabled();
    }

    let cache_config = PredictionCacheConfig::default()
        .with_namespace(settings.namespace.clone())
        .with_ttl_secs(settings.ttl_secs);

    let factory_config = match settings.backend {
        CacheType::InMemory => CacheConfig::in_memory().with_max_capacity(settings.max_capacity),
        CacheType::Redis => CacheConfig::redis(settings.redis_url())
            .with_connection_timeout(settings.connect_timeout()),
    };

    match CacheFactory::new().create(&factory_config).await {
        Ok(cache) => {
            info!(
                backend = %settings.backend,
                namespace = %settings.namespace,
                ttl_secs = settings.ttl_secs,
                "Prediction cache configured"
            );
            PredictionCacheService::with_config(cache, cache_config)
        }
        Err(e) => PredictionCacheService::unavailable(cache_config, &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::services::CacheStatus;

    fn local_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.inference.base_url = Some("http://127.0.0.1:9".to_string());
        config.cache.backend = CacheType::InMemory;
        config
    }

    #[tokio::test]
    async fn test_build_with_in_memory_cache() {
        let service = build_prediction_service(&local_config()).await.unwrap();

        assert_eq!(
            service.endpoint(),
            "http://127.0.0.1:9/v2/models/diabetes-s3-model-serving/infer"
        );
        assert_eq!(service.cache_status().await, CacheStatus::Available);
    }

    #[tokio::test]
    async fn test_build_requires_inference_endpoint() {
        let mut config = local_config();
        config.inference.base_url = None;

        assert!(build_prediction_service(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_disabled_cache() {
        let mut config = local_config();
        config.cache.enabled = false;

        let service = build_prediction_service(&config).await.unwrap();
        assert_eq!(service.cache_status().await, CacheStatus::Disabled);
    }

    #[tokio::test]
    async fn test_unreachable_redis_degrades() {
        let mut config = local_config();
        config.cache.backend = CacheType::Redis;
        config.cache.host = "127.0.0.1".to_string();
        config.cache.port = 9;
        config.cache.connect_timeout_secs = 1;

        let service = build_prediction_service(&config).await.unwrap();
        assert_eq!(service.cache_status().await, CacheStatus::Unavailable);
    }

    #[tokio::test]
    async fn test_app_state_carries_admin_token_and_arity() {
        let mut config = local_config();
        config.inference.feature_count = Some(8);
        config.admin.token = Some("admin".to_string());

        let state = create_app_state_with_config(&config).await.unwrap();

        assert_eq!(state.feature_count, Some(8));
        assert_eq!(state.admin_token.as_deref(), Some("admin"));
    }
}
