//! Prediction record caching service

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::cache::{
    escape_glob, Cache, CacheExt, CacheKey, CacheRecord, DEFAULT_KEY_NAMESPACE,
};
use crate::domain::DomainError;

/// Default record lifetime (24h)
pub const DEFAULT_CACHE_TTL_SECS: i64 = 86_400;

/// Configuration for prediction caching
#[derive(Debug, Clone)]
pub struct PredictionCacheConfig {
    /// Namespace prefix of every prediction key
    pub namespace: String,
    /// Record lifetime, `None` keeps records until cleared
    pub ttl: Option<Duration>,
    /// Whether caching is enabled
    pub enabled: bool,
}

impl Default for PredictionCacheConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_KEY_NAMESPACE.to_string(),
            ttl: Some(Duration::from_secs(DEFAULT_CACHE_TTL_SECS as u64)),
            enabled: true,
        }
    }
}

impl PredictionCacheConfig {
    /// Sets the key namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the TTL from seconds; zero or negative disables expiry
    pub fn with_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.ttl = (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs as u64));
        self
    }

    /// Disables caching
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Availability of the prediction cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    /// Store reachable
    Available,
    /// Connectivity probe failed, caching is off for this process
    Unavailable,
    /// Turned off by configuration
    Disabled,
}

/// Store adapter for prediction records
///
/// Reads never fail: store errors degrade to a miss. Connectivity is probed once,
/// on first use, and a failed probe disables the store for the rest of the
/// process without reconnect attempts.
#[derive(Debug)]
pub struct PredictionCacheService {
    cache: Option<Arc<dyn Cache>>,
    config: PredictionCacheConfig,
    ready: OnceCell<bool>,
}

impl PredictionCacheService {
    /// Creates a new prediction cache service with default config
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self::with_config(cache, PredictionCacheConfig::default())
    }

    /// Creates a new prediction cache service with custom config
    pub fn with_config(cache: Arc<dyn Cache>, config: PredictionCacheConfig) -> Self {
        Self {
            cache: Some(cache),
            config,
            ready: OnceCell::new(),
        }
    }

    /// Creates a service with caching turned off
    pub fn disabled() -> Self {
        Self {
            cache: None,
            config: PredictionCacheConfig::default().disabled(),
            ready: OnceCell::new_with(Some(false)),
        }
    }

    /// Creates a service whose store could not be set up at all
    pub fn unavailable(config: PredictionCacheConfig, reason: &DomainError) -> Self {
        if config.enabled {
            warn!(error = %reason, "Cache store unavailable, continuing without cache");
        }

        Self {
            cache: None,
            config,
            ready: OnceCell::new_with(Some(false)),
        }
    }

    pub fn config(&self) -> &PredictionCacheConfig {
        &self.config
    }

    /// Checks if caching is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Current availability, running the readiness probe if it has not run yet
    pub async fn status(&self) -> CacheStatus {
        if !self.config.enabled {
            return CacheStatus::Disabled;
        }

        match self.store().await {
            Some(_) => CacheStatus::Available,
            None => CacheStatus::Unavailable,
        }
    }

    async fn store(&self) -> Option<&Arc<dyn Cache>> {
        if !self.config.enabled {
            return None;
        }

        let cache = self.cache.as_ref()?;

        let ready = *self
            .ready
            .get_or_init(|| async {
                match cache.ping().await {
                    Ok(()) => {
                        info!("Cache store ready");
                        true
                    }
                    Err(e) => {
                        warn!(error = %e, "Cache store unavailable, continuing without cache");
                        false
                    }
                }
            })
            .await;

        ready.then_some(cache)
    }

    /// Gets a cached record, `None` on miss, expiry or any store problem
    pub async fn get(&self, key: &CacheKey) -> Option<CacheRecord> {
        let cache = self.store().await?;

        match cache.get::<CacheRecord>(key.as_str()).await {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// Stores a record with the configured TTL, replacing any existing one
    pub async fn set(&self, key: &CacheKey, record: &CacheRecord) -> Result<(), DomainError> {
        if !self.config.enabled {
            return Ok(());
        }

        let cache = self
            .store()
            .await
            .ok_or_else(|| DomainError::store_unavailable("Cache store is not available"))?;

        cache.set(key.as_str(), record, self.config.ttl).await?;
        debug!(key = %key, ttl = ?self.config.ttl, "Cached prediction");

        Ok(())
    }

    /// Deletes every record in the namespace, returning how many were removed
    pub async fn clear_all(&self) -> Result<usize, DomainError> {
        if !self.config.enabled {
            return Ok(0);
        }

        let cache = self
            .store()
            .await
            .ok_or_else(|| DomainError::store_unavailable("Cache store is not available"))?;

        let pattern = format!("{}:*", escape_glob(&self.config.namespace));
        let deleted = cache.delete_pattern(&pattern).await?;

        info!(namespace = %self.config.namespace, deleted, "Prediction cache cleared");
        Ok(deleted)
    }
}
