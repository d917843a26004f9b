use std::time::Duration;

use serde::Deserialize;

use crate::domain::inference::{InferenceProtocol, InputSpec};
use crate::domain::DomainError;
use crate::infrastructure::cache::{CacheType, RedisCacheConfig};
use crate::infrastructure::observability::MetricsConfig;

/// HMAC secret used when none is configured
pub const DEFAULT_CACHE_SECRET: &str = "change-me";

/// Flat environment variables of older deployments, mapped onto config keys
const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("INFERENCE_URL", "inference.url"),
    ("INFERENCE_BASE", "inference.base_url"),
    ("INFERENCE_PROTOCOL", "inference.protocol"),
    ("MODEL_NAME", "inference.model_name"),
    ("MODEL_VERSION", "inference.model_version"),
    ("INPUT_NAME", "inference.input_name"),
    ("INPUT_DATATYPE", "inference.input_datatype"),
    ("TIMEOUT_SECONDS", "inference.timeout_secs"),
    ("VERIFY_TLS", "inference.verify_tls"),
    ("REDIS_HOST", "cache.host"),
    ("REDIS_PORT", "cache.port"),
    ("REDIS_DB", "cache.db"),
    ("CACHE_TTL_SECONDS", "cache.ttl_secs"),
    ("CACHE_ENABLED", "cache.enabled"),
    ("CACHE_SECRET", "cache.secret"),
    ("CACHE_NAMESPACE", "cache.namespace"),
    ("CACHE_TYPE", "cache.backend"),
    ("ADMIN_TOKEN", "admin.token"),
];

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Remote model endpoint settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Full endpoint URL, takes precedence over `base_url`
    pub url: Option<String>,
    /// Server base URL, the protocol path is appended
    pub base_url: Option<String>,
    pub protocol: InferenceProtocol,
    pub model_name: String,
    /// Optional version, part of the cache key
    pub model_version: String,
    pub input_name: String,
    pub input_datatype: String,
    /// Expected number of features per request, unchecked when absent
    pub feature_count: Option<usize>,
    pub timeout_secs: f64,
    pub verify_tls: bool,
}

/// Prediction cache settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub backend: CacheType,
    pub host: String,
    pub port: u16,
    pub db: i64,
    /// Record lifetime in seconds, zero or negative keeps records until cleared
    pub ttl_secs: i64,
    pub secret: String,
    pub namespace: String,
    pub connect_timeout_secs: u64,
    /// Entry limit of the in-memory backend
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Token required by admin endpoints; admin endpoints are refused when unset
    pub token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            url: None,
            base_url: None,
            protocol: InferenceProtocol::default(),
            model_name: "diabetes-s3-model-serving".to_string(),
            model_version: String::new(),
            input_name: "predict".to_string(),
            input_datatype: "FP32".to_string(),
            feature_count: None,
            timeout_secs: 15.0,
            verify_tls: true,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: CacheType::Redis,
            host: "redis".to_string(),
            port: 6379,
            db: 0,
            ttl_secs: 86_400,
            secret: DEFAULT_CACHE_SECRET.to_string(),
            namespace: crate::domain::cache::DEFAULT_KEY_NAMESPACE.to_string(),
            connect_timeout_secs: 5,
            max_capacity: 10_000,
        }
    }
}

impl InferenceConfig {
    /// Resolves the endpoint the gateway posts to
    pub fn endpoint(&self) -> Result<String, DomainError> {
        if let Some(url) = non_empty(&self.url) {
            return Ok(url.to_string());
        }

        match non_empty(&self.base_url) {
            Some(base) => Ok(self.protocol.endpoint(base, self.model_name.trim())),
            None => Err(DomainError::configuration(
                "Either inference.url (INFERENCE_URL) or inference.base_url (INFERENCE_BASE) must be set",
            )),
        }
    }

    pub fn input_spec(&self) -> InputSpec {
        InputSpec::new(self.input_name.trim(), self.input_datatype.trim())
    }

    pub fn timeout(&self) -> Result<Duration, DomainError> {
        Duration::try_from_secs_f64(self.timeout_secs).map_err(|_| {
            DomainError::configuration(format!(
                "Invalid inference timeout: {}",
                self.timeout_secs
            ))
        })
    }
}

impl CacheSettings {
    pub fn redis_url(&self) -> String {
        RedisCacheConfig::from_parts(&self.host, self.port, self.db).url
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_CACHE_SECRET
    }
}

impl AdminConfig {
    /// Configured token, blank values count as unset
    pub fn token(&self) -> Option<&str> {
        non_empty(&self.token)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = with_legacy_overrides(builder, |name| std::env::var(name).ok())?.build()?;

        config.try_deserialize()
    }
}

/// Applies the flat legacy variables on top of every other source
fn with_legacy_overrides<F>(
    mut builder: config::ConfigBuilder<config::builder::DefaultState>,
    lookup: F,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for (var, key) in LEGACY_ENV_OVERRIDES {
        let value = lookup(var).map(|v| v.trim().to_string());
        builder = builder.set_override_option(*key, value)?;
    }

    Ok(builder)
}
