//! Application configuration

mod app_config;

pub use app_config::{
    AdminConfig, AppConfig, CacheSettings, InferenceConfig, LogFormat, LoggingConfig,
    ServerConfig, DEFAULT_CACHE_SECRET,
};
