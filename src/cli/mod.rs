//! CLI module for the inference cache gateway
//!
//! Subcommands:
//! - `serve`: HTTP API server
//! - `predict`: one prediction through the cache, printed as JSON
//! - `clear-cache`: delete every cached prediction

pub mod clear;
pub mod predict;
pub mod serve;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// Inference Cache Gateway - read-through caching for remote model inference
#[derive(Parser)]
#[command(name = "inference-cache-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Run a single prediction and print the result
    Predict(predict::PredictArgs),

    /// Delete every cached prediction in the configured namespace
    ClearCache,
}

/// Loads `.env` and the layered configuration
pub(crate) fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    AppConfig::load().context("Failed to load configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_predict_command() {
        let cli = Cli::try_parse_from([
            "inference-cache-gateway",
            "predict",
            "--bypass-cache",
            "2",
            "88.0",
            "-1.5",
        ])
        .unwrap();

        match cli.command {
            Command::Predict(args) => {
                assert!(args.bypass_cache);
                assert_eq!(args.features, vec!["2", "88.0", "-1.5"]);
            }
            _ => panic!("expected predict command"),
        }
    }

    #[test]
    fn test_parse_clear_cache_command() {
        let cli = Cli::try_parse_from(["inference-cache-gateway", "clear-cache"]).unwrap();
        assert!(matches!(cli.command, Command::ClearCache));
    }

    #[test]
    fn test_predict_requires_features() {
        assert!(Cli::try_parse_from(["inference-cache-gateway", "predict"]).is_err());
    }
}
