//! Predict command - runs one prediction through the cache

use clap::Args;
use tracing::debug;

use crate::api::types::PredictResponse;
use crate::domain::features::{validate_features, FeatureVector, Scalar};
use crate::domain::DomainError;
use crate::infrastructure::logging;
use crate::infrastructure::services::PredictOptions;

/// Arguments for the predict command
#[derive(Args, Clone, Debug)]
pub struct PredictArgs {
    /// Feature values in model input order; integers stay integers
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    pub features: Vec<String>,

    /// Skip the cache lookup and always call the model
    #[arg(long)]
    pub bypass_cache: bool,
}

/// Run a single prediction and print it as JSON
pub async fn run(args: PredictArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    logging::init_cli_logging(&config.logging);

    let features = parse_features(&args.features)?;
    validate_features(&features, config.inference.feature_count)?;

    let service = crate::build_prediction_service(&config).await?;
    debug!(endpoint = %service.endpoint(), "Running prediction");

    let outcome = service
        .predict(
            &features,
            PredictOptions {
                bypass_cache: args.bypass_cache,
            },
        )
        .await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&PredictResponse::from(outcome))?
    );

    Ok(())
}

fn parse_features(raw: &[String]) -> Result<FeatureVector, DomainError> {
    raw.iter()
        .map(|value| value.parse::<Scalar>())
        .collect::<Result<Vec<_>, _>>()
        .map(FeatureVector::new)
}
