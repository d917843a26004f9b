//! Clear-cache command

use tracing::info;

use crate::api::types::ClearCacheResponse;
use crate::infrastructure::logging;

/// Delete every cached prediction and print the count as JSON
pub async fn run() -> anyhow::Result<()> {
    let config = super::load_config()?;
    logging::init_cli_logging(&config.logging);

    let service = crate::build_prediction_service(&config).await?;
    let deleted = service.clear_cache().await?;

    info!(deleted, namespace = %config.cache.namespace, "Prediction cache cleared");
    println!("{}", serde_json::to_string(&ClearCacheResponse { deleted })?);

    Ok(())
}
