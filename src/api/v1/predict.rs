//! Prediction endpoint handler

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PredictRequest, PredictResponse};
use crate::domain::features::validate_features;
use crate::infrastructure::services::PredictOptions;

/// POST /v1/predict
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let features = request.feature_vector();

    validate_features(&features, state.feature_count)
        .map_err(|e| ApiError::from(e).with_param("features"))?;

    debug!(
        features = features.len(),
        bypass_cache = request.bypass_cache,
        "Prediction requested"
    );

    let outcome = state
        .prediction_service
        .predict(
            &features,
            PredictOptions {
                bypass_cache: request.bypass_cache,
            },
        )
        .await?;

    Ok(Json(PredictResponse::from(outcome)))
}
