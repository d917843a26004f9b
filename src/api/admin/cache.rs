//! Cache management handlers

use axum::extract::State;
use tracing::info;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, ClearCacheResponse, Json};

/// DELETE /admin/cache
pub async fn clear_cache(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<ClearCacheResponse>, ApiError> {
    let deleted = state.prediction_service.clear_cache().await?;

    info!(deleted, "Admin cleared prediction cache");

    Ok(Json(ClearCacheResponse { deleted }))
}
