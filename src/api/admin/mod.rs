//! Admin API endpoints

pub mod cache;

use axum::{routing::delete, Router};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new().route("/cache", delete(cache::clear_cache))
}
