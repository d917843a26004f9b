//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::PredictionService;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub prediction_service: Arc<PredictionService>,
    /// Expected features per request, unchecked when `None`
    pub feature_count: Option<usize>,
    /// Token guarding admin endpoints; admin endpoints are refused when `None`
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(prediction_service: Arc<PredictionService>) -> Self {
        Self {
            prediction_service,
            feature_count: None,
            admin_token: None,
        }
    }

    pub fn with_feature_count(mut self, feature_count: Option<usize>) -> Self {
        self.feature_count = feature_count;
        self
    }

    pub fn with_admin_token(mut self, token: Option<&str>) -> Self {
        self.admin_token = token.map(Arc::from);
        self
    }
}
