//! HTTP API types

pub mod error;
pub mod json;
pub mod prediction;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use prediction::{ClearCacheResponse, PredictRequest, PredictResponse};
