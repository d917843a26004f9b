//! Admin authentication extractor

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;

/// Extractor that requires the configured admin token
///
/// The token is read from either:
/// - Authorization header: `Bearer <token>`
/// - X-Admin-Token header: `<token>`
///
/// Without a configured token every admin request is refused.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_token.as_deref() else {
            warn!("Admin request refused, no admin token configured");
            return Err(ApiError::forbidden(
                "Admin endpoints are disabled. Configure admin.token (ADMIN_TOKEN) to enable them",
            ));
        };

        let provided = extract_token_from_headers(&parts.headers)?;

        if !constant_time_compare(&provided, expected) {
            return Err(ApiError::unauthorized("Invalid admin token"));
        }

        debug!("Admin access granted");
        Ok(RequireAdmin)
    }
}

fn extract_token_from_headers(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    if let Some(token_header) = headers.get("x-admin-token") {
        let token = token_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid X-Admin-Token header encoding"))?;

        return Ok(token.trim().to_string());
    }

    Err(ApiError::unauthorized(
        "Admin token required. Provide via 'Authorization: Bearer <token>' or 'X-Admin-Token: <token>' header",
    ))
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
