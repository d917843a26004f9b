use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::admin;
use super::health;
use super::middleware::metrics_middleware;
use super::state::AppState;
use super::v1;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/v1", v1::create_v1_router())
        .nest("/admin", admin::create_admin_router())
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::cache::{HmacKeyGenerator, MockCache};
    use crate::domain::inference::{InferenceResult, MockInferenceProvider, Prediction};
    use crate::domain::DomainError;
    use crate::infrastructure::cache::InMemoryCache;
    use crate::infrastructure::services::{
        PredictionCacheConfig, PredictionCacheService, PredictionService,
    };

    const FEATURES: &str = r#"[2, 88.0, 60.0, 35.0, 1.0, 45.7, 0.27, 20]"#;

    fn remote_ok() -> InferenceResult {
        InferenceResult {
            response: json!({"outputs": [{"data": [[0.82]]}]}),
            latency_ms: 7.0,
            prediction: Prediction {
                shape: None,
                label: Some(1),
                probability: Some(0.82),
            },
        }
    }

    fn state_with(provider: MockInferenceProvider, cache: PredictionCacheService) -> AppState {
        let service = PredictionService::new(
            Arc::new(provider),
            Arc::new(cache),
            Arc::new(HmacKeyGenerator::new("test-secret")),
            "diabetes-s3-model-serving",
            "",
        );

        AppState::new(Arc::new(service))
            .with_feature_count(Some(8))
            .with_admin_token(Some("admin-token"))
    }

    fn app(provider: MockInferenceProvider) -> Router {
        create_router(state_with(
            provider,
            PredictionCacheService::new(Arc::new(InMemoryCache::new())),
        ))
    }

    fn predict_request(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/predict")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(MockInferenceProvider::new())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_predict_then_cache_hit() {
        let mut provider = MockInferenceProvider::new();
        provider.expect_infer().times(1).returning(|_| Ok(remote_ok()));
        let app = app(provider);

        let body = format!(r#"{{"features": {}}}"#, FEATURES);

        let first = app.clone().oneshot(predict_request(body.clone())).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let first = body_json(first).await;
        assert_eq!(first["source"], "remote");
        assert_eq!(first["pred_label"], 1);
        assert_eq!(first["prob"], 0.82);
        assert_eq!(
            first["cache_key"],
            "diabetes:infer:35ed22e93e68b733081656aac3deee5de4464206bd78d7dd938640786b7993bd"
        );

        let second = body_json(app.oneshot(predict_request(body)).await.unwrap()).await;
        assert_eq!(second["source"], "cache");
        assert_eq!(second["response"], first["response"]);
        assert_eq!(second["stored_at"], first["stored_at"]);
    }

    #[tokio::test]
    async fn test_predict_bypass_cache() {
        let mut provider = MockInferenceProvider::new();
        provider.expect_infer().times(2).returning(|_| Ok(remote_ok()));
        let app = app(provider);

        let body = format!(r#"{{"features": {}, "bypass_cache": true}}"#, FEATURES);

        for _ in 0..2 {
            let response = app.clone().oneshot(predict_request(body.clone())).await.unwrap();
            assert_eq!(body_json(response).await["source"], "remote");
        }
    }

    #[tokio::test]
    async fn test_predict_wrong_arity_is_rejected_before_inference() {
        let mut provider = MockInferenceProvider::new();
        provider.expect_infer().never();

        let response = app(provider)
            .oneshot(predict_request(r#"{"features": [1, 2, 3]}"#.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(body["error"]["param"], "features");
    }

    #[tokio::test]
    async fn test_predict_malformed_body() {
        let response = app(MockInferenceProvider::new())
            .oneshot(predict_request(r#"{"features": "abc"}"#.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "invalid_body");
    }

    #[tokio::test]
    async fn test_predict_remote_failure_maps_to_bad_gateway() {
        let mut provider = MockInferenceProvider::new();
        provider
            .expect_infer()
            .returning(|_| Err(DomainError::remote_status(500, "HTTP 500: boom")));

        let response = app(provider)
            .oneshot(predict_request(format!(r#"{{"features": {}}}"#, FEATURES)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_predict_remote_timeout_maps_to_gateway_timeout() {
        let mut provider = MockInferenceProvider::new();
        provider
            .expect_infer()
            .returning(|_| Err(DomainError::remote_timeout("timed out after 15s")));

        let response = app(provider)
            .oneshot(predict_request(format!(r#"{{"features": {}}}"#, FEATURES)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    fn clear_request(header: Option<(&str, &str)>) -> Request<Body> {
        let mut builder = Request::builder().method("DELETE").uri("/admin/cache");
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_clear_cache_requires_token() {
        let app = app(MockInferenceProvider::new());

        let missing = app.clone().oneshot(clear_request(None)).await.unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let wrong = app
            .oneshot(clear_request(Some(("authorization", "Bearer nope"))))
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_clear_cache_refused_without_configured_token() {
        let state = state_with(
            MockInferenceProvider::new(),
            PredictionCacheService::new(Arc::new(InMemoryCache::new())),
        )
        .with_admin_token(None);

        let response = create_router(state)
            .oneshot(clear_request(Some(("x-admin-token", "anything"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_next_prediction_remote() {
        let mut provider = MockInferenceProvider::new();
        provider.expect_infer().times(2).returning(|_| Ok(remote_ok()));
        let app = app(provider);
        let body = format!(r#"{{"features": {}}}"#, FEATURES);

        app.clone().oneshot(predict_request(body.clone())).await.unwrap();

        let cleared = app
            .clone()
            .oneshot(clear_request(Some(("x-admin-token", "admin-token"))))
            .await
            .unwrap();
        assert_eq!(cleared.status(), StatusCode::OK);
        assert_eq!(body_json(cleared).await, json!({"deleted": 1}));

        let response = body_json(app.oneshot(predict_request(body)).await.unwrap()).await;
        assert_eq!(response["source"], "remote");
    }

    #[tokio::test]
    async fn test_ready_reports_degraded_cache() {
        let app = create_router(state_with(
            MockInferenceProvider::new(),
            PredictionCacheService::with_config(
                Arc::new(MockCache::new().with_ping_error("connection refused")),
                PredictionCacheConfig::default(),
            ),
        ));

        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["checks"][0]["name"], "cache");
    }
}
