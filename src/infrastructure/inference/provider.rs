//! HTTP inference provider

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::http_client::HttpClientTrait;
use crate::domain::features::FeatureVector;
use crate::domain::inference::{
    extract_prediction, InferenceProtocol, InferenceProvider, InferenceResult, InputSpec,
};
use crate::domain::DomainError;
use crate::infrastructure::observability;

/// Provider calling a model server over HTTP
#[derive(Debug)]
pub struct HttpInferenceProvider<C: HttpClientTrait> {
    client: C,
    endpoint: String,
    protocol: InferenceProtocol,
    input: InputSpec,
    model_name: String,
}

impl<C: HttpClientTrait> HttpInferenceProvider<C> {
    pub fn new(
        client: C,
        endpoint: impl Into<String>,
        protocol: InferenceProtocol,
        input: InputSpec,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            protocol,
            input,
            model_name: String::new(),
        }
    }

    /// Sets the model name used in metric labels
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }
}

#[async_trait]
impl<C: HttpClientTrait> InferenceProvider for HttpInferenceProvider<C> {
    async fn infer(&self, features: &FeatureVector) -> Result<InferenceResult, DomainError> {
        let request = self.protocol.build_request(&self.input, features);
        let body = serde_json::to_value(&request).map_err(|e| {
            DomainError::internal(format!("Failed to serialize inference request: {}", e))
        })?;

        let started = Instant::now();
        let result = self.client.post_json(&self.endpoint, &body).await;
        let elapsed = started.elapsed();

        observability::record_inference_request(&self.model_name, elapsed, result.is_ok());

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "Inference call failed");
                return Err(e);
            }
        };

        let latency_ms = elapsed.as_secs_f64() * 1000.0;
        let prediction = extract_prediction(self.protocol, &response);

        if !prediction.is_recognized() {
            debug!(
                endpoint = %self.endpoint,
                "Response shape unrecognized, returning raw payload without prediction"
            );
        }

        info!(
            endpoint = %self.endpoint,
            latency_ms,
            label = ?prediction.label,
            "Inference OK"
        );

        Ok(InferenceResult {
            response,
            latency_ms,
            prediction,
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::features::Scalar;
    use crate::domain::inference::ResponseShape;
    use crate::infrastructure::inference::http_client::mock::MockHttpClient;
    use serde_json::json;

    const TEST_URL: &str = "http://models.local/v2/models/diabetes-s3-model-serving/infer";

    fn features() -> FeatureVector {
        FeatureVector::new(vec![
            Scalar::Int(2),
            Scalar::Float(88.0),
            Scalar::Float(60.0),
            Scalar::Float(35.0),
            Scalar::Float(1.0),
            Scalar::Float(45.7),
            Scalar::Float(0.27),
            Scalar::Int(20),
        ])
    }

    fn provider(client: MockHttpClient) -> HttpInferenceProvider<MockHttpClient> {
        HttpInferenceProvider::new(client, TEST_URL, InferenceProtocol::V2, InputSpec::default())
    }

    #[tokio::test]
    async fn test_infer_sends_envelope_and_extracts() {
        let client = MockHttpClient::new()
            .with_response(TEST_URL, json!({"outputs": [{"name": "out", "data": [[0.82]]}]}));
        let provider = provider(client);

        let result = provider.infer(&features()).await.unwrap();

        assert_eq!(result.prediction.shape, Some(ResponseShape::SingleProbability));
        assert_eq!(result.prediction.probability, Some(0.82));
        assert_eq!(result.prediction.label, Some(1));
        assert!(result.latency_ms >= 0.0);

        assert_eq!(
            provider.client.requests(),
            vec![json!({
                "inputs": [{
                    "name": "predict",
                    "shape": [1, 8],
                    "datatype": "FP32",
                    "data": [[2, 88.0, 60.0, 35.0, 1.0, 45.7, 0.27, 20]]
                }]
            })]
        );
    }

    #[tokio::test]
    async fn test_infer_unrecognized_shape_still_succeeds() {
        let payload = json!({"outputs": [{"data": [["a", "b", "c"]]}]});
        let client = MockHttpClient::new().with_response(TEST_URL, payload.clone());

        let result = provider(client).infer(&features()).await.unwrap();

        assert_eq!(result.response, payload);
        assert!(!result.prediction.is_recognized());
        assert_eq!(result.prediction.label, None);
    }

    #[tokio::test]
    async fn test_infer_error_is_not_retried() {
        let client = MockHttpClient::new().with_status_error(TEST_URL, 500, "HTTP 500: boom");
        let provider = provider(client);

        let err = provider.infer(&features()).await.unwrap_err();

        assert!(matches!(err, DomainError::RemoteCall { status: Some(500), .. }));
        assert_eq!(provider.client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_infer_v1_protocol() {
        let url = "http://models.local/v1/models/iris:predict";
        let client = MockHttpClient::new().with_response(url, json!({"predictions": [1]}));
        let provider =
            HttpInferenceProvider::new(client, url, InferenceProtocol::V1, InputSpec::default());

        let result = provider.infer(&features()).await.unwrap();

        assert_eq!(result.prediction.label, Some(1));
        assert_eq!(
            provider.client.requests()[0],
            json!({"instances": [[2, 88.0, 60.0, 35.0, 1.0, 45.7, 0.27, 20]]})
        );
    }
}
