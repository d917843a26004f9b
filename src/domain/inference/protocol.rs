//! Inference wire protocols

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::features::{FeatureVector, Scalar};
use crate::domain::DomainError;

/// Protocol spoken by the remote inference endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferenceProtocol {
    /// `{"instances": [...]}` in, `{"predictions": [...]}` out
    V1,
    /// Open inference protocol, `{"inputs": [...]}` in, `{"outputs": [...]}` out
    #[default]
    V2,
}

impl std::fmt::Display for InferenceProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceProtocol::V1 => write!(f, "v1"),
            InferenceProtocol::V2 => write!(f, "v2"),
        }
    }
}

impl std::str::FromStr for InferenceProtocol {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "v1" => Ok(InferenceProtocol::V1),
            "v2" => Ok(InferenceProtocol::V2),
            _ => Err(DomainError::configuration(format!(
                "Unknown inference protocol: {}. Valid protocols: v1, v2",
                s
            ))),
        }
    }
}

impl InferenceProtocol {
    /// Endpoint path for a model below a base URL
    pub fn endpoint(&self, base_url: &str, model_name: &str) -> String {
        let base = base_url.trim_end_matches('/');

        match self {
            InferenceProtocol::V1 => format!("{}/v1/models/{}:predict", base, model_name),
            InferenceProtocol::V2 => format!("{}/v2/models/{}/infer", base, model_name),
        }
    }

    /// Builds the request body for a single feature vector
    pub fn build_request(&self, input: &InputSpec, features: &FeatureVector) -> InferenceRequest {
        let row = features.values().to_vec();

        match self {
            InferenceProtocol::V1 => InferenceRequest::V1 {
                instances: vec![row],
            },
            InferenceProtocol::V2 => InferenceRequest::V2 {
                inputs: vec![TensorInput {
                    name: input.name.clone(),
                    shape: vec![1, features.len()],
                    datatype: input.datatype.clone(),
                    data: vec![row],
                }],
            },
        }
    }

    /// Locates the first prediction datum of a response payload
    ///
    /// A bare scalar `data` / `predictions` field is its own first datum.
    pub fn first_datum<'a>(&self, response: &'a Value) -> Option<&'a Value> {
        let data = match self {
            InferenceProtocol::V1 => response.get("predictions")?,
            InferenceProtocol::V2 => response.get("outputs")?.get(0)?.get("data")?,
        };

        match data {
            Value::Array(items) => items.first(),
            Value::Number(_) => Some(data),
            _ => None,
        }
    }
}

/// Name and declared datatype of the model input tensor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub name: String,
    pub datatype: String,
}

impl InputSpec {
    pub fn new(name: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            datatype: datatype.into(),
        }
    }
}

impl Default for InputSpec {
    fn default() -> Self {
        Self::new("predict", "FP32")
    }
}

/// A named input tensor of the v2 protocol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TensorInput {
    pub name: String,
    pub shape: Vec<usize>,
    pub datatype: String,
    pub data: Vec<Vec<Scalar>>,
}

/// Request body sent to the inference endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InferenceRequest {
    V1 { instances: Vec<Vec<Scalar>> },
    V2 { inputs: Vec<TensorInput> },
}
