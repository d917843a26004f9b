//! Inference domain - Remote prediction requests and response interpretation

mod extract;
mod protocol;
mod provider;

pub use extract::{extract_prediction, Prediction, ResponseShape, POSITIVE_THRESHOLD};
pub use protocol::{InferenceProtocol, InferenceRequest, InputSpec, TensorInput};
pub use provider::{InferenceProvider, InferenceResult};

#[cfg(test)]
pub use provider::MockInferenceProvider;
