//! Inference infrastructure - Remote model server clients

mod http_client;
mod provider;

pub use http_client::{HttpClient, HttpClientTrait};
pub use provider::HttpInferenceProvider;

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
