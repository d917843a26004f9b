use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Cache store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Remote call failed: {message}")]
    RemoteCall {
        status: Option<u16>,
        timeout: bool,
        message: String,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Transport failure or unparseable response from the inference endpoint
    pub fn remote_call(message: impl Into<String>) -> Self {
        Self::RemoteCall {
            status: None,
            timeout: false,
            message: message.into(),
        }
    }

    /// Non-success HTTP status from the inference endpoint
    pub fn remote_status(status: u16, message: impl Into<String>) -> Self {
        Self::RemoteCall {
            status: Some(status),
            timeout: false,
            message: message.into(),
        }
    }

    pub fn remote_timeout(message: impl Into<String>) -> Self {
        Self::RemoteCall {
            status: None,
            timeout: true,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RemoteCall { timeout: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("expected 8 features, got 7");
        assert_eq!(
            error.to_string(),
            "Validation error: expected 8 features, got 7"
        );
    }

    #[test]
    fn test_remote_status_error() {
        let error = DomainError::remote_status(503, "HTTP 503: upstream busy");

        match &error {
            DomainError::RemoteCall {
                status, timeout, ..
            } => {
                assert_eq!(*status, Some(503));
                assert!(!timeout);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!error.is_timeout());
    }

    #[test]
    fn test_remote_timeout_error() {
        let error = DomainError::remote_timeout("request timed out after 15s");
        assert!(error.is_timeout());
        assert_eq!(
            error.to_string(),
            "Remote call failed: request timed out after 15s"
        );
    }
}
