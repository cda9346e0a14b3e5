//! Error types for the finadvisor-serving crate.

use crate::config::ConfigError;
use finadvisor_training::TrainingError;
use thiserror::Error;

/// Result type alias for serving operations.
pub type ServingResult<T> = Result<T, ServingError>;

/// Errors surfaced by the advisor service.
#[derive(Debug, Error)]
pub enum ServingError {
    /// The request body could not be interpreted.
    #[error("{0}")]
    InvalidRequest(String),

    /// Building, fitting or querying the model failed. The training error's
    /// message is relayed unchanged.
    #[error(transparent)]
    Training(#[from] TrainingError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Internal error, such as a training task that panicked.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServingError {
    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this is a client error (bad request).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Short label placed in the `error` field of a failure payload.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "Invalid request",
            Self::Training(e) if e.is_prediction_failure() => "Error during prediction",
            Self::Training(_) => "Error during training",
            Self::Config(_) | Self::Internal(_) => "Internal server error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finadvisor_layers::LayerError;

    #[test]
    fn test_error_display() {
        let err = ServingError::invalid_request("income must be a number");
        assert_eq!(err.to_string(), "income must be a number");

        let err = ServingError::internal("task panicked");
        assert_eq!(err.to_string(), "Internal error: task panicked");
    }

    #[test]
    fn test_training_message_is_verbatim() {
        let err: ServingError = TrainingError::from(LayerError::ShapeMismatch {
            expected: vec![14, 3],
            actual: vec![14, 2],
        })
        .into();
        assert_eq!(
            err.to_string(),
            "Shape mismatch: expected [14, 3], got [14, 2]"
        );
        assert_eq!(err.label(), "Error during training");
        assert!(err.is_server_error());
    }

    #[test]
    fn test_classification() {
        assert!(ServingError::invalid_request("bad").is_client_error());
        assert_eq!(ServingError::invalid_request("bad").label(), "Invalid request");
        assert!(!ServingError::internal("x").is_client_error());

        let prediction: ServingError = TrainingError::Prediction {
            source: LayerError::NotInitialized,
        }
        .into();
        assert_eq!(prediction.label(), "Error during prediction");
    }
}
