//! Error types for the training pipeline.

use crate::context::Backend;
use crate::hooks::HookError;
use finadvisor_layers::LayerError;
use finadvisor_optimizer::OptimizerError;
use thiserror::Error;

/// Errors raised while building, fitting, or querying the advisor model.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// The model could not be assembled.
    #[error("Model construction failed: {0}")]
    Construction(String),

    /// A tensor operation failed during fitting (usually a shape mismatch).
    #[error(transparent)]
    Layer(#[from] LayerError),

    /// The optimizer rejected its configuration or an update.
    #[error(transparent)]
    Optimizer(#[from] OptimizerError),

    /// The loss stopped being finite.
    #[error("Training diverged at epoch {epoch}: loss = {loss}")]
    Diverged {
        /// Epoch at which the non-finite loss was observed
        epoch: u64,
        /// The offending loss value
        loss: f64,
    },

    /// The training set has no rows.
    #[error("Training set is empty")]
    EmptyDataset,

    /// Invalid trainer configuration.
    #[error("Invalid trainer configuration: {0}")]
    InvalidConfig(String),

    /// A diagnostic hook failed.
    #[error(transparent)]
    Hook(#[from] HookError),

    /// A forward pass on a fitted model failed.
    #[error("Prediction failed: {source}")]
    Prediction {
        /// Underlying tensor error
        #[source]
        source: LayerError,
    },

    /// A model built for one backend was used with another.
    #[error("Execution context mismatch: model built for {model:?}, context is {context:?}")]
    ContextMismatch {
        /// Backend the model was built on
        model: Backend,
        /// Backend of the supplied context
        context: Backend,
    },
}

impl TrainingError {
    /// Whether this error came from a forward pass on an already fitted model.
    pub fn is_prediction_failure(&self) -> bool {
        matches!(
            self,
            TrainingError::Prediction { .. } | TrainingError::ContextMismatch { .. }
        )
    }
}

/// Result type alias for training operations.
pub type TrainingResult<T> = Result<T, TrainingError>;
