//! First-order optimizers for the finance advisor model.
//!
//! Optimizers operate on a flat parameter vector: the caller concatenates
//! every trainable tensor in a fixed order, applies one step, and scatters the
//! result back. Per-element state (moments) is therefore aligned with that
//! order and must not change between steps.
//!
//! # Available Optimizers
//!
//! - [`Adamax`] - Adam variant with an infinity-norm second moment
//! - [`Sgd`] - Stochastic Gradient Descent
//!
//! # Example
//!
//! ```
//! use finadvisor_optimizer::{Optimizer, Adamax, OptimizerConfig};
//!
//! let mut optimizer = Adamax::new(OptimizerConfig::adamax()).unwrap();
//!
//! let mut params = vec![1.0, 2.0, 3.0];
//! let gradients = vec![0.1, 0.2, 0.3];
//!
//! optimizer.apply_gradients(&mut params, &gradients).unwrap();
//! assert!(params[0] < 1.0);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod adamax;
mod sgd;

pub use adamax::Adamax;
pub use sgd::Sgd;

/// Errors that can occur when working with optimizers.
#[derive(Debug, Error)]
pub enum OptimizerError {
    /// Configuration type does not match the optimizer type.
    #[error("Config mismatch: expected {expected}, got {got}")]
    ConfigMismatch { expected: String, got: String },

    /// Invalid configuration parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Parameter and gradient vectors differ in length.
    #[error("Gradient length {gradients} does not match parameter length {params}")]
    LengthMismatch { params: usize, gradients: usize },
}

/// Configuration for different optimizer types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptimizerConfig {
    /// Stochastic Gradient Descent configuration.
    Sgd {
        /// Learning rate for gradient updates.
        learning_rate: f32,
    },

    /// Adamax configuration.
    Adamax {
        /// Learning rate for gradient updates.
        learning_rate: f32,
        /// Exponential decay rate for first moment estimates.
        beta1: f32,
        /// Decay rate for the exponentially weighted infinity norm.
        beta2: f32,
        /// Small constant for numerical stability.
        epsilon: f32,
        /// Learning-rate decay per step (0 disables).
        decay: f32,
    },
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::adamax()
    }
}

impl OptimizerConfig {
    /// Adamax with the conventional defaults: lr 0.002, β1 0.9, β2 0.999,
    /// ε 1e-7, no decay.
    pub fn adamax() -> Self {
        OptimizerConfig::Adamax {
            learning_rate: 0.002,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            decay: 0.0,
        }
    }

    /// Returns the name of the optimizer type.
    pub fn name(&self) -> &'static str {
        match self {
            OptimizerConfig::Sgd { .. } => "Sgd",
            OptimizerConfig::Adamax { .. } => "Adamax",
        }
    }

    /// Returns the learning rate for the optimizer.
    pub fn learning_rate(&self) -> f32 {
        match self {
            OptimizerConfig::Sgd { learning_rate } => *learning_rate,
            OptimizerConfig::Adamax { learning_rate, .. } => *learning_rate,
        }
    }

    /// Validates the hyperparameters.
    pub fn validate(&self) -> Result<(), OptimizerError> {
        let lr = self.learning_rate();
        if !(lr.is_finite() && lr > 0.0) {
            return Err(OptimizerError::InvalidParameter(format!(
                "learning_rate must be positive and finite, got {}",
                lr
            )));
        }
        if let OptimizerConfig::Adamax {
            beta1,
            beta2,
            epsilon,
            decay,
            ..
        } = self
        {
            for (name, beta) in [("beta1", beta1), ("beta2", beta2)] {
                if !(0.0..1.0).contains(beta) {
                    return Err(OptimizerError::InvalidParameter(format!(
                        "{} must be in [0, 1), got {}",
                        name, beta
                    )));
                }
            }
            if *epsilon <= 0.0 {
                return Err(OptimizerError::InvalidParameter(format!(
                    "epsilon must be positive, got {}",
                    epsilon
                )));
            }
            if *decay < 0.0 {
                return Err(OptimizerError::InvalidParameter(format!(
                    "decay must be non-negative, got {}",
                    decay
                )));
            }
        }
        Ok(())
    }
}

/// Trait for first-order optimizers.
pub trait Optimizer: Sized {
    /// Creates a new optimizer from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizerError::ConfigMismatch`] if the configuration type
    /// does not match the optimizer type, or
    /// [`OptimizerError::InvalidParameter`] if a hyperparameter is out of range.
    fn new(config: OptimizerConfig) -> Result<Self, OptimizerError>;

    /// Applies one update step to `params` in place.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizerError::LengthMismatch`] if `params` and `gradients`
    /// have different lengths.
    fn apply_gradients(&mut self, params: &mut [f32], gradients: &[f32])
        -> Result<(), OptimizerError>;

    /// Returns a reference to the optimizer's configuration.
    fn config(&self) -> &OptimizerConfig;
}

/// Creates an optimizer from the given configuration.
///
/// # Example
///
/// ```
/// use finadvisor_optimizer::{create_optimizer, OptimizerConfig};
///
/// let optimizer = create_optimizer(OptimizerConfig::adamax()).unwrap();
/// assert_eq!(optimizer.config().name(), "Adamax");
/// ```
pub fn create_optimizer(config: OptimizerConfig) -> Result<Box<dyn OptimizerDyn>, OptimizerError> {
    let optimizer: Box<dyn OptimizerDyn> = match &config {
        OptimizerConfig::Sgd { .. } => Box::new(Sgd::new(config)?),
        OptimizerConfig::Adamax { .. } => Box::new(Adamax::new(config)?),
    };
    Ok(optimizer)
}

/// Dynamic dispatch version of the Optimizer trait.
pub trait OptimizerDyn: Send + Sync {
    /// Applies one update step to `params` in place.
    fn apply_gradients(&mut self, params: &mut [f32], gradients: &[f32])
        -> Result<(), OptimizerError>;

    /// Returns a reference to the optimizer's configuration.
    fn config(&self) -> &OptimizerConfig;
}

impl<T: Optimizer + Send + Sync> OptimizerDyn for T {
    fn apply_gradients(
        &mut self,
        params: &mut [f32],
        gradients: &[f32],
    ) -> Result<(), OptimizerError> {
        Optimizer::apply_gradients(self, params, gradients)
    }

    fn config(&self) -> &OptimizerConfig {
        Optimizer::config(self)
    }
}

pub(crate) fn check_lengths(params: &[f32], gradients: &[f32]) -> Result<(), OptimizerError> {
    if params.len() != gradients.len() {
        return Err(OptimizerError::LengthMismatch {
            params: params.len(),
            gradients: gradients.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimizer_config_name() {
        assert_eq!(OptimizerConfig::Sgd { learning_rate: 0.01 }.name(), "Sgd");
        assert_eq!(OptimizerConfig::adamax().name(), "Adamax");
        assert_eq!(OptimizerConfig::default(), OptimizerConfig::adamax());
    }

    #[test]
    fn test_optimizer_config_validate() {
        assert!(OptimizerConfig::adamax().validate().is_ok());
        assert!(OptimizerConfig::Sgd { learning_rate: 0.0 }
            .validate()
            .is_err());
        let bad_beta = OptimizerConfig::Adamax {
            learning_rate: 0.002,
            beta1: 1.0,
            beta2: 0.999,
            epsilon: 1e-7,
            decay: 0.0,
        };
        assert!(bad_beta.validate().is_err());
    }

    #[test]
    fn test_config_serde_tagged() {
        let json = serde_json::to_value(OptimizerConfig::adamax()).unwrap();
        assert_eq!(json["type"], "adamax");

        let parsed: OptimizerConfig =
            serde_json::from_str(r#"{"type": "sgd", "learning_rate": 0.5}"#).unwrap();
        assert_eq!(parsed, OptimizerConfig::Sgd { learning_rate: 0.5 });
    }

    #[test]
    fn test_create_optimizer() {
        let mut optimizer = create_optimizer(OptimizerConfig::Sgd { learning_rate: 0.01 }).unwrap();

        let mut params = vec![1.0, 2.0];
        optimizer.apply_gradients(&mut params, &[1.0, 1.0]).unwrap();

        assert!(params[0] < 1.0);
        assert!(params[1] < 2.0);
    }

    #[test]
    fn test_create_optimizer_rejects_invalid() {
        assert!(create_optimizer(OptimizerConfig::Sgd { learning_rate: -1.0 }).is_err());
    }
}
