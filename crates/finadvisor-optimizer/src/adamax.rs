//! Adamax optimizer.
//!
//! Adamax is the infinity-norm variant of Adam: the second moment is replaced
//! by an exponentially weighted maximum of absolute gradients, which needs no
//! bias correction. Only the first moment is bias-corrected.
//!
//! # Example
//!
//! ```
//! use finadvisor_optimizer::{Optimizer, Adamax, OptimizerConfig};
//!
//! let mut adamax = Adamax::new(OptimizerConfig::adamax()).unwrap();
//! let mut params = vec![1.0, 2.0, 3.0];
//! adamax.apply_gradients(&mut params, &[0.1, -0.2, 0.0]).unwrap();
//! assert!(params[0] < 1.0);
//! assert!(params[1] > 2.0);
//! ```

use crate::{check_lengths, Optimizer, OptimizerConfig, OptimizerError};
use serde::{Deserialize, Serialize};

/// Adamax optimizer with per-parameter adaptive step sizes.
///
/// Updates parameters using the formula:
/// ```text
/// lr_t  = learning_rate / (1 + decay * (t - 1))
/// m     = beta1 * m + (1 - beta1) * gradient
/// u     = max(beta2 * u, |gradient|)
/// param = param - lr_t / (1 - beta1^t) * m / (u + epsilon)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adamax {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    decay: f32,
    /// First moment estimates.
    m: Vec<f32>,
    /// Exponentially weighted infinity norm of past gradients.
    u: Vec<f32>,
    /// Current timestep for bias correction.
    t: u64,
    config: OptimizerConfig,
}

impl Adamax {
    /// Returns the current first moment state.
    pub fn first_moment(&self) -> &[f32] {
        &self.m
    }

    /// Returns the current infinity-norm state.
    pub fn infinity_norm(&self) -> &[f32] {
        &self.u
    }

    /// Returns the current timestep.
    pub fn timestep(&self) -> u64 {
        self.t
    }

    /// Resets the optimizer state.
    pub fn reset_state(&mut self) {
        self.m.clear();
        self.u.clear();
        self.t = 0;
    }
}

impl Optimizer for Adamax {
    fn new(config: OptimizerConfig) -> Result<Self, OptimizerError> {
        config.validate()?;
        match config {
            OptimizerConfig::Adamax {
                learning_rate,
                beta1,
                beta2,
                epsilon,
                decay,
            } => Ok(Self {
                learning_rate,
                beta1,
                beta2,
                epsilon,
                decay,
                m: Vec::new(),
                u: Vec::new(),
                t: 0,
                config,
            }),
            _ => Err(OptimizerError::ConfigMismatch {
                expected: "Adamax".to_string(),
                got: config.name().to_string(),
            }),
        }
    }

    fn apply_gradients(
        &mut self,
        params: &mut [f32],
        gradients: &[f32],
    ) -> Result<(), OptimizerError> {
        check_lengths(params, gradients)?;

        if self.m.len() != params.len() {
            self.m = vec![0.0; params.len()];
            self.u = vec![0.0; params.len()];
        }

        let lr = self.learning_rate / (1.0 + self.decay * self.t as f32);
        self.t += 1;
        let step_size = lr / (1.0 - self.beta1.powi(self.t as i32));

        for (i, (p, &g)) in params.iter_mut().zip(gradients.iter()).enumerate() {
            self.m[i] = self.beta1 * self.m[i] + (1.0 - self.beta1) * g;
            self.u[i] = (self.beta2 * self.u[i]).max(g.abs());
            *p -= step_size * self.m[i] / (self.u[i] + self.epsilon);
        }
        Ok(())
    }

    fn config(&self) -> &OptimizerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adamax_first_step_is_learning_rate() {
        // With m and u starting at zero, the first step moves each parameter
        // by lr * sign(g), up to epsilon.
        let mut adamax = Adamax::new(OptimizerConfig::adamax()).unwrap();
        let mut params = vec![1.0, 1.0];
        adamax.apply_gradients(&mut params, &[5.0, -0.5]).unwrap();

        assert!((params[0] - (1.0 - 0.002)).abs() < 1e-6);
        assert!((params[1] - (1.0 + 0.002)).abs() < 1e-6);
    }

    #[test]
    fn test_adamax_step_bounded_by_learning_rate() {
        let mut adamax = Adamax::new(OptimizerConfig::adamax()).unwrap();
        let mut params = vec![0.0];
        for g in [1000.0, -1.0, 50.0, 0.001, 7.0] {
            let before = params[0];
            adamax.apply_gradients(&mut params, &[g]).unwrap();
            assert!((params[0] - before).abs() <= 0.002 + 1e-6);
        }
        assert_eq!(adamax.timestep(), 5);
    }

    #[test]
    fn test_adamax_infinity_norm_tracks_max() {
        let mut adamax = Adamax::new(OptimizerConfig::adamax()).unwrap();
        let mut params = vec![0.0];
        adamax.apply_gradients(&mut params, &[4.0]).unwrap();
        adamax.apply_gradients(&mut params, &[1.0]).unwrap();
        assert!((adamax.infinity_norm()[0] - 4.0 * 0.999).abs() < 1e-5);
    }

    #[test]
    fn test_adamax_zero_gradient() {
        let mut adamax = Adamax::new(OptimizerConfig::adamax()).unwrap();
        let mut params = vec![1.0, 2.0];
        adamax.apply_gradients(&mut params, &[0.0, 0.0]).unwrap();
        assert_eq!(params, vec![1.0, 2.0]);
    }

    #[test]
    fn test_adamax_length_mismatch() {
        let mut adamax = Adamax::new(OptimizerConfig::adamax()).unwrap();
        let mut params = vec![1.0, 2.0];
        let result = adamax.apply_gradients(&mut params, &[1.0]);
        assert!(matches!(
            result,
            Err(OptimizerError::LengthMismatch {
                params: 2,
                gradients: 1
            })
        ));
        assert_eq!(adamax.timestep(), 0);
    }

    #[test]
    fn test_adamax_config_mismatch() {
        let result = Adamax::new(OptimizerConfig::Sgd { learning_rate: 0.01 });
        assert!(matches!(result, Err(OptimizerError::ConfigMismatch { .. })));
    }

    #[test]
    fn test_adamax_reset_state() {
        let mut adamax = Adamax::new(OptimizerConfig::adamax()).unwrap();
        let mut params = vec![1.0, 2.0];
        adamax.apply_gradients(&mut params, &[1.0, 1.0]).unwrap();
        assert_eq!(adamax.first_moment().len(), 2);

        adamax.reset_state();
        assert_eq!(adamax.timestep(), 0);
        assert!(adamax.first_moment().is_empty());
        assert!(adamax.infinity_norm().is_empty());
    }
}
