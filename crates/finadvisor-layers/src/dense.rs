//! Dense (fully connected) layer implementation.
//!
//! This module provides the [`Dense`] layer, which performs a linear transformation
//! `y = xW + b` where W is the weight matrix and b is the bias vector.

use crate::error::LayerError;
use crate::initializer::Initializer;
use crate::layer::Layer;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// A dense (fully connected) neural network layer.
///
/// Performs the transformation `y = xW + b` where:
/// - `x` is the input tensor of shape `[batch_size, in_features]`
/// - `W` is the weight matrix of shape `[in_features, out_features]`
/// - `b` is the bias vector of shape `[out_features]`
/// - `y` is the output tensor of shape `[batch_size, out_features]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    /// Weight matrix of shape [in_features, out_features]
    weights: Tensor,
    /// Bias vector of shape [out_features]
    bias: Tensor,
    /// Gradient of weights
    #[serde(skip)]
    weights_grad: Option<Tensor>,
    /// Gradient of bias
    #[serde(skip)]
    bias_grad: Option<Tensor>,
    /// Cached input for backward pass
    #[serde(skip)]
    cached_input: Option<Tensor>,
    in_features: usize,
    out_features: usize,
}

impl Dense {
    /// Creates a new dense layer with Glorot-uniform weights drawn from `seed`
    /// and zero biases.
    ///
    /// # Example
    ///
    /// ```
    /// use finadvisor_layers::dense::Dense;
    ///
    /// let layer = Dense::new(1, 8, 42);
    /// assert_eq!(layer.weights().shape(), &[1, 8]);
    /// ```
    pub fn new(in_features: usize, out_features: usize, seed: u64) -> Self {
        Self::new_with_initializer(
            in_features,
            out_features,
            Initializer::GlorotUniform,
            Initializer::Zeros,
            seed,
        )
    }

    /// Creates a new dense layer with custom initializers.
    pub fn new_with_initializer(
        in_features: usize,
        out_features: usize,
        weight_init: Initializer,
        bias_init: Initializer,
        seed: u64,
    ) -> Self {
        Self {
            weights: weight_init.initialize(&[in_features, out_features], seed),
            bias: bias_init.initialize(&[out_features], seed),
            weights_grad: None,
            bias_grad: None,
            cached_input: None,
            in_features,
            out_features,
        }
    }

    /// Creates a dense layer with custom weights and bias.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes are incompatible
    pub fn from_weights(weights: Tensor, bias: Tensor) -> Result<Self, LayerError> {
        if weights.ndim() != 2 {
            return Err(LayerError::ConfigError {
                message: format!("Weights must be 2D, got {}D", weights.ndim()),
            });
        }
        if bias.ndim() != 1 {
            return Err(LayerError::ConfigError {
                message: format!("Bias must be 1D, got {}D", bias.ndim()),
            });
        }
        if weights.shape()[1] != bias.shape()[0] {
            return Err(LayerError::ShapeMismatch {
                expected: vec![weights.shape()[1]],
                actual: vec![bias.shape()[0]],
            });
        }

        let in_features = weights.shape()[0];
        let out_features = weights.shape()[1];
        Ok(Self {
            weights,
            bias,
            weights_grad: None,
            bias_grad: None,
            cached_input: None,
            in_features,
            out_features,
        })
    }

    /// Returns the input feature dimension.
    pub fn in_features(&self) -> usize {
        self.in_features
    }

    /// Returns the output feature dimension.
    pub fn out_features(&self) -> usize {
        self.out_features
    }

    /// Returns a reference to the weights tensor.
    pub fn weights(&self) -> &Tensor {
        &self.weights
    }

    /// Returns a reference to the bias tensor.
    pub fn bias(&self) -> &Tensor {
        &self.bias
    }

    /// Returns the weight gradients if available.
    pub fn weights_grad(&self) -> Option<&Tensor> {
        self.weights_grad.as_ref()
    }

    /// Returns the bias gradients if available.
    pub fn bias_grad(&self) -> Option<&Tensor> {
        self.bias_grad.as_ref()
    }

    /// Clears the cached input and gradients.
    pub fn clear_cache(&mut self) {
        self.cached_input = None;
        self.weights_grad = None;
        self.bias_grad = None;
    }

    fn check_input(&self, input: &Tensor) -> Result<(), LayerError> {
        if input.ndim() != 2 {
            return Err(LayerError::ForwardError {
                message: format!("Expected 2D input, got {}D", input.ndim()),
            });
        }
        let in_dim = input.shape()[1];
        if in_dim != self.in_features {
            return Err(LayerError::InvalidInputDimension {
                expected: self.in_features,
                actual: in_dim,
            });
        }
        Ok(())
    }
}

impl Layer for Dense {
    fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        self.check_input(input)?;
        input.matmul(&self.weights)?.add(&self.bias)
    }

    fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        let output = self.forward(input)?;
        self.cached_input = Some(input.clone());
        Ok(output)
    }

    fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError> {
        let input = self
            .cached_input
            .as_ref()
            .ok_or(LayerError::NotInitialized)?;

        if grad.ndim() != 2 || grad.shape()[1] != self.out_features {
            return Err(LayerError::InvalidOutputDimension {
                expected: self.out_features,
                actual: grad.shape().last().copied().unwrap_or(0),
            });
        }
        if grad.shape()[0] != input.shape()[0] {
            return Err(LayerError::ShapeMismatch {
                expected: vec![input.shape()[0], self.out_features],
                actual: grad.shape().to_vec(),
            });
        }

        // dL/dW = x^T @ dL/dy
        self.weights_grad = Some(input.transpose()?.matmul(grad)?);
        // dL/db = sum(dL/dy, axis=0)
        self.bias_grad = Some(grad.sum_rows()?);

        // dL/dx = dL/dy @ W^T
        grad.matmul(&self.weights.transpose()?)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.weights, &self.bias]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.weights, &mut self.bias]
    }

    fn gradients(&self) -> Vec<&Tensor> {
        match (&self.weights_grad, &self.bias_grad) {
            (Some(w), Some(b)) => vec![w, b],
            _ => Vec::new(),
        }
    }

    fn name(&self) -> &str {
        "Dense"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_creation() {
        let layer = Dense::new(8, 6, 1);
        assert_eq!(layer.in_features(), 8);
        assert_eq!(layer.out_features(), 6);
        assert_eq!(layer.weights().shape(), &[8, 6]);
        assert_eq!(layer.bias().shape(), &[6]);
        assert!(layer.bias().data().iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_dense_forward_known_weights() {
        let weights = Tensor::from_data(&[1, 3], vec![0.1, 0.15, 0.125]).unwrap();
        let bias = Tensor::from_data(&[3], vec![0.0, 0.0, 0.5]).unwrap();
        let layer = Dense::from_weights(weights, bias).unwrap();

        let output = layer.forward(&Tensor::column(&[1000.0, 2000.0])).unwrap();
        assert_eq!(output.shape(), &[2, 3]);
        let row = output.row(1);
        assert!((row[0] - 200.0).abs() < 1e-3);
        assert!((row[1] - 300.0).abs() < 1e-3);
        assert!((row[2] - 250.5).abs() < 1e-3);
    }

    #[test]
    fn test_dense_forward_invalid_input() {
        let layer = Dense::new(1, 8, 0);
        let result = layer.forward(&Tensor::ones(&[3, 2]));
        assert!(matches!(
            result,
            Err(LayerError::InvalidInputDimension {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_dense_backward_requires_forward_train() {
        let mut layer = Dense::new(1, 3, 0);
        let result = layer.backward(&Tensor::ones(&[2, 3]));
        assert!(matches!(result, Err(LayerError::NotInitialized)));
    }

    #[test]
    fn test_dense_backward_gradients() {
        let weights = Tensor::from_data(&[2, 1], vec![1.0, 2.0]).unwrap();
        let bias = Tensor::zeros(&[1]);
        let mut layer = Dense::from_weights(weights, bias).unwrap();

        let input = Tensor::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        layer.forward_train(&input).unwrap();

        let grad = Tensor::column(&[1.0, 1.0]);
        let input_grad = layer.backward(&grad).unwrap();

        assert_eq!(input_grad.data(), &[1.0, 2.0, 1.0, 2.0]);
        assert_eq!(layer.weights_grad().unwrap().data(), &[4.0, 6.0]);
        assert_eq!(layer.bias_grad().unwrap().data(), &[2.0]);
        assert_eq!(layer.gradients().len(), 2);
    }

    #[test]
    fn test_dense_from_weights_invalid() {
        let weights = Tensor::ones(&[10, 5]);
        let bias = Tensor::zeros(&[10]);
        assert!(Dense::from_weights(weights, bias).is_err());
    }
}
