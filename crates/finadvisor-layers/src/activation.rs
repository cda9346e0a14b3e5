//! Activation function layers.

use crate::error::LayerError;
use crate::layer::Layer;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// Rectified Linear Unit (ReLU) activation function.
///
/// Computes `f(x) = max(0, x)` element-wise.
///
/// # Example
///
/// ```
/// use finadvisor_layers::activation::ReLU;
/// use finadvisor_layers::layer::Layer;
/// use finadvisor_layers::tensor::Tensor;
///
/// let relu = ReLU::new();
/// let input = Tensor::from_rows(&[[-1.0, 0.0], [1.0, 2.0]]).unwrap();
/// let output = relu.forward(&input).unwrap();
/// assert_eq!(output.data(), &[0.0, 0.0, 1.0, 2.0]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReLU {
    /// Cached input for backward pass
    #[serde(skip)]
    cached_input: Option<Tensor>,
}

impl ReLU {
    /// Creates a new ReLU activation layer.
    pub fn new() -> Self {
        Self { cached_input: None }
    }
}

impl Layer for ReLU {
    fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        Ok(input.map(|x| x.max(0.0)))
    }

    fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        self.cached_input = Some(input.clone());
        self.forward(input)
    }

    fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError> {
        let input = self
            .cached_input
            .as_ref()
            .ok_or(LayerError::NotInitialized)?;

        // 1 if x > 0, else 0
        let mask = input.map(|x| if x > 0.0 { 1.0 } else { 0.0 });
        grad.mul(&mask)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![]
    }

    fn name(&self) -> &str {
        "ReLU"
    }
}
