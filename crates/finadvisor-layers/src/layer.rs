//! Layer trait definition for neural network layers.
//!
//! This module defines the core [`Layer`] trait that all layers implement,
//! providing a unified interface for forward and backward passes.

use crate::error::LayerError;
use crate::tensor::Tensor;

/// A neural network layer that supports forward and backward propagation.
///
/// # Example
///
/// ```
/// use finadvisor_layers::dense::Dense;
/// use finadvisor_layers::layer::Layer;
/// use finadvisor_layers::tensor::Tensor;
///
/// let layer = Dense::new(1, 8, 7);
/// let input = Tensor::zeros(&[14, 1]);
/// let output = layer.forward(&input).unwrap();
/// assert_eq!(output.shape(), &[14, 8]);
/// ```
pub trait Layer: Send + Sync {
    /// Performs a forward pass through the layer.
    ///
    /// # Errors
    ///
    /// Returns a [`LayerError`] if the input shape is incompatible with the layer
    fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError>;

    /// Performs a forward pass and caches whatever the backward pass needs.
    fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, LayerError>;

    /// Performs a backward pass through the layer.
    ///
    /// Takes the gradient of the loss with respect to the layer's output,
    /// stores parameter gradients, and returns the gradient with respect to
    /// the layer's input.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::NotInitialized`] if no training forward pass ran,
    /// or a shape error if the gradient is incompatible.
    fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError>;

    /// Returns references to the layer's learnable parameters.
    fn parameters(&self) -> Vec<&Tensor>;

    /// Returns mutable references to the layer's learnable parameters.
    fn parameters_mut(&mut self) -> Vec<&mut Tensor>;

    /// Returns the gradients computed by the last backward pass, parallel to
    /// [`Layer::parameters`]. Empty if no backward pass has run.
    fn gradients(&self) -> Vec<&Tensor> {
        Vec::new()
    }

    /// Returns the name of the layer for debugging and logging purposes.
    fn name(&self) -> &str {
        "Layer"
    }
}
