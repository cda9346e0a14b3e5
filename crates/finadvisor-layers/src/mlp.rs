//! Multi-layer perceptron (MLP) implementation.
//!
//! This module provides the [`MLP`] struct, which is a stack of dense layers
//! with activation functions between them.

use crate::activation::ReLU;
use crate::dense::Dense;
use crate::error::LayerError;
use crate::layer::Layer;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// Activation function types supported by MLP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationType {
    /// Rectified Linear Unit
    #[default]
    ReLU,
    /// No activation (identity)
    None,
}

/// Configuration for building an MLP.
///
/// # Example
///
/// ```
/// use finadvisor_layers::mlp::{MLPConfig, ActivationType};
///
/// let config = MLPConfig::new(1)
///     .add_layer(8, ActivationType::ReLU)
///     .add_layer(6, ActivationType::ReLU)
///     .add_layer(3, ActivationType::None);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MLPConfig {
    /// Input dimension
    pub input_dim: usize,
    /// Layer configurations: (output_dim, activation)
    pub layers: Vec<(usize, ActivationType)>,
}

impl MLPConfig {
    /// Creates a new MLP configuration with the specified input dimension.
    pub fn new(input_dim: usize) -> Self {
        Self {
            input_dim,
            layers: Vec::new(),
        }
    }

    /// Adds a layer to the MLP configuration.
    pub fn add_layer(mut self, output_dim: usize, activation: ActivationType) -> Self {
        self.layers.push((output_dim, activation));
        self
    }

    /// Returns the output dimension of the last layer, or 0 if there is none.
    pub fn output_dim(&self) -> usize {
        self.layers.last().map(|(d, _)| *d).unwrap_or(0)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), LayerError> {
        if self.input_dim == 0 {
            return Err(LayerError::ConfigError {
                message: "Input dimension must be positive".to_string(),
            });
        }
        if self.layers.is_empty() {
            return Err(LayerError::ConfigError {
                message: "MLP must have at least one layer".to_string(),
            });
        }
        for (i, (dim, _)) in self.layers.iter().enumerate() {
            if *dim == 0 {
                return Err(LayerError::ConfigError {
                    message: format!("Layer {} has zero output dimension", i),
                });
            }
        }
        Ok(())
    }

    /// Builds the MLP from this configuration, seeding layer `i` with `seed + i`.
    pub fn build(self, seed: u64) -> Result<MLP, LayerError> {
        MLP::from_config(self, seed)
    }
}

#[derive(Debug, Clone)]
enum ActivationLayer {
    ReLU(ReLU),
    None,
}

impl ActivationLayer {
    fn forward(&self, input: Tensor) -> Result<Tensor, LayerError> {
        match self {
            Self::ReLU(a) => a.forward(&input),
            Self::None => Ok(input),
        }
    }

    fn forward_train(&mut self, input: Tensor) -> Result<Tensor, LayerError> {
        match self {
            Self::ReLU(a) => a.forward_train(&input),
            Self::None => Ok(input),
        }
    }

    fn backward(&mut self, grad: Tensor) -> Result<Tensor, LayerError> {
        match self {
            Self::ReLU(a) => a.backward(&grad),
            Self::None => Ok(grad),
        }
    }
}

/// A multi-layer perceptron (MLP) neural network.
///
/// # Example
///
/// ```
/// use finadvisor_layers::mlp::{MLPConfig, ActivationType};
/// use finadvisor_layers::layer::Layer;
/// use finadvisor_layers::tensor::Tensor;
///
/// let mlp = MLPConfig::new(1)
///     .add_layer(4, ActivationType::ReLU)
///     .add_layer(3, ActivationType::None)
///     .build(42)
///     .unwrap();
///
/// let input = Tensor::column(&[1500.0, 2000.0]);
/// let output = mlp.forward(&input).unwrap();
/// assert_eq!(output.shape(), &[2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct MLP {
    dense_layers: Vec<Dense>,
    /// One per dense layer
    activations: Vec<ActivationLayer>,
    config: MLPConfig,
}

impl MLP {
    /// Creates an MLP from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn from_config(config: MLPConfig, seed: u64) -> Result<Self, LayerError> {
        config.validate()?;

        let mut dense_layers = Vec::with_capacity(config.layers.len());
        let mut activations = Vec::with_capacity(config.layers.len());

        let mut prev_dim = config.input_dim;
        for (i, (output_dim, activation_type)) in config.layers.iter().enumerate() {
            dense_layers.push(Dense::new(
                prev_dim,
                *output_dim,
                seed.wrapping_add(i as u64),
            ));
            activations.push(match activation_type {
                ActivationType::ReLU => ActivationLayer::ReLU(ReLU::new()),
                ActivationType::None => ActivationLayer::None,
            });
            prev_dim = *output_dim;
        }

        Ok(Self {
            dense_layers,
            activations,
            config,
        })
    }

    /// Returns the number of layers in the MLP.
    pub fn num_layers(&self) -> usize {
        self.dense_layers.len()
    }

    /// Returns a reference to the dense layers.
    pub fn dense_layers(&self) -> &[Dense] {
        &self.dense_layers
    }

    /// Returns the configuration used to build this MLP.
    pub fn config(&self) -> &MLPConfig {
        &self.config
    }

    /// Returns the input dimension.
    pub fn input_dim(&self) -> usize {
        self.config.input_dim
    }

    /// Returns the output dimension.
    pub fn output_dim(&self) -> usize {
        self.config.output_dim()
    }

    /// Total number of scalar parameters.
    pub fn num_parameters(&self) -> usize {
        self.parameters().iter().map(|p| p.numel()).sum()
    }
}

impl Layer for MLP {
    fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        let mut x = input.clone();
        for (dense, activation) in self.dense_layers.iter().zip(self.activations.iter()) {
            x = activation.forward(dense.forward(&x)?)?;
        }
        Ok(x)
    }

    fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        let mut x = input.clone();
        for (dense, activation) in self
            .dense_layers
            .iter_mut()
            .zip(self.activations.iter_mut())
        {
            x = activation.forward_train(dense.forward_train(&x)?)?;
        }
        Ok(x)
    }

    fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError> {
        let mut g = grad.clone();
        for (dense, activation) in self
            .dense_layers
            .iter_mut()
            .zip(self.activations.iter_mut())
            .rev()
        {
            g = dense.backward(&activation.backward(g)?)?;
        }
        Ok(g)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        self.dense_layers
            .iter()
            .flat_map(|layer| layer.parameters())
            .collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.dense_layers
            .iter_mut()
            .flat_map(|layer| layer.parameters_mut())
            .collect()
    }

    fn gradients(&self) -> Vec<&Tensor> {
        let grads: Vec<&Tensor> = self
            .dense_layers
            .iter()
            .flat_map(|layer| layer.gradients())
            .collect();
        // Partial gradient sets would misalign with parameters().
        if grads.len() == self.dense_layers.len() * 2 {
            grads
        } else {
            Vec::new()
        }
    }

    fn name(&self) -> &str {
        "MLP"
    }
}
