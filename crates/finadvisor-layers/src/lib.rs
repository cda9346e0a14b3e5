//! Neural network layers for the finance advisor.
//!
//! This crate is the numeric substrate of the regression pipeline:
//!
//! - **Tensor**: a small row-major `f32` array with fallible shape checks
//! - **Dense layers**: fully connected linear transformations
//! - **Activations**: ReLU
//! - **MLP**: stacks of dense layers with configurable activations
//! - **Initializers**: seeded Glorot-uniform weights
//!
//! # Quick Start
//!
//! ```
//! use finadvisor_layers::prelude::*;
//!
//! let mlp = MLPConfig::new(1)
//!     .add_layer(8, ActivationType::ReLU)
//!     .add_layer(6, ActivationType::ReLU)
//!     .add_layer(3, ActivationType::None)
//!     .build(42)
//!     .unwrap();
//!
//! let input = Tensor::column(&[6000.0]);
//! let output = mlp.forward(&input).unwrap();
//! assert_eq!(output.shape(), &[1, 3]);
//! ```

pub mod activation;
pub mod dense;
pub mod error;
pub mod initializer;
pub mod layer;
pub mod mlp;
pub mod tensor;

pub use activation::ReLU;
pub use dense::Dense;
pub use error::{LayerError, LayerResult};
pub use initializer::Initializer;
pub use layer::Layer;
pub use mlp::{ActivationType, MLPConfig, MLP};
pub use tensor::Tensor;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::activation::ReLU;
    pub use crate::dense::Dense;
    pub use crate::error::{LayerError, LayerResult};
    pub use crate::layer::Layer;
    pub use crate::mlp::{ActivationType, MLPConfig, MLP};
    pub use crate::tensor::Tensor;
}
