//! Model construction.
//!
//! The advisor model maps one income to three outputs (savings, retirement,
//! investments) through a small ReLU network trained with Adamax on mean
//! squared error.

use crate::context::{Backend, ExecutionContext};
use crate::dataset::NUM_TARGETS;
use crate::error::{TrainingError, TrainingResult};
use finadvisor_layers::{ActivationType, Layer, MLPConfig, Tensor, MLP};
use finadvisor_optimizer::{create_optimizer, OptimizerConfig, OptimizerDyn};
use serde::{Deserialize, Serialize};

/// Hidden-layer layout of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Two ReLU layers of 8 and 6 units.
    #[default]
    Standard,
    /// One ReLU layer of 4 units.
    Light,
}

impl Topology {
    /// Widths of the hidden layers, input side first.
    pub fn hidden_units(&self) -> &'static [usize] {
        match self {
            Topology::Standard => &[8, 6],
            Topology::Light => &[4],
        }
    }

    /// Builds the layer configuration: 1 input, ReLU hidden layers, 3 linear outputs.
    pub fn mlp_config(&self) -> MLPConfig {
        self.hidden_units()
            .iter()
            .fold(MLPConfig::new(1), |config, &units| {
                config.add_layer(units, ActivationType::ReLU)
            })
            .add_layer(NUM_TARGETS, ActivationType::None)
    }
}

/// Everything needed to assemble an untrained model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Hidden-layer layout.
    #[serde(default)]
    pub topology: Topology,
    /// Optimizer hyperparameters.
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

/// Assembles untrained models from a [`ModelSpec`].
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    spec: ModelSpec,
}

impl ModelBuilder {
    /// Creates a builder for the given spec.
    pub fn new(spec: ModelSpec) -> Self {
        Self { spec }
    }

    /// Returns the spec this builder uses.
    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    /// Builds an untrained model with weights seeded from `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`TrainingError::Construction`] if the layer layout or the
    /// optimizer configuration is invalid.
    pub fn build(&self, ctx: &ExecutionContext) -> TrainingResult<AdvisorModel> {
        let network = self
            .spec
            .topology
            .mlp_config()
            .build(ctx.seed)
            .map_err(|e| TrainingError::Construction(e.to_string()))?;
        let optimizer = create_optimizer(self.spec.optimizer.clone())
            .map_err(|e| TrainingError::Construction(e.to_string()))?;

        tracing::debug!(
            topology = ?self.spec.topology,
            parameters = network.num_parameters(),
            optimizer = self.spec.optimizer.name(),
            "Built advisor model"
        );

        Ok(AdvisorModel {
            network,
            optimizer,
            backend: ctx.backend,
        })
    }
}

/// An untrained model paired with its optimizer state.
pub struct AdvisorModel {
    pub(crate) network: MLP,
    pub(crate) optimizer: Box<dyn OptimizerDyn>,
    pub(crate) backend: Backend,
}

impl AdvisorModel {
    /// The underlying network.
    pub fn network(&self) -> &MLP {
        &self.network
    }

    /// The optimizer configuration.
    pub fn optimizer_config(&self) -> &OptimizerConfig {
        self.optimizer.config()
    }

    /// Backend the model was built on.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub(crate) fn into_fitted(self) -> FittedModel {
        FittedModel {
            network: self.network,
            backend: self.backend,
        }
    }
}

impl std::fmt::Debug for AdvisorModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisorModel")
            .field("parameters", &self.network.num_parameters())
            .field("optimizer", self.optimizer.config())
            .field("backend", &self.backend)
            .finish()
    }
}

/// A trained model. Read-only; safe to share across threads.
#[derive(Debug, Clone)]
pub struct FittedModel {
    network: MLP,
    backend: Backend,
}

impl FittedModel {
    /// The underlying network.
    pub fn network(&self) -> &MLP {
        &self.network
    }

    /// Backend the model was built on.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Runs a forward pass over an `[N, 1]` batch.
    ///
    /// # Errors
    ///
    /// Returns [`TrainingError::ContextMismatch`] if `ctx` names another
    /// backend, or [`TrainingError::Prediction`] if the forward pass fails.
    pub fn forward(&self, ctx: &ExecutionContext, inputs: &Tensor) -> TrainingResult<Tensor> {
        if ctx.backend != self.backend {
            return Err(TrainingError::ContextMismatch {
                model: self.backend,
                context: ctx.backend,
            });
        }
        self.network
            .forward(inputs)
            .map_err(|source| TrainingError::Prediction { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_topology() {
        let config = Topology::Standard.mlp_config();
        assert_eq!(config.input_dim, 1);
        assert_eq!(
            config.layers,
            vec![
                (8, ActivationType::ReLU),
                (6, ActivationType::ReLU),
                (3, ActivationType::None)
            ]
        );
    }

    #[test]
    fn test_light_topology() {
        let config = Topology::Light.mlp_config();
        assert_eq!(
            config.layers,
            vec![(4, ActivationType::ReLU), (3, ActivationType::None)]
        );
    }

    #[test]
    fn test_build_default_model() {
        let model = ModelBuilder::default()
            .build(&ExecutionContext::default())
            .unwrap();
        assert_eq!(model.network().num_layers(), 3);
        assert_eq!(model.network().num_parameters(), 91);
        assert_eq!(model.optimizer_config().name(), "Adamax");
        assert_eq!(model.backend(), Backend::Cpu);
    }

    #[test]
    fn test_build_rejects_bad_optimizer() {
        let spec = ModelSpec {
            topology: Topology::Standard,
            optimizer: OptimizerConfig::Sgd { learning_rate: 0.0 },
        };
        let err = ModelBuilder::new(spec)
            .build(&ExecutionContext::default())
            .unwrap_err();
        assert!(matches!(err, TrainingError::Construction(_)));
    }

    #[test]
    fn test_same_seed_same_weights() {
        let ctx = ExecutionContext::cpu(11);
        let a = ModelBuilder::default().build(&ctx).unwrap();
        let b = ModelBuilder::default().build(&ctx).unwrap();
        assert_eq!(a.network().parameters(), b.network().parameters());
    }

    #[test]
    fn test_fitted_forward_shape() {
        let ctx = ExecutionContext::default();
        let fitted = ModelBuilder::default().build(&ctx).unwrap().into_fitted();
        let out = fitted.forward(&ctx, &Tensor::column(&[1000.0, 2000.0])).unwrap();
        assert_eq!(out.shape(), &[2, 3]);
    }

    #[test]
    fn test_fitted_forward_rejects_bad_input() {
        let ctx = ExecutionContext::default();
        let fitted = ModelBuilder::default().build(&ctx).unwrap().into_fitted();
        let err = fitted.forward(&ctx, &Tensor::zeros(&[2, 2])).unwrap_err();
        assert!(err.is_prediction_failure());
    }
}
