//! Full-batch training loop.

use crate::context::ExecutionContext;
use crate::dataset::TrainingSet;
use crate::error::{TrainingError, TrainingResult};
use crate::hooks::{Hook, HookList, LoggingHook};
use crate::loss::mean_squared_error;
use crate::metrics::{Metrics, MetricsRecorder};
use crate::model::{AdvisorModel, FittedModel};
use finadvisor_layers::{Layer, LayerError, Tensor};
use serde::{Deserialize, Serialize};

/// Default number of full-batch epochs.
pub const DEFAULT_EPOCHS: u64 = 1500;

/// Default progress logging interval.
pub const DEFAULT_LOG_EVERY_N_EPOCHS: u64 = 100;

/// Configuration for the trainer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Number of full-batch epochs.
    pub epochs: u64,
    /// Log the loss every N epochs.
    pub log_every_n_epochs: u64,
    /// Seed for weight initialization.
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            epochs: DEFAULT_EPOCHS,
            log_every_n_epochs: DEFAULT_LOG_EVERY_N_EPOCHS,
            seed: crate::context::DEFAULT_SEED,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of epochs.
    pub fn with_epochs(mut self, epochs: u64) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the logging interval.
    pub fn with_log_every_n_epochs(mut self, n: u64) -> Self {
        self.log_every_n_epochs = n;
        self
    }

    /// CPU execution context seeded from this configuration.
    pub fn context(&self) -> ExecutionContext {
        ExecutionContext::cpu(self.seed)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> TrainingResult<()> {
        if self.epochs == 0 {
            return Err(TrainingError::InvalidConfig(
                "epochs must be greater than zero".to_string(),
            ));
        }
        if self.log_every_n_epochs == 0 {
            return Err(TrainingError::InvalidConfig(
                "log_every_n_epochs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of a completed fit.
#[derive(Debug, Clone)]
pub struct TrainingOutput {
    /// The trained model.
    pub model: FittedModel,
    /// Loss of the last epoch, measured before its optimizer step.
    pub final_loss: f64,
    /// Loss of every epoch.
    pub history: MetricsRecorder,
}

/// Runs full-batch gradient descent over a [`TrainingSet`].
///
/// Every epoch runs one forward pass over the whole set, computes the mean
/// squared error against the targets, back-propagates and applies exactly one
/// optimizer step. There is no shuffling, validation split or early stopping.
///
/// # Example
///
/// ```no_run
/// use finadvisor_training::dataset::{DatasetProvider, SyntheticDataset};
/// use finadvisor_training::model::ModelBuilder;
/// use finadvisor_training::trainer::{Trainer, TrainerConfig};
///
/// let config = TrainerConfig::default();
/// let ctx = config.context();
/// let dataset = SyntheticDataset.load().unwrap();
/// let model = ModelBuilder::default().build(&ctx).unwrap();
///
/// let mut trainer = Trainer::new(config).unwrap();
/// let output = trainer.fit(model, &dataset.training, &ctx).unwrap();
/// println!("final loss = {}", output.final_loss);
/// ```
#[derive(Debug)]
pub struct Trainer {
    config: TrainerConfig,
    hooks: HookList,
}

impl Trainer {
    /// Creates a trainer with a [`LoggingHook`] at the configured interval.
    pub fn new(config: TrainerConfig) -> TrainingResult<Self> {
        config.validate()?;
        let mut hooks = HookList::new();
        hooks.add(LoggingHook::new(config.log_every_n_epochs));
        Ok(Self { config, hooks })
    }

    /// Creates a trainer with no hooks.
    pub fn without_hooks(config: TrainerConfig) -> TrainingResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            hooks: HookList::new(),
        })
    }

    /// Registers an additional hook.
    pub fn add_hook<H: Hook + 'static>(&mut self, hook: H) {
        self.hooks.add(hook);
    }

    /// Returns the trainer configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Fits `model` to `data`.
    ///
    /// # Errors
    ///
    /// Fails without returning a partial model if the tensor shapes disagree,
    /// the loss becomes non-finite, the optimizer rejects an update, or a hook
    /// fails.
    pub fn fit(
        &mut self,
        mut model: AdvisorModel,
        data: &TrainingSet,
        ctx: &ExecutionContext,
    ) -> TrainingResult<TrainingOutput> {
        if ctx.backend != model.backend {
            return Err(TrainingError::ContextMismatch {
                model: model.backend,
                context: ctx.backend,
            });
        }
        if data.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }
        data.check_shapes(model.network.output_dim())?;

        let epochs = self.config.epochs;
        let mut history = MetricsRecorder::with_capacity(epochs as usize);
        self.hooks.begin(data.len(), epochs)?;

        let mut params = flatten(&model.network.parameters());
        let mut last = None;
        for epoch in 0..epochs {
            let predictions = model.network.forward_train(data.inputs())?;
            let (loss, grad) = mean_squared_error(&predictions, data.targets())?;
            if !loss.is_finite() {
                return Err(TrainingError::Diverged { epoch, loss });
            }

            model.network.backward(&grad)?;
            let gradients = model.network.gradients();
            if gradients.is_empty() {
                return Err(LayerError::NotInitialized.into());
            }
            let gradients = flatten(&gradients);

            model.optimizer.apply_gradients(&mut params, &gradients)?;
            scatter(&params, model.network.parameters_mut());

            let metrics = Metrics::new(loss, epoch);
            history.record(&metrics);
            self.hooks.after_epoch(epoch, &metrics)?;
            last = Some(metrics);
        }

        self.hooks.end(epochs, last.as_ref())?;
        let final_loss = history.last_loss().ok_or(TrainingError::EmptyDataset)?;

        Ok(TrainingOutput {
            model: model.into_fitted(),
            final_loss,
            history,
        })
    }
}

fn flatten(tensors: &[&Tensor]) -> Vec<f32> {
    tensors
        .iter()
        .flat_map(|t| t.data().iter().copied())
        .collect()
}

fn scatter(flat: &[f32], tensors: Vec<&mut Tensor>) {
    let mut offset = 0;
    for tensor in tensors {
        let n = tensor.numel();
        tensor.data_mut().copy_from_slice(&flat[offset..offset + n]);
        offset += n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetProvider, SyntheticDataset};
    use crate::model::ModelBuilder;

    fn fit_synthetic(config: TrainerConfig) -> TrainingResult<TrainingOutput> {
        let ctx = config.context();
        let dataset = SyntheticDataset.load()?;
        let model = ModelBuilder::default().build(&ctx)?;
        Trainer::without_hooks(config)?.fit(model, &dataset.training, &ctx)
    }

    #[test]
    fn test_config_defaults() {
        let config = TrainerConfig::default();
        assert_eq!(config.epochs, 1500);
        assert_eq!(config.log_every_n_epochs, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_epochs() {
        let config = TrainerConfig::default().with_epochs(0);
        assert!(matches!(
            config.validate(),
            Err(TrainingError::InvalidConfig(_))
        ));
        assert!(Trainer::new(config).is_err());
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: TrainerConfig = serde_json::from_str(r#"{"epochs": 10}"#).unwrap();
        assert_eq!(config.epochs, 10);
        assert_eq!(config.log_every_n_epochs, 100);
    }

    #[test]
    fn test_fit_records_every_epoch() {
        let output = fit_synthetic(TrainerConfig::default().with_epochs(25)).unwrap();
        assert_eq!(output.history.count(), 25);
        assert_eq!(output.history.last_loss(), Some(output.final_loss));
        assert!(output.final_loss.is_finite());
    }

    #[test]
    fn test_fit_reduces_loss() {
        let output = fit_synthetic(TrainerConfig::default().with_epochs(300)).unwrap();
        let first = output.history.losses()[0];
        assert!(output.final_loss < first);
        let best = output.history.best_loss().unwrap();
        assert!(best <= output.final_loss);
        assert!(best < first);
    }

    #[test]
    fn test_fit_changes_weights() {
        let config = TrainerConfig::default().with_epochs(5);
        let ctx = config.context();
        let untrained = ModelBuilder::default().build(&ctx).unwrap();
        let before: Vec<Tensor> = untrained
            .network()
            .parameters()
            .into_iter()
            .cloned()
            .collect();

        let dataset = SyntheticDataset.load().unwrap();
        let output = Trainer::without_hooks(config)
            .unwrap()
            .fit(untrained, &dataset.training, &ctx)
            .unwrap();
        let after: Vec<Tensor> = output
            .model
            .network()
            .parameters()
            .into_iter()
            .cloned()
            .collect();
        assert_ne!(before, after);
    }

    #[test]
    fn test_fit_rejects_malformed_targets() {
        let config = TrainerConfig::default().with_epochs(5);
        let ctx = config.context();
        let model = ModelBuilder::default().build(&ctx).unwrap();
        let data = TrainingSet::from_tensors(Tensor::zeros(&[14, 1]), Tensor::zeros(&[14, 2]));

        let err = Trainer::without_hooks(config)
            .unwrap()
            .fit(model, &data, &ctx)
            .unwrap_err();
        assert!(matches!(
            err,
            TrainingError::Layer(LayerError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_fit_detects_divergence() {
        let config = TrainerConfig::default().with_epochs(3);
        let ctx = config.context();
        let model = ModelBuilder::default().build(&ctx).unwrap();
        let data = TrainingSet::from_tensors(
            Tensor::column(&[1.0, 2.0]),
            Tensor::from_data(&[2, 3], vec![f32::NAN; 6]).unwrap(),
        );

        let err = Trainer::without_hooks(config)
            .unwrap()
            .fit(model, &data, &ctx)
            .unwrap_err();
        assert!(matches!(err, TrainingError::Diverged { epoch: 0, .. }));
    }

    #[test]
    fn test_flatten_scatter_round_trip() {
        let mut a = Tensor::zeros(&[2, 2]);
        let mut b = Tensor::zeros(&[3]);
        scatter(
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0],
            vec![&mut a, &mut b],
        );
        assert_eq!(a.data(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(b.data(), &[5.0, 6.0, 7.0]);
        assert_eq!(flatten(&[&a, &b]), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }
}
