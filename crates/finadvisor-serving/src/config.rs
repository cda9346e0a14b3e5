//! Service configuration for the finance advisor.
//!
//! This module provides the [`ServingConfig`] that controls how requests are
//! turned into training runs: whether every request retrains, how many runs
//! may execute at once, and the trainer and model settings.

use finadvisor_training::{ModelSpec, TrainerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default admission limit for concurrent training runs.
pub const DEFAULT_MAX_CONCURRENT_TRAININGS: usize = 4;

/// Whether requests share a trained model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelPolicy {
    /// Every request builds and trains its own model.
    #[default]
    RetrainPerRequest,
    /// The first successful run is cached and reused read-only.
    TrainOnce,
}

/// Configuration for the advisor service.
///
/// # Example
///
/// ```
/// use finadvisor_serving::config::{ModelPolicy, ServingConfig};
///
/// let config = ServingConfig::builder()
///     .model_policy(ModelPolicy::TrainOnce)
///     .max_concurrent_trainings(2)
///     .epochs(500)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServingConfig {
    /// Retrain per request or train once.
    pub model_policy: ModelPolicy,

    /// Maximum number of training runs executing at once.
    pub max_concurrent_trainings: usize,

    /// Trainer settings (epochs, logging interval, seed).
    pub trainer: TrainerConfig,

    /// Network topology and optimizer.
    pub model: ModelSpec,
}

impl Default for ServingConfig {
    fn default() -> Self {
        Self {
            model_policy: ModelPolicy::default(),
            max_concurrent_trainings: DEFAULT_MAX_CONCURRENT_TRAININGS,
            trainer: TrainerConfig::default(),
            model: ModelSpec::default(),
        }
    }
}

impl ServingConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ServingConfigBuilder {
        ServingConfigBuilder::default()
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::InvalidConfigFile(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|e| ConfigError::InvalidConfigFile(e.to_string()))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_trainings == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        self.trainer
            .validate()
            .map_err(|e| ConfigError::InvalidTrainer(e.to_string()))?;
        self.model
            .optimizer
            .validate()
            .map_err(|e| ConfigError::InvalidModel(e.to_string()))?;
        Ok(())
    }
}

/// Builder for [`ServingConfig`].
#[derive(Debug, Default)]
pub struct ServingConfigBuilder {
    model_policy: Option<ModelPolicy>,
    max_concurrent_trainings: Option<usize>,
    trainer: Option<TrainerConfig>,
    model: Option<ModelSpec>,
    epochs: Option<u64>,
    seed: Option<u64>,
}

impl ServingConfigBuilder {
    /// Set the model policy.
    pub fn model_policy(mut self, policy: ModelPolicy) -> Self {
        self.model_policy = Some(policy);
        self
    }

    /// Set the admission limit.
    pub fn max_concurrent_trainings(mut self, max: usize) -> Self {
        self.max_concurrent_trainings = Some(max);
        self
    }

    /// Set the whole trainer configuration.
    pub fn trainer(mut self, trainer: TrainerConfig) -> Self {
        self.trainer = Some(trainer);
        self
    }

    /// Set the model spec.
    pub fn model(mut self, model: ModelSpec) -> Self {
        self.model = Some(model);
        self
    }

    /// Override the number of epochs.
    pub fn epochs(mut self, epochs: u64) -> Self {
        self.epochs = Some(epochs);
        self
    }

    /// Override the seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ServingConfig {
        let default = ServingConfig::default();
        let mut trainer = self.trainer.unwrap_or(default.trainer);
        if let Some(epochs) = self.epochs {
            trainer.epochs = epochs;
        }
        if let Some(seed) = self.seed {
            trainer.seed = seed;
        }
        ServingConfig {
            model_policy: self.model_policy.unwrap_or(default.model_policy),
            max_concurrent_trainings: self
                .max_concurrent_trainings
                .unwrap_or(default.max_concurrent_trainings),
            trainer,
            model: self.model.unwrap_or(default.model),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid admission limit
    #[error("Invalid max_concurrent_trainings: must be at least 1")]
    InvalidConcurrency,

    /// Invalid trainer settings
    #[error("Invalid trainer settings: {0}")]
    InvalidTrainer(String),

    /// Invalid model settings
    #[error("Invalid model settings: {0}")]
    InvalidModel(String),

    /// Invalid configuration file
    #[error("Invalid configuration file: {0}")]
    InvalidConfigFile(String),
}
