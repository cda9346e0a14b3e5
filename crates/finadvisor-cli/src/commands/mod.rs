//! CLI Command Implementations
//!
//! - [`train`]: one request through the advisor service
//! - [`predict`]: batched predictions from a single training run
//! - [`dataset`]: dump the synthetic fixture

mod dataset;
mod predict;
mod train;

pub use dataset::DatasetCommand;
pub use predict::PredictCommand;
pub use train::TrainCommand;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use finadvisor_serving::{ModelPolicy, ServingConfig};
use std::path::PathBuf;
use tracing::{info, warn};

/// Number of months used to convert a yearly income.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Model policy as a command-line value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Train a new model for every request
    RetrainPerRequest,
    /// Train once and reuse the model
    TrainOnce,
}

impl From<PolicyArg> for ModelPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::RetrainPerRequest => ModelPolicy::RetrainPerRequest,
            PolicyArg::TrainOnce => ModelPolicy::TrainOnce,
        }
    }
}

/// Service configuration options shared by the commands that train.
///
/// Values are layered: defaults, then the JSON config file, then flags and
/// their environment variables.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a JSON service configuration file
    #[arg(long = "config", short = 'c', env = "FINADVISOR_CONFIG_PATH")]
    pub config_path: Option<PathBuf>,

    /// Number of training epochs
    #[arg(long, env = "FINADVISOR_EPOCHS")]
    pub epochs: Option<u64>,

    /// Seed for weight initialization
    #[arg(long, env = "FINADVISOR_SEED")]
    pub seed: Option<u64>,

    /// Whether requests share a trained model
    #[arg(long, value_enum, env = "FINADVISOR_MODEL_POLICY")]
    pub policy: Option<PolicyArg>,

    /// Maximum number of concurrent training runs
    #[arg(long, env = "FINADVISOR_MAX_CONCURRENT_TRAININGS")]
    pub max_concurrent_trainings: Option<usize>,
}

impl ConfigArgs {
    /// Resolves the effective service configuration.
    pub fn load(&self) -> Result<ServingConfig> {
        let mut config = match &self.config_path {
            Some(path) => {
                info!("Loading config from: {:?}", path);
                ServingConfig::from_json_file(path)
                    .with_context(|| format!("Failed to load config file {}", path.display()))?
            }
            None => {
                warn!("No config file provided, using default configuration");
                ServingConfig::default()
            }
        };

        if let Some(epochs) = self.epochs {
            config.trainer.epochs = epochs;
        }
        if let Some(seed) = self.seed {
            config.trainer.seed = seed;
        }
        if let Some(policy) = self.policy {
            config.model_policy = policy.into();
        }
        if let Some(max) = self.max_concurrent_trainings {
            config.max_concurrent_trainings = max;
        }

        config.validate().context("Invalid service configuration")?;
        Ok(config)
    }
}

/// Converts a yearly income to a monthly one when `yearly` is set.
pub fn to_monthly(income: f64, yearly: bool) -> f64 {
    if yearly {
        income / MONTHS_PER_YEAR
    } else {
        income
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = ConfigArgs::default().load().unwrap();
        assert_eq!(config, ServingConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"model_policy": "train_once", "trainer": {{"epochs": 30, "seed": 1}}}}"#
        )
        .unwrap();

        let args = ConfigArgs {
            config_path: Some(file.path().to_path_buf()),
            epochs: Some(12),
            ..ConfigArgs::default()
        };
        let config = args.load().unwrap();
        assert_eq!(config.model_policy, ModelPolicy::TrainOnce);
        assert_eq!(config.trainer.epochs, 12);
        assert_eq!(config.trainer.seed, 1);
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        let args = ConfigArgs {
            max_concurrent_trainings: Some(0),
            ..ConfigArgs::default()
        };
        let err = args.load().unwrap_err();
        assert!(err.to_string().contains("Invalid service configuration"));
    }

    #[test]
    fn test_missing_config_file() {
        let args = ConfigArgs {
            config_path: Some(PathBuf::from("/nonexistent/finadvisor.json")),
            ..ConfigArgs::default()
        };
        assert!(args.load().is_err());
    }

    #[test]
    fn test_to_monthly() {
        assert_eq!(to_monthly(60000.0, true), 5000.0);
        assert_eq!(to_monthly(5000.0, false), 5000.0);
    }
}
