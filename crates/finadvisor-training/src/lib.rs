//! Training and inference for the finance advisor regression model.
//!
//! This crate wires the numeric substrate into a complete pipeline:
//!
//! - [`dataset`]: the synthetic income fixture and the [`DatasetProvider`] seam
//! - [`model`]: the 1 → 8 → 6 → 3 network with its Adamax optimizer
//! - [`trainer`]: full-batch training with per-epoch hooks
//! - [`predictor`]: batched inference on a fitted model
//! - [`pipeline`]: build, fit and probe in one call
//!
//! # Example
//!
//! ```no_run
//! use finadvisor_training::prelude::*;
//!
//! let pipeline = TrainingPipeline::new(ModelSpec::default(), TrainerConfig::default());
//! let run = pipeline.run(&SyntheticDataset).unwrap();
//! println!("final loss {}, sample {:?}", run.final_loss, run.sample);
//! ```

pub mod context;
pub mod dataset;
pub mod error;
pub mod hooks;
pub mod loss;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod predictor;
pub mod trainer;

pub use context::{Backend, ExecutionContext};
pub use dataset::{
    Dataset, DatasetProvider, SyntheticDataset, TestSet, TrainingExample, TrainingSet,
    PROBE_INCOME,
};
pub use error::{TrainingError, TrainingResult};
pub use hooks::{Hook, HookError, HookList, HookResult, LoggingHook};
pub use metrics::{Metrics, MetricsRecorder};
pub use model::{AdvisorModel, FittedModel, ModelBuilder, ModelSpec, Topology};
pub use pipeline::{SamplePrediction, TrainingPipeline, TrainingRun};
pub use predictor::{Prediction, Predictor};
pub use trainer::{Trainer, TrainerConfig, TrainingOutput};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::context::ExecutionContext;
    pub use crate::dataset::{DatasetProvider, SyntheticDataset};
    pub use crate::error::{TrainingError, TrainingResult};
    pub use crate::model::{ModelBuilder, ModelSpec, Topology};
    pub use crate::pipeline::{SamplePrediction, TrainingPipeline, TrainingRun};
    pub use crate::predictor::{Prediction, Predictor};
    pub use crate::trainer::{Trainer, TrainerConfig};
}
