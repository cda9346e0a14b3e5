//! End-to-end training run: build, fit, diagnose.

use crate::context::ExecutionContext;
use crate::dataset::{DatasetProvider, NUM_TARGETS, PROBE_INCOME};
use crate::error::TrainingResult;
use crate::model::{FittedModel, ModelBuilder, ModelSpec};
use crate::predictor::{Prediction, Predictor};
use crate::trainer::{Trainer, TrainerConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The probe prediction included in every successful response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplePrediction {
    /// Probe income.
    pub income: f64,
    /// Savings, retirement and investments, in that order.
    pub prediction: [f64; NUM_TARGETS],
}

impl From<Prediction> for SamplePrediction {
    fn from(p: Prediction) -> Self {
        Self {
            income: p.income,
            prediction: p.outputs(),
        }
    }
}

/// Everything a completed training run produced.
#[derive(Debug, Clone)]
pub struct TrainingRun {
    /// The trained model.
    pub model: FittedModel,
    /// Context the model was trained under.
    pub context: ExecutionContext,
    /// Loss of the last epoch.
    pub final_loss: f64,
    /// Prediction at the probe income.
    pub sample: SamplePrediction,
    /// Predictions for the test incomes, in test-set order.
    pub diagnostics: Vec<Prediction>,
}

impl TrainingRun {
    /// Predicts further incomes with the run's model and context.
    pub fn predict(&self, incomes: &[f64]) -> TrainingResult<Vec<Prediction>> {
        Predictor.predict(&self.model, &self.context, incomes)
    }

    /// Predicts one income.
    pub fn predict_one(&self, income: f64) -> TrainingResult<Prediction> {
        Predictor.predict_one(&self.model, &self.context, income)
    }
}

/// Builds, fits and probes a fresh model on every [`run`](Self::run).
#[derive(Debug, Clone, Default)]
pub struct TrainingPipeline {
    spec: ModelSpec,
    trainer: TrainerConfig,
}

impl TrainingPipeline {
    /// Creates a pipeline.
    pub fn new(spec: ModelSpec, trainer: TrainerConfig) -> Self {
        Self { spec, trainer }
    }

    /// Returns the trainer configuration.
    pub fn trainer_config(&self) -> &TrainerConfig {
        &self.trainer
    }

    /// Returns the model spec.
    pub fn model_spec(&self) -> &ModelSpec {
        &self.spec
    }

    /// Loads the dataset, trains a new model and runs the diagnostic pass.
    pub fn run(&self, provider: &dyn DatasetProvider) -> TrainingResult<TrainingRun> {
        let ctx = self.trainer.context();
        let dataset = provider.load()?;
        let model = ModelBuilder::new(self.spec.clone()).build(&ctx)?;

        let output = Trainer::new(self.trainer.clone())?.fit(model, &dataset.training, &ctx)?;
        info!(
            final_loss = output.final_loss,
            best_loss = output.history.best_loss(),
            "Final loss: {:.6}",
            output.final_loss
        );

        let diagnostics = Predictor.predict(&output.model, &ctx, dataset.test.incomes())?;
        for p in &diagnostics {
            info!(
                income = p.income,
                savings = p.savings,
                retirement = p.retirement,
                investments = p.investments,
                "Income {}: predicted savings {:.2}, retirement {:.2}, investments {:.2}",
                p.income,
                p.savings,
                p.retirement,
                p.investments
            );
        }

        let sample = Predictor.predict_one(&output.model, &ctx, PROBE_INCOME)?.into();

        Ok(TrainingRun {
            model: output.model,
            context: ctx,
            final_loss: output.final_loss,
            sample,
            diagnostics,
        })
    }
}
