//! Batched inference on a fitted model.

use crate::context::ExecutionContext;
use crate::dataset::NUM_TARGETS;
use crate::error::{TrainingError, TrainingResult};
use crate::model::FittedModel;
use finadvisor_layers::{LayerError, Tensor};
use serde::{Deserialize, Serialize};

/// Recommended amounts for one income.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// The income the prediction was made for.
    pub income: f64,
    /// Recommended monthly savings.
    pub savings: f64,
    /// Recommended retirement contribution.
    pub retirement: f64,
    /// Recommended investment amount.
    pub investments: f64,
}

impl Prediction {
    /// The outputs in model order: savings, retirement, investments.
    pub fn outputs(&self) -> [f64; NUM_TARGETS] {
        [self.savings, self.retirement, self.investments]
    }

    /// Whether all three outputs are finite.
    pub fn is_finite(&self) -> bool {
        self.outputs().iter().all(|v| v.is_finite())
    }
}

/// Runs a fitted model over a batch of incomes.
///
/// Outputs are returned as computed: no clamping, rounding or plausibility
/// checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Predictor;

impl Predictor {
    /// Predicts all incomes with one batched forward pass. The result is
    /// parallel to `incomes`.
    ///
    /// # Errors
    ///
    /// Returns [`TrainingError::Prediction`] if the forward pass fails or
    /// produces the wrong number of outputs.
    pub fn predict(
        &self,
        model: &FittedModel,
        ctx: &ExecutionContext,
        incomes: &[f64],
    ) -> TrainingResult<Vec<Prediction>> {
        if incomes.is_empty() {
            return Ok(Vec::new());
        }

        let batch: Vec<f32> = incomes.iter().map(|&i| i as f32).collect();
        let outputs = model.forward(ctx, &Tensor::column(&batch))?;
        if outputs.shape() != [incomes.len(), NUM_TARGETS] {
            return Err(TrainingError::Prediction {
                source: LayerError::ShapeMismatch {
                    expected: vec![incomes.len(), NUM_TARGETS],
                    actual: outputs.shape().to_vec(),
                },
            });
        }

        Ok(incomes
            .iter()
            .zip(outputs.rows())
            .map(|(&income, row)| Prediction {
                income,
                savings: f64::from(row[0]),
                retirement: f64::from(row[1]),
                investments: f64::from(row[2]),
            })
            .collect())
    }

    /// Predicts a single income as a batch of one.
    pub fn predict_one(
        &self,
        model: &FittedModel,
        ctx: &ExecutionContext,
        income: f64,
    ) -> TrainingResult<Prediction> {
        self.predict(model, ctx, &[income])?
            .pop()
            .ok_or(TrainingError::Prediction {
                source: LayerError::InvalidOutputDimension {
                    expected: NUM_TARGETS,
                    actual: 0,
                },
            })
    }
}
