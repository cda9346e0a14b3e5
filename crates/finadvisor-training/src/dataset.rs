//! The synthetic income dataset.
//!
//! The fixture is a fixed table of monthly incomes with the savings,
//! retirement and investment amounts the model learns to recommend. Expenses
//! are carried along for completeness but are never a training target.

use crate::error::{TrainingError, TrainingResult};
use finadvisor_layers::{LayerError, Tensor};
use serde::{Deserialize, Serialize};

/// Number of regression targets per income.
pub const NUM_TARGETS: usize = 3;

/// Income used for the sample prediction in every response.
pub const PROBE_INCOME: f64 = 6000.0;

const TRAINING_INCOMES: [f64; 14] = [
    1500.0, 2000.0, 2500.0, 3000.0, 3500.0, 4000.0, 5000.0, 6000.0, 7000.0, 8000.0, 9000.0,
    10000.0, 12000.0, 15000.0,
];

const RETIREMENT: [f64; 14] = [
    225.0, 300.0, 375.0, 450.0, 525.0, 600.0, 750.0, 900.0, 1050.0, 1200.0, 1350.0, 1500.0,
    1800.0, 2250.0,
];

const INVESTMENTS: [f64; 14] = [
    190.0, 250.0, 310.0, 375.0, 440.0, 500.0, 625.0, 750.0, 875.0, 1000.0, 1125.0, 1250.0,
    1500.0, 1875.0,
];

const EXPENSES: [f64; 14] = [
    1125.0, 1500.0, 1875.0, 2100.0, 2300.0, 2500.0, 3000.0, 3500.0, 4000.0, 4500.0, 5000.0,
    5500.0, 6500.0, 8000.0,
];

const TEST_INCOMES: [f64; 10] = [
    1000.0, 2250.0, 3250.0, 4500.0, 5500.0, 7500.0, 9500.0, 11000.0, 13000.0, 16000.0,
];

/// One row of the fixture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingExample {
    /// Monthly income.
    pub income: f64,
    /// Recommended monthly savings.
    pub savings: f64,
    /// Recommended retirement contribution.
    pub retirement: f64,
    /// Recommended investment amount.
    pub investments: f64,
    /// Monthly expenses. Not a training target.
    pub expenses: f64,
}

impl TrainingExample {
    /// The three regression targets in output order.
    pub fn targets(&self) -> [f64; NUM_TARGETS] {
        [self.savings, self.retirement, self.investments]
    }
}

/// Input and target matrices for one training run.
///
/// `inputs` has shape `[N, 1]` and `targets` has shape `[N, 3]`. The shapes are
/// only checked against each other when training starts, so a set with
/// malformed targets can still be constructed and fails at fit time.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    inputs: Tensor,
    targets: Tensor,
}

impl TrainingSet {
    /// Builds the input and target matrices from fixture rows.
    pub fn from_examples(examples: &[TrainingExample]) -> TrainingResult<Self> {
        if examples.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }
        let incomes: Vec<f32> = examples.iter().map(|e| e.income as f32).collect();
        let targets: Vec<[f32; NUM_TARGETS]> = examples
            .iter()
            .map(|e| e.targets().map(|v| v as f32))
            .collect();
        Ok(Self {
            inputs: Tensor::column(&incomes),
            targets: Tensor::from_rows(&targets)?,
        })
    }

    /// Wraps pre-built tensors without checking that they agree.
    pub fn from_tensors(inputs: Tensor, targets: Tensor) -> Self {
        Self { inputs, targets }
    }

    /// Income column, shape `[N, 1]`.
    pub fn inputs(&self) -> &Tensor {
        &self.inputs
    }

    /// Target matrix, normally shape `[N, 3]`.
    pub fn targets(&self) -> &Tensor {
        &self.targets
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.inputs.shape().first().copied().unwrap_or(0)
    }

    /// Returns true if the set has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that inputs are `[N, 1]` and targets are `[N, out_dim]`.
    pub fn check_shapes(&self, out_dim: usize) -> Result<(), LayerError> {
        let n = self.len();
        if self.inputs.shape() != [n, 1] {
            return Err(LayerError::ShapeMismatch {
                expected: vec![n, 1],
                actual: self.inputs.shape().to_vec(),
            });
        }
        if self.targets.shape() != [n, out_dim] {
            return Err(LayerError::ShapeMismatch {
                expected: vec![n, out_dim],
                actual: self.targets.shape().to_vec(),
            });
        }
        Ok(())
    }
}

/// Incomes used for the diagnostic prediction pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSet {
    incomes: Vec<f64>,
}

impl TestSet {
    /// Creates a test set from incomes.
    pub fn new(incomes: Vec<f64>) -> Self {
        Self { incomes }
    }

    /// The test incomes in order.
    pub fn incomes(&self) -> &[f64] {
        &self.incomes
    }

    /// Number of test incomes.
    pub fn len(&self) -> usize {
        self.incomes.len()
    }

    /// Returns true if there are no test incomes.
    pub fn is_empty(&self) -> bool {
        self.incomes.is_empty()
    }
}

/// Training rows plus test incomes as produced by a [`DatasetProvider`].
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Matrices the trainer fits against.
    pub training: TrainingSet,
    /// Incomes for the diagnostic pass.
    pub test: TestSet,
}

/// Source of training data.
pub trait DatasetProvider: Send + Sync {
    /// Produces a fresh dataset.
    fn load(&self) -> TrainingResult<Dataset>;

    /// Returns the name of the provider for logging.
    fn name(&self) -> &str {
        "dataset_provider"
    }
}

/// The hard-coded fixture.
///
/// # Examples
///
/// ```
/// use finadvisor_training::dataset::{DatasetProvider, SyntheticDataset};
///
/// let dataset = SyntheticDataset.load().unwrap();
/// assert_eq!(dataset.training.len(), 14);
/// assert_eq!(dataset.test.len(), 10);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticDataset;

impl SyntheticDataset {
    /// The fixture rows in table order.
    pub fn examples(&self) -> Vec<TrainingExample> {
        (0..TRAINING_INCOMES.len())
            .map(|i| TrainingExample {
                income: TRAINING_INCOMES[i],
                savings: TRAINING_INCOMES[i] / 10.0,
                retirement: RETIREMENT[i],
                investments: INVESTMENTS[i],
                expenses: EXPENSES[i],
            })
            .collect()
    }

    /// The test incomes, none of which appear in the training rows.
    pub fn test_set(&self) -> TestSet {
        TestSet::new(TEST_INCOMES.to_vec())
    }
}

impl DatasetProvider for SyntheticDataset {
    fn load(&self) -> TrainingResult<Dataset> {
        Ok(Dataset {
            training: TrainingSet::from_examples(&self.examples())?,
            test: self.test_set(),
        })
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}
