//! Explicit execution context for the numeric backend.
//!
//! Everything that would otherwise be ambient process state (which backend
//! runs the math, which seed drives initialization) travels in an
//! [`ExecutionContext`] handed to the model builder, trainer and predictor.

use serde::{Deserialize, Serialize};

/// Default seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Numeric backend that executes tensor operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// In-process CPU tensors from `finadvisor-layers`.
    #[default]
    Cpu,
}

/// Handle passed explicitly through model construction, fitting and inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Backend executing the computation.
    pub backend: Backend,
    /// Seed for weight initialization.
    pub seed: u64,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            backend: Backend::Cpu,
            seed: DEFAULT_SEED,
        }
    }
}

impl ExecutionContext {
    /// CPU context with the given seed.
    pub fn cpu(seed: u64) -> Self {
        Self {
            backend: Backend::Cpu,
            seed,
        }
    }
}
