//! Training metrics collection and recording.
//!
//! This module provides the per-epoch [`Metrics`] snapshot handed to hooks and
//! a [`MetricsRecorder`] that keeps the loss curve of a training run.

use serde::{Deserialize, Serialize};

/// Metrics observed at the end of one epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Mean squared error computed on the epoch's forward pass.
    pub loss: f64,
    /// Zero-based epoch index.
    pub epoch: u64,
}

impl Metrics {
    /// Creates a new `Metrics` instance with the given loss and epoch.
    ///
    /// # Examples
    ///
    /// ```
    /// use finadvisor_training::metrics::Metrics;
    ///
    /// let metrics = Metrics::new(0.5, 100);
    /// assert_eq!(metrics.loss, 0.5);
    /// assert_eq!(metrics.epoch, 100);
    /// ```
    pub fn new(loss: f64, epoch: u64) -> Self {
        Self { loss, epoch }
    }
}

/// Records the loss of every epoch in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsRecorder {
    losses: Vec<f64>,
}

impl MetricsRecorder {
    /// Creates a new empty `MetricsRecorder`.
    ///
    /// # Examples
    ///
    /// ```
    /// use finadvisor_training::metrics::MetricsRecorder;
    ///
    /// let recorder = MetricsRecorder::new();
    /// assert_eq!(recorder.count(), 0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder with room for `epochs` entries.
    pub fn with_capacity(epochs: usize) -> Self {
        Self {
            losses: Vec::with_capacity(epochs),
        }
    }

    /// Records a set of metrics.
    pub fn record(&mut self, metrics: &Metrics) {
        self.losses.push(metrics.loss);
    }

    /// Number of recorded epochs.
    pub fn count(&self) -> usize {
        self.losses.len()
    }

    /// Loss of the most recent epoch.
    pub fn last_loss(&self) -> Option<f64> {
        self.losses.last().copied()
    }

    /// Lowest loss seen so far.
    pub fn best_loss(&self) -> Option<f64> {
        self.losses.iter().copied().reduce(f64::min)
    }

    /// The full loss curve, indexed by epoch.
    pub fn losses(&self) -> &[f64] {
        &self.losses
    }
}
