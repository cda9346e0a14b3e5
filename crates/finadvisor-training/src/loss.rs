//! Mean squared error.

use finadvisor_layers::{LayerError, LayerResult, Tensor};

/// Computes the mean squared error over every element and its gradient with
/// respect to `predictions`.
///
/// The loss is averaged over all `N * K` elements, so the gradient is
/// `2 * (pred - target) / (N * K)`.
///
/// # Errors
///
/// Returns [`LayerError::ShapeMismatch`] if the shapes differ, or
/// [`LayerError::ForwardError`] if the tensors are empty.
pub fn mean_squared_error(predictions: &Tensor, targets: &Tensor) -> LayerResult<(f64, Tensor)> {
    if predictions.shape() != targets.shape() {
        return Err(LayerError::ShapeMismatch {
            expected: predictions.shape().to_vec(),
            actual: targets.shape().to_vec(),
        });
    }
    let count = predictions.numel();
    if count == 0 {
        return Err(LayerError::ForwardError {
            message: "Cannot compute loss over an empty batch".to_string(),
        });
    }

    let diff = predictions.sub(targets)?;
    let loss = diff
        .data()
        .iter()
        .map(|&d| f64::from(d) * f64::from(d))
        .sum::<f64>()
        / count as f64;
    let grad = diff.scale(2.0 / count as f32);
    Ok((loss, grad))
}
