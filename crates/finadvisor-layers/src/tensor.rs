#![allow(clippy::needless_range_loop)]
//! Tensor type for neural network computations.
//!
//! A small dense, row-major `f32` array. Shape-dependent operations return
//! [`LayerError`] instead of panicking so that malformed inputs surface as
//! ordinary errors at the training boundary.

use crate::error::{LayerError, LayerResult};
use serde::{Deserialize, Serialize};

/// A multi-dimensional array for neural network computations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    /// The shape of the tensor (dimensions)
    shape: Vec<usize>,
    /// The underlying data in row-major order
    data: Vec<f32>,
}

impl Tensor {
    /// Creates a new tensor with the given shape, filled with zeros.
    ///
    /// # Example
    ///
    /// ```
    /// use finadvisor_layers::tensor::Tensor;
    ///
    /// let t = Tensor::zeros(&[2, 3]);
    /// assert_eq!(t.shape(), &[2, 3]);
    /// assert_eq!(t.numel(), 6);
    /// ```
    pub fn zeros(shape: &[usize]) -> Self {
        let numel: usize = shape.iter().product();
        Self {
            shape: shape.to_vec(),
            data: vec![0.0; numel],
        }
    }

    /// Creates a new tensor with the given shape, filled with ones.
    pub fn ones(shape: &[usize]) -> Self {
        let numel: usize = shape.iter().product();
        Self {
            shape: shape.to_vec(),
            data: vec![1.0; numel],
        }
    }

    /// Creates a new tensor with the given shape and data.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::ShapeMismatch`] if the data length doesn't match
    /// the number of elements implied by `shape`.
    pub fn from_data(shape: &[usize], data: Vec<f32>) -> LayerResult<Self> {
        let numel: usize = shape.iter().product();
        if data.len() != numel {
            return Err(LayerError::ShapeMismatch {
                expected: shape.to_vec(),
                actual: vec![data.len()],
            });
        }
        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    /// Builds a `[rows.len(), width]` matrix from row slices.
    ///
    /// # Example
    ///
    /// ```
    /// use finadvisor_layers::tensor::Tensor;
    ///
    /// let t = Tensor::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// assert_eq!(t.shape(), &[2, 2]);
    /// assert_eq!(t.row(1), &[3.0, 4.0]);
    /// ```
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> LayerResult<Self> {
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * width);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(LayerError::ShapeMismatch {
                    expected: vec![width],
                    actual: vec![row.len()],
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_data(&[rows.len(), width], data)
    }

    /// Builds a `[values.len(), 1]` column vector.
    pub fn column(values: &[f32]) -> Self {
        Self {
            shape: vec![values.len(), 1],
            data: values.to_vec(),
        }
    }

    /// Returns the shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total number of elements.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Returns a reference to the underlying data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns a mutable reference to the underlying data.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Returns row `i` of a 2D tensor.
    ///
    /// # Panics
    ///
    /// Panics if the tensor is not 2D or `i` is out of bounds.
    pub fn row(&self, i: usize) -> &[f32] {
        assert_eq!(self.ndim(), 2, "row requires a 2D tensor");
        let n = self.shape[1];
        &self.data[i * n..(i + 1) * n]
    }

    /// Iterates over the rows of a 2D tensor.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        let n = self.shape.get(1).copied().unwrap_or(1).max(1);
        self.data.chunks(n)
    }

    /// Whether every element is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    fn require_2d(&self, op: &str) -> LayerResult<(usize, usize)> {
        if self.ndim() != 2 {
            return Err(LayerError::ForwardError {
                message: format!("{} requires a 2D tensor, got shape {:?}", op, self.shape),
            });
        }
        Ok((self.shape[0], self.shape[1]))
    }

    /// Matrix multiplication between two 2D tensors.
    pub fn matmul(&self, other: &Tensor) -> LayerResult<Tensor> {
        let (m, k) = self.require_2d("matmul")?;
        let (k2, n) = other.require_2d("matmul")?;
        if k != k2 {
            return Err(LayerError::ShapeMismatch {
                expected: vec![k, n],
                actual: other.shape.clone(),
            });
        }

        let mut result = vec![0.0; m * n];
        for i in 0..m {
            for l in 0..k {
                let a = self.data[i * k + l];
                for j in 0..n {
                    result[i * n + j] += a * other.data[l * n + j];
                }
            }
        }

        Tensor::from_data(&[m, n], result)
    }

    /// Transposes a 2D tensor.
    pub fn transpose(&self) -> LayerResult<Tensor> {
        let (m, n) = self.require_2d("transpose")?;

        let mut result = vec![0.0; m * n];
        for i in 0..m {
            for j in 0..n {
                result[j * m + i] = self.data[i * n + j];
            }
        }

        Tensor::from_data(&[n, m], result)
    }

    /// Element-wise addition, broadcasting a 1D tensor along rows (bias addition).
    pub fn add(&self, other: &Tensor) -> LayerResult<Tensor> {
        if self.shape == other.shape {
            let data = self.zip_with(other, |a, b| a + b);
            Tensor::from_data(&self.shape, data)
        } else if self.ndim() == 2 && other.ndim() == 1 && self.shape[1] == other.shape[0] {
            let mut data = self.data.clone();
            let n = self.shape[1];
            for i in 0..self.shape[0] {
                for j in 0..n {
                    data[i * n + j] += other.data[j];
                }
            }
            Tensor::from_data(&self.shape, data)
        } else {
            Err(LayerError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: other.shape.clone(),
            })
        }
    }

    /// Element-wise subtraction of same-shaped tensors.
    pub fn sub(&self, other: &Tensor) -> LayerResult<Tensor> {
        self.same_shape(other)?;
        Tensor::from_data(&self.shape, self.zip_with(other, |a, b| a - b))
    }

    /// Element-wise multiplication of same-shaped tensors.
    pub fn mul(&self, other: &Tensor) -> LayerResult<Tensor> {
        self.same_shape(other)?;
        Tensor::from_data(&self.shape, self.zip_with(other, |a, b| a * b))
    }

    /// Scalar multiplication.
    pub fn scale(&self, scalar: f32) -> Tensor {
        self.map(|a| a * scalar)
    }

    /// Sum all elements in the tensor.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Mean of all elements, or zero for an empty tensor.
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            0.0
        } else {
            self.sum() / self.data.len() as f32
        }
    }

    /// Sums a 2D tensor over its rows, producing a `[cols]` tensor.
    pub fn sum_rows(&self) -> LayerResult<Tensor> {
        let (m, n) = self.require_2d("sum_rows")?;
        let mut result = vec![0.0; n];
        for i in 0..m {
            for j in 0..n {
                result[j] += self.data[i * n + j];
            }
        }
        Tensor::from_data(&[n], result)
    }

    /// Apply a function element-wise.
    pub fn map<F>(&self, f: F) -> Tensor
    where
        F: Fn(f32) -> f32,
    {
        Tensor {
            shape: self.shape.clone(),
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    fn same_shape(&self, other: &Tensor) -> LayerResult<()> {
        if self.shape != other.shape {
            return Err(LayerError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: other.shape.clone(),
            });
        }
        Ok(())
    }

    fn zip_with<F>(&self, other: &Tensor, f: F) -> Vec<f32>
    where
        F: Fn(f32, f32) -> f32,
    {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| f(a, b))
            .collect()
    }
}
