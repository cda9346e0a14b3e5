//! Weight initialization driven by an explicit seed.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::tensor::Tensor;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Initializer {
    /// Glorot/Xavier uniform: `U(-l, l)` with `l = sqrt(6 / (fan_in + fan_out))`.
    #[default]
    GlorotUniform,
    /// All zeros.
    Zeros,
}

impl Initializer {
    /// Fills a tensor of `shape`. Only random initializers consume `seed`, and
    /// the same seed always yields the same values.
    pub fn initialize(&self, shape: &[usize], seed: u64) -> Tensor {
        let numel: usize = shape.iter().product();
        let data = match self {
            Initializer::Zeros => vec![0.0; numel],
            Initializer::GlorotUniform => {
                let (fan_in, fan_out) = fan_in_out(shape);
                let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
                let dist = Uniform::new_inclusive(-limit, limit);
                let mut rng = StdRng::seed_from_u64(seed);
                (0..numel).map(|_| dist.sample(&mut rng)).collect()
            }
        };
        let mut tensor = Tensor::zeros(shape);
        tensor.data_mut().copy_from_slice(&data);
        tensor
    }
}

fn fan_in_out(shape: &[usize]) -> (usize, usize) {
    match shape {
        [] => (1, 1),
        [dim] => ((*dim).max(1), (*dim).max(1)),
        [fan_in, fan_out, ..] => ((*fan_in).max(1), (*fan_out).max(1)),
    }
}
