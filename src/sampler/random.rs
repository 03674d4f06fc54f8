//! Pseudo-random sampling.

use ndarray::Array2;
use parking_lot::Mutex;

use super::PointSequence;
use crate::error::Result;
use crate::rng_util;
use crate::space::SearchSpace;
use crate::tensor::Tensor;

/// A shared pseudo-random generator handle for sampling spaces.
///
/// Spaces accept an optional seed per call; this handle is the alternative
/// when one stream should feed many calls. Holding it is the only state:
/// nothing global is consulted.
///
/// # Examples
///
/// ```
/// use searchspace::prelude::*;
///
/// // Create with a fixed seed for reproducibility
/// let sampler = RandomSampler::with_seed(42);
/// let space = BoxSpace::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
/// let points = sampler.sample(&space, 10).unwrap();
/// assert_eq!(points.shape(), &[10, 2]);
/// ```
pub struct RandomSampler {
    rng: Mutex<fastrand::Rng>,
}

impl RandomSampler {
    /// Creates a new random sampler with a default random seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Creates a new random sampler with a fixed seed for reproducibility.
    ///
    /// Using the same seed will produce the same sequence of sampled values.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    /// Draws `num_samples` points from `space` using this handle's stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSampleSize`](crate::Error::InvalidSampleSize)
    /// for negative counts, or whatever the space's sampler returns.
    pub fn sample<S: SearchSpace + ?Sized>(&self, space: &S, num_samples: i64) -> Result<Tensor> {
        let num_samples = rng_util::sample_count(num_samples)?;
        let mut rng = self.rng.lock();
        space.sample_with_rng(num_samples, &mut rng)
    }

    /// Draws a seed for APIs that take one explicitly.
    #[must_use]
    pub fn next_seed(&self) -> u64 {
        self.rng.lock().u64(..)
    }
}

impl Default for RandomSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Independent uniform draws over `[0, 1)^dimension`.
pub(crate) struct UniformSequence<'a> {
    rng: &'a mut fastrand::Rng,
    dimension: usize,
}

impl<'a> UniformSequence<'a> {
    pub(crate) fn new(dimension: usize, rng: &'a mut fastrand::Rng) -> Self {
        Self { rng, dimension }
    }
}

impl PointSequence for UniformSequence<'_> {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn next_points(&mut self, num_points: usize) -> Result<Array2<f64>> {
        Ok(Array2::from_shape_simple_fn((num_points, self.dimension), || {
            self.rng.f64()
        }))
    }
}
