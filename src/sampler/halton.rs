//! Randomly shifted Halton sequence.
//!
//! Coordinate `j` of point `i` is the radical inverse of `i` in the `j`-th
//! prime base, shifted by a per-axis random offset modulo 1 (a
//! Cranley-Patterson rotation). The shift is drawn from the seed, so equal
//! seeds give equal sequences. Index 0 maps to the origin before shifting
//! and is skipped.

use ndarray::Array2;

use super::PointSequence;
use crate::error::{Error, Result};

/// Highest supported dimension.
pub const MAX_DIMENSION: usize = 1000;

/// Randomly shifted Halton sequence over `[0, 1)^dimension`.
///
/// # Examples
///
/// ```
/// use searchspace::sampler::{HaltonSequence, PointSequence};
///
/// let mut seq = HaltonSequence::new(2, &mut fastrand::Rng::with_seed(7)).unwrap();
/// let points = seq.next_points(16).unwrap();
/// assert_eq!(points.dim(), (16, 2));
/// ```
#[derive(Clone, Debug)]
pub struct HaltonSequence {
    bases: Vec<u64>,
    shifts: Vec<f64>,
    index: u64,
}

impl HaltonSequence {
    /// Creates a sequence whose axis shifts are drawn from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionTooLarge`] above [`MAX_DIMENSION`].
    pub fn new(dimension: usize, rng: &mut fastrand::Rng) -> Result<Self> {
        if dimension > MAX_DIMENSION {
            return Err(Error::DimensionTooLarge {
                dimension,
                max: MAX_DIMENSION,
                sequence: "Halton",
            });
        }
        let shifts = (0..dimension).map(|_| rng.f64()).collect();
        Ok(Self {
            bases: first_primes(dimension),
            shifts,
            index: 1,
        })
    }

    /// Index of the next point to be generated.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }
}

impl PointSequence for HaltonSequence {
    fn dimension(&self) -> usize {
        self.bases.len()
    }

    fn next_points(&mut self, num_points: usize) -> Result<Array2<f64>> {
        let end = u64::try_from(num_points)
            .ok()
            .and_then(|n| self.index.checked_add(n))
            .ok_or(Error::SequenceOverflow("Halton"))?;
        let start = self.index;
        let points = Array2::from_shape_fn((num_points, self.bases.len()), |(i, j)| {
            let value = radical_inverse(start + i as u64, self.bases[j]) + self.shifts[j];
            value.fract()
        });
        self.index = end;
        Ok(points)
    }
}

/// Van der Corput radical inverse of `index` in `base`.
#[allow(clippy::cast_precision_loss)]
fn radical_inverse(mut index: u64, base: u64) -> f64 {
    let inv_base = 1.0 / base as f64;
    let mut scale = inv_base;
    let mut result = 0.0;
    while index > 0 {
        result += (index % base) as f64 * scale;
        index /= base;
        scale *= inv_base;
    }
    result
}

fn first_primes(count: usize) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::with_capacity(count);
    let mut candidate = 2;
    while primes.len() < count {
        if primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0)
        {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}
