//! Scrambled Sobol low-discrepancy sequence.
//!
//! [`SobolSequence`] yields points from an Owen-scrambled Sobol sequence
//! (Burley 2020, via `sobol_burley`) in the unit cube. The scramble seed is
//! fixed, so the sequence is fully determined by its starting offset
//! (`skip`): two sequences started at the same offset produce identical
//! points. Successive calls to [`PointSequence::next_points`] continue
//! where the previous call stopped.
//!
//! `sobol_burley` addresses [`BLOCK_SIZE`] points per scramble seed. Indices
//! past that are split into blocks, and each block is scrambled with its own
//! seed derived from the block number, so a sequence runs to `u32::MAX`.
//!
//! # Example
//!
//! ```
//! use searchspace::sampler::{PointSequence, SobolSequence};
//!
//! let mut a = SobolSequence::new(3, 10).unwrap();
//! let mut b = SobolSequence::new(3, 10).unwrap();
//! assert_eq!(a.next_points(8).unwrap(), b.next_points(8).unwrap());
//! ```

use ndarray::Array2;
use sobol_burley::sample;

use super::PointSequence;
use crate::error::{Error, Result};

/// Highest dimension supported by the underlying direction numbers.
pub const MAX_DIMENSION: usize = 256;

/// Number of indices served by one scramble seed.
pub const BLOCK_SIZE: u32 = 1 << 16;

const SCRAMBLE_SEED: u32 = 0x5eed;
const BLOCK_SEED_STEP: u32 = 0x9e37_79b9;

/// Owen-scrambled Sobol sequence over `[0, 1)^dimension`.
#[derive(Clone, Debug)]
pub struct SobolSequence {
    dimension: u32,
    index: u32,
}

impl SobolSequence {
    /// Creates a sequence starting at index `skip`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionTooLarge`] above [`MAX_DIMENSION`].
    pub fn new(dimension: usize, skip: u32) -> Result<Self> {
        if dimension > MAX_DIMENSION {
            return Err(Error::DimensionTooLarge {
                dimension,
                max: MAX_DIMENSION,
                sequence: "Sobol",
            });
        }
        let dimension = u32::try_from(dimension).map_err(|_| Error::Internal("Sobol dimension"))?;
        Ok(Self {
            dimension,
            index: skip,
        })
    }

    /// Creates a sequence at a random offset that leaves room for
    /// `num_points` indices inside the first block.
    ///
    /// Requests of a full block or more start at 0.
    ///
    /// # Errors
    ///
    /// See [`SobolSequence::new`].
    pub fn with_random_skip(
        dimension: usize,
        num_points: usize,
        rng: &mut fastrand::Rng,
    ) -> Result<Self> {
        let room = u32::try_from(num_points)
            .map_or(0, |n| BLOCK_SIZE.saturating_sub(n))
            .max(1);
        Self::new(dimension, rng.u32(..room))
    }

    /// Index of the next point to be generated.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl PointSequence for SobolSequence {
    fn dimension(&self) -> usize {
        self.dimension as usize
    }

    #[allow(clippy::cast_possible_truncation)]
    fn next_points(&mut self, num_points: usize) -> Result<Array2<f64>> {
        let end = u32::try_from(num_points)
            .ok()
            .and_then(|n| self.index.checked_add(n))
            .ok_or(Error::SequenceOverflow("Sobol"))?;
        let start = self.index;
        let points = Array2::from_shape_fn((num_points, self.dimension as usize), |(i, j)| {
            let index = start + i as u32;
            f64::from(sample(index % BLOCK_SIZE, j as u32, block_seed(index / BLOCK_SIZE)))
        });
        self.index = end;
        Ok(points)
    }
}

fn block_seed(block: u32) -> u32 {
    SCRAMBLE_SEED ^ block.wrapping_mul(BLOCK_SEED_STEP)
}
