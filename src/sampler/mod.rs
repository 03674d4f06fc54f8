//! Point generators and the rejection loop used by box sampling.
//!
//! Every generator implements [`PointSequence`]: it yields batches of
//! points in the unit cube, continuing from where the previous batch
//! stopped. [`BoxSpace`](crate::space::BoxSpace) scales those points into
//! its bounds and, when it carries constraints, filters them through
//! [`rejection`].

pub mod halton;
pub mod random;
pub mod rejection;
#[cfg(feature = "sobol")]
pub mod sobol;

use ndarray::Array2;

use crate::error::Result;

pub use halton::HaltonSequence;
pub use random::RandomSampler;
pub(crate) use random::UniformSequence;
pub use rejection::{RejectionConfig, RejectionConfigBuilder};
#[cfg(feature = "sobol")]
pub use sobol::SobolSequence;

/// A stateful source of points in `[0, 1)^dimension`.
pub trait PointSequence {
    /// Number of coordinates per point.
    fn dimension(&self) -> usize;

    /// The next `num_points` points as a `[num_points, dimension]` array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SequenceOverflow`](crate::Error::SequenceOverflow)
    /// if the sequence index would overflow.
    fn next_points(&mut self, num_points: usize) -> Result<Array2<f64>>;
}
