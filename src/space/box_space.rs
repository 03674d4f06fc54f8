//! Continuous axis-aligned boxes with optional constraints.
//!
//! A [`BoxSpace`] is the hyperrectangle `[lower, upper]`, optionally
//! intersected with [`Constraint`]s. Membership only checks the bounds;
//! [`BoxSpace::is_feasible`] checks the constraints.
//!
//! Four samplers are available:
//!
//! | Method | Points | Constraints |
//! |--------|--------|-------------|
//! | [`sample`](SearchSpace::sample) | uniform pseudo-random | ignored |
//! | [`sample_feasible`](BoxSpace::sample_feasible) | uniform pseudo-random | rejection |
//! | [`sample_sobol`](BoxSpace::sample_sobol) / [`sample_sobol_feasible`](BoxSpace::sample_sobol_feasible) | scrambled Sobol | ignored / rejection |
//! | [`sample_halton`](BoxSpace::sample_halton) / [`sample_halton_feasible`](BoxSpace::sample_halton_feasible) | shifted Halton | ignored / rejection |

use ndarray::{Array2, ArrayD};

use super::discrete::coerce_query;
use super::{DiscreteSearchSpace, SearchSpace};
use crate::constraint::{all_non_negative, Constraint};
use crate::error::{Error, Result};
use crate::rng_util;
#[cfg(feature = "sobol")]
use crate::sampler::SobolSequence;
use crate::sampler::{rejection, HaltonSequence, PointSequence, RejectionConfig, UniformSequence};
use crate::tensor::{ensure_same_dtype, split_trailing, DType, Tensor};

/// A continuous box `[lower, upper]`, optionally constrained.
///
/// # Examples
///
/// ```
/// use searchspace::prelude::*;
///
/// let space = BoxSpace::new(vec![0.0, 0.0, 0.0], vec![1.0, 1.0, 1.0]).unwrap();
/// let points = space.sample_halton(8, Some(0)).unwrap();
/// assert_eq!(points.shape(), &[8, 3]);
/// assert!(space.contains(&points).unwrap().iter().all(|&inside| inside));
/// ```
#[derive(Clone, Debug)]
pub struct BoxSpace {
    lower: Tensor,
    upper: Tensor,
    constraints: Vec<Constraint>,
    rejection: RejectionConfig,
}

impl BoxSpace {
    /// Creates an unconstrained box.
    ///
    /// # Errors
    ///
    /// See [`BoxSpace::with_constraints`].
    pub fn new(lower: impl Into<Tensor>, upper: impl Into<Tensor>) -> Result<Self> {
        Self::with_constraints(lower, upper, Vec::new())
    }

    /// Creates a box intersected with `constraints`.
    ///
    /// # Errors
    ///
    /// Fails if the bounds are not rank 1, differ in shape or dtype, are
    /// not floating point, or if some `lower[i] > upper[i]`. Fails with
    /// [`Error::ConstraintShape`] if a linear constraint does not have one
    /// column per box dimension.
    pub fn with_constraints(
        lower: impl Into<Tensor>,
        upper: impl Into<Tensor>,
        constraints: Vec<Constraint>,
    ) -> Result<Self> {
        let (lower, upper) = (lower.into(), upper.into());
        for bound in [&lower, &upper] {
            if bound.ndim() != 1 {
                return Err(Error::InvalidRank {
                    expected: 1,
                    shape: bound.shape().to_vec(),
                });
            }
        }
        if lower.shape() != upper.shape() {
            return Err(Error::BoundsShapeMismatch {
                lower: lower.shape().to_vec(),
                upper: upper.shape().to_vec(),
            });
        }
        ensure_same_dtype(lower.dtype(), upper.dtype())?;
        if !lower.dtype().is_floating() {
            return Err(Error::NonFloatingBounds(lower.dtype()));
        }
        for (index, (&low, &high)) in lower.values().iter().zip(upper.values()).enumerate() {
            if low.is_nan() || high.is_nan() || low > high {
                return Err(Error::InvalidBounds { index, low, high });
            }
        }

        let dimension = lower.len();
        for constraint in &constraints {
            if let Some(width) = constraint.input_dimension()
                && width != dimension
            {
                return Err(Error::ConstraintShape(format!(
                    "linear constraint has {width} columns but the box has dimension {dimension}"
                )));
            }
        }

        Ok(Self {
            lower,
            upper,
            constraints,
            rejection: RejectionConfig::default(),
        })
    }

    /// Replaces the rejection-sampling budget.
    #[must_use]
    pub fn with_rejection_config(mut self, config: RejectionConfig) -> Self {
        self.rejection = config;
        self
    }

    /// The rejection-sampling budget.
    #[must_use]
    pub fn rejection_config(&self) -> &RejectionConfig {
        &self.rejection
    }

    /// The constraints in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Returns `true` if the box carries at least one constraint.
    #[must_use]
    pub fn has_constraints(&self) -> bool {
        !self.constraints.is_empty()
    }

    /// Element type of the bounds and of sampled points.
    #[must_use]
    pub fn dtype(&self) -> DType {
        self.lower.dtype()
    }

    /// The lower bound vector.
    #[must_use]
    pub fn lower_bound(&self) -> &Tensor {
        &self.lower
    }

    /// The upper bound vector.
    #[must_use]
    pub fn upper_bound(&self) -> &Tensor {
        &self.upper
    }

    /// All constraint residuals, concatenated along the trailing axis in
    /// declaration order.
    ///
    /// # Errors
    ///
    /// Returns a shape error if the trailing axis of `points` is not the
    /// box dimension, or any error a constraint returns.
    pub fn constraints_residuals(&self, points: &Tensor) -> Result<Tensor> {
        let batch = split_trailing(points, self.dimension())?;
        if self.constraints.is_empty() {
            return batch.unflatten_values(0, Vec::new(), self.dtype());
        }
        let residuals = self
            .constraints
            .iter()
            .map(|c| c.residual(points))
            .collect::<Result<Vec<_>>>()?;
        Tensor::concat_last(&residuals)
    }

    /// Whether each point satisfies every constraint.
    ///
    /// # Errors
    ///
    /// See [`BoxSpace::constraints_residuals`].
    pub fn is_feasible(&self, points: &Tensor) -> Result<ArrayD<bool>> {
        Ok(all_non_negative(&self.constraints_residuals(points)?))
    }

    /// Uniform pseudo-random points, rejection-filtered through the constraints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSampleSize`] for negative counts and
    /// [`Error::FeasibleSamplingExhausted`] if the rejection budget runs out.
    pub fn sample_feasible(&self, num_samples: i64, seed: Option<u64>) -> Result<Tensor> {
        let num_samples = rng_util::sample_count(num_samples)?;
        let mut rng = rng_util::rng_from_seed(seed);
        let mut uniform = UniformSequence::new(self.dimension(), &mut rng);
        self.sample_sequence_feasible(&mut uniform, num_samples)
    }

    /// Scrambled Sobol points starting at index `skip`.
    ///
    /// Requires the `sobol` feature.
    ///
    /// Equal `skip` values give equal points. Without a `skip`, a random
    /// offset is drawn so that successive calls differ.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSampleSize`] for negative counts and
    /// [`Error::DimensionTooLarge`] above the Sobol dimension limit.
    #[cfg(feature = "sobol")]
    pub fn sample_sobol(&self, num_samples: i64, skip: Option<u32>) -> Result<Tensor> {
        let num_samples = rng_util::sample_count(num_samples)?;
        let mut sequence = self.sobol(skip, num_samples)?;
        self.draw(&mut sequence, num_samples)
    }

    /// Sobol points, rejection-filtered through the constraints.
    ///
    /// # Errors
    ///
    /// As [`BoxSpace::sample_sobol`], plus
    /// [`Error::FeasibleSamplingExhausted`] if the rejection budget runs out.
    #[cfg(feature = "sobol")]
    pub fn sample_sobol_feasible(&self, num_samples: i64, skip: Option<u32>) -> Result<Tensor> {
        let num_samples = rng_util::sample_count(num_samples)?;
        let mut sequence = self.sobol(skip, num_samples)?;
        self.sample_sequence_feasible(&mut sequence, num_samples)
    }

    /// Randomly shifted Halton points; equal seeds give equal points.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSampleSize`] for negative counts and
    /// [`Error::DimensionTooLarge`] above the Halton dimension limit.
    pub fn sample_halton(&self, num_samples: i64, seed: Option<u64>) -> Result<Tensor> {
        let num_samples = rng_util::sample_count(num_samples)?;
        let mut sequence = HaltonSequence::new(self.dimension(), &mut rng_util::rng_from_seed(seed))?;
        self.draw(&mut sequence, num_samples)
    }

    /// Halton points, rejection-filtered through the constraints.
    ///
    /// # Errors
    ///
    /// As [`BoxSpace::sample_halton`], plus
    /// [`Error::FeasibleSamplingExhausted`] if the rejection budget runs out.
    pub fn sample_halton_feasible(&self, num_samples: i64, seed: Option<u64>) -> Result<Tensor> {
        let num_samples = rng_util::sample_count(num_samples)?;
        let mut sequence = HaltonSequence::new(self.dimension(), &mut rng_util::rng_from_seed(seed))?;
        self.sample_sequence_feasible(&mut sequence, num_samples)
    }

    /// The box whose bounds concatenate both operands' bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DTypeMismatch`] if the bound dtypes differ and
    /// [`Error::Unsupported`] if either box has constraints.
    pub fn product(&self, other: &Self) -> Result<Self> {
        if self.has_constraints() || other.has_constraints() {
            return Err(Error::Unsupported("product of boxes with constraints"));
        }
        ensure_same_dtype(self.dtype(), other.dtype())?;
        let lower = Tensor::concat_last(&[self.lower.clone(), other.lower.clone()])?;
        let upper = Tensor::concat_last(&[self.upper.clone(), other.upper.clone()])?;
        Ok(Self::new(lower, upper)?.with_rejection_config(self.rejection))
    }

    #[cfg(feature = "sobol")]
    fn sobol(&self, skip: Option<u32>, num_samples: usize) -> Result<SobolSequence> {
        match skip {
            Some(skip) => SobolSequence::new(self.dimension(), skip),
            None => {
                SobolSequence::with_random_skip(self.dimension(), num_samples, &mut fastrand::Rng::new())
            }
        }
    }

    /// Scale the next `num_samples` unit-cube points into the box.
    fn draw<S: PointSequence>(&self, sequence: &mut S, num_samples: usize) -> Result<Tensor> {
        let unit = sequence.next_points(num_samples)?;
        let lower = self.lower.to_vec();
        let upper = self.upper.to_vec();
        let points = Array2::from_shape_fn(unit.dim(), |(i, j)| {
            lower[j] + unit[[i, j]] * (upper[j] - lower[j])
        });
        Ok(Tensor::new(points, self.dtype()))
    }

    fn sample_sequence_feasible<S: PointSequence>(
        &self,
        sequence: &mut S,
        num_samples: usize,
    ) -> Result<Tensor> {
        if !self.has_constraints() {
            return self.draw(sequence, num_samples);
        }
        rejection::sample_until_full(
            num_samples,
            &self.rejection,
            |batch| self.draw(sequence, batch),
            |candidates| self.is_feasible(candidates),
        )
    }
}

impl SearchSpace for BoxSpace {
    fn dimension(&self) -> usize {
        self.lower.len()
    }

    fn has_bounds(&self) -> bool {
        true
    }

    fn lower(&self) -> Result<Tensor> {
        Ok(self.lower.clone())
    }

    fn upper(&self) -> Result<Tensor> {
        Ok(self.upper.clone())
    }

    /// Bounds only; constraints are checked by [`BoxSpace::is_feasible`].
    fn contains(&self, points: &Tensor) -> Result<ArrayD<bool>> {
        let batch = split_trailing(points, self.dimension())?;
        let dtype = self.dtype();
        let lower = self.lower.to_vec();
        let upper = self.upper.to_vec();
        let flags = batch
            .rows
            .outer_iter()
            .map(|row| {
                row.iter().zip(lower.iter().zip(&upper)).all(|(&x, (&l, &u))| {
                    coerce_query(dtype, x).is_some_and(|x| l <= x && x <= u)
                })
            })
            .collect();
        batch.unflatten_flags(flags)
    }

    /// Uniform pseudo-random points; constraints are ignored.
    fn sample_with_rng(&self, num_samples: usize, rng: &mut fastrand::Rng) -> Result<Tensor> {
        let mut uniform = UniformSequence::new(self.dimension(), rng);
        self.draw(&mut uniform, num_samples)
    }

    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if the box has constraints.
    fn discretize(&self, num_samples: i64) -> Result<DiscreteSearchSpace> {
        if self.has_constraints() {
            return Err(Error::Unsupported("discretize a box with constraints"));
        }
        let points = self.sample(num_samples, None)?;
        trace_debug!(num_samples, dimension = self.dimension(), "discretized box");
        DiscreteSearchSpace::new(points)
    }
}

/// Boxes compare by bounds and constraints; the rejection budget is ignored.
impl PartialEq for BoxSpace {
    fn eq(&self, other: &Self) -> bool {
        self.lower == other.lower && self.upper == other.upper && self.constraints == other.constraints
    }
}
