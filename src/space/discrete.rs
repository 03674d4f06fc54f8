//! Finite, explicitly enumerated point sets.

use core::cmp::Ordering;

use ndarray::{Array2, ArrayD, Axis};

use super::SearchSpace;
use crate::error::{Error, Result};
use crate::tensor::{ensure_same_dtype, split_trailing, DType, Tensor};

/// A search space made of an explicit `[n, dimension]` array of points.
///
/// Equality treats the points as an unordered multiset of rows.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use searchspace::prelude::*;
///
/// let space = DiscreteSearchSpace::new(array![[0.0, 1.0], [2.0, 3.0]]).unwrap();
/// assert_eq!(space.dimension(), 2);
/// assert!(space.contains_point(&Tensor::from_vec(vec![2.0, 3.0])).unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct DiscreteSearchSpace {
    points: Tensor,
}

impl DiscreteSearchSpace {
    /// Creates a discrete space from a rank-2 array of points.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRank`] unless `points` has exactly two axes.
    pub fn new(points: impl Into<Tensor>) -> Result<Self> {
        let points = points.into();
        if points.ndim() != 2 {
            return Err(Error::InvalidRank {
                expected: 2,
                shape: points.shape().to_vec(),
            });
        }
        Ok(Self { points })
    }

    /// Creates a `Float64` discrete space from a list of rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RaggedRows`] if the rows differ in length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        Self::new(Tensor::from_rows(rows)?)
    }

    /// The stored points, shape `[n, dimension]`.
    #[must_use]
    pub fn points(&self) -> &Tensor {
        &self.points
    }

    /// Number of stored points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the space holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Element type of the stored points.
    #[must_use]
    pub fn dtype(&self) -> DType {
        self.points.dtype()
    }

    /// The Cartesian product of two point sets.
    ///
    /// Rows are every pairing `[left_i, right_j]` in row-major order, with
    /// the left operand varying slowest. A set with no rows yields no rows;
    /// a single row of zero columns is the identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DTypeMismatch`] if the operands differ in dtype.
    pub fn product(&self, other: &Self) -> Result<Self> {
        ensure_same_dtype(self.dtype(), other.dtype())?;
        let (left, right) = (self.points.values(), other.points.values());
        let (n_left, n_right) = (self.len(), other.len());
        let width = self.dimension() + other.dimension();

        let mut data = Vec::with_capacity(n_left * n_right * width);
        for a in left.outer_iter() {
            for b in right.outer_iter() {
                data.extend(a.iter().chain(b.iter()).copied());
            }
        }
        let points = Array2::from_shape_vec((n_left * n_right, width), data)?;
        Self::new(Tensor::new(points, self.dtype()))
    }

    fn column_bound(&self, fold: fn(f64, f64) -> f64, init: f64) -> Tensor {
        let bound = self
            .points
            .values()
            .fold_axis(Axis(0), init, |&acc, &v| fold(acc, v));
        Tensor::new(bound, self.dtype())
    }

    fn sorted_rows(&self) -> Vec<Vec<f64>> {
        let mut rows: Vec<Vec<f64>> = self
            .points
            .values()
            .outer_iter()
            .map(|r| r.iter().copied().collect())
            .collect();
        rows.sort_by(|a, b| {
            a.iter()
                .zip(b)
                .map(|(x, y)| x.total_cmp(y))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        rows
    }
}

/// Map a query coordinate into `dtype`, or `None` if it cannot be a member.
///
/// Floating queries are rounded to the space precision; integer spaces
/// only match integral values.
#[allow(clippy::float_cmp)]
pub(crate) fn coerce_query(dtype: DType, value: f64) -> Option<f64> {
    let cast = dtype.cast_value(value);
    (dtype.is_floating() || cast == value).then_some(cast)
}

impl SearchSpace for DiscreteSearchSpace {
    fn dimension(&self) -> usize {
        self.points.shape()[1]
    }

    fn has_bounds(&self) -> bool {
        true
    }

    /// Column-wise minimum (`+inf` columns when the space is empty).
    fn lower(&self) -> Result<Tensor> {
        Ok(self.column_bound(f64::min, f64::INFINITY))
    }

    /// Column-wise maximum (`-inf` columns when the space is empty).
    fn upper(&self) -> Result<Tensor> {
        Ok(self.column_bound(f64::max, f64::NEG_INFINITY))
    }

    #[allow(clippy::float_cmp)]
    fn contains(&self, points: &Tensor) -> Result<ArrayD<bool>> {
        let batch = split_trailing(points, self.dimension())?;
        let dtype = self.dtype();
        let stored = self.points.values();
        let flags = batch
            .rows
            .outer_iter()
            .map(|query| {
                let Some(query) = query
                    .iter()
                    .map(|&v| coerce_query(dtype, v))
                    .collect::<Option<Vec<f64>>>()
                else {
                    return false;
                };
                stored
                    .outer_iter()
                    .any(|row| row.iter().zip(&query).all(|(a, b)| a == b))
            })
            .collect();
        batch.unflatten_flags(flags)
    }

    fn sample_with_rng(&self, num_samples: usize, rng: &mut fastrand::Rng) -> Result<Tensor> {
        if self.is_empty() && num_samples > 0 {
            return Err(Error::EmptySpace(num_samples));
        }
        let indices: Vec<usize> = (0..num_samples).map(|_| rng.usize(..self.len())).collect();
        let rows = self.points.values().select(Axis(0), &indices);
        Ok(Tensor::new(rows, self.dtype()))
    }
}

impl PartialEq for DiscreteSearchSpace {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        self.dtype() == other.dtype()
            && self.points.shape() == other.points.shape()
            && self.sorted_rows() == other.sorted_rows()
    }
}
