//! Stacks of equally sized tagged sub-spaces.

use ndarray::{ArrayD, IxDyn};

use super::collection::{collect_tags, CollectionSearchSpace, TaggedSpaces};
use super::{DiscreteSearchSpace, SearchSpace, Space};
use crate::error::{Error, Result};
use crate::tensor::{split_trailing, Tensor};

/// A batch of same-dimension sub-spaces.
///
/// Points carry a sub-space axis: samples have shape
/// `[n, num_subspaces, dimension]`, and membership queries of shape
/// `[..., num_subspaces, dimension]` test row `i` against sub-space `i`.
///
/// # Examples
///
/// ```
/// use searchspace::prelude::*;
///
/// let space = TaggedMultiSearchSpace::new(vec![
///     BoxSpace::new(vec![-1.0, -2.0], vec![2.0, 3.0]).unwrap().into(),
///     BoxSpace::new(vec![-1.0, 1.0], vec![2.0, 2.0]).unwrap().into(),
/// ])
/// .unwrap();
///
/// assert_eq!(space.dimension(), 2);
/// assert_eq!(space.lower().unwrap().shape(), &[2, 2]);
/// assert_eq!(space.sample(5, Some(1)).unwrap().shape(), &[5, 2, 2]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TaggedMultiSearchSpace {
    inner: TaggedSpaces,
}

impl TaggedMultiSearchSpace {
    /// Creates a multi space with default tags `"0"`, `"1"`, ...
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCollection`] without sub-spaces and
    /// [`Error::MixedSubspaceDimensions`] if their dimensions differ.
    pub fn new(spaces: Vec<Space>) -> Result<Self> {
        Self::build(spaces, None)
    }

    /// Creates a multi space with explicit tags.
    ///
    /// # Errors
    ///
    /// As [`TaggedMultiSearchSpace::new`], plus the tag validation errors.
    pub fn with_tags<I, S>(spaces: Vec<Space>, tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(spaces, Some(collect_tags(tags)))
    }

    fn build(spaces: Vec<Space>, tags: Option<Vec<String>>) -> Result<Self> {
        if spaces.is_empty() {
            return Err(Error::EmptyCollection);
        }
        let inner = TaggedSpaces::new(spaces, tags)?;
        let dimensions = inner.dimensions();
        if dimensions.iter().any(|&d| d != dimensions[0]) {
            return Err(Error::MixedSubspaceDimensions(dimensions));
        }
        Ok(Self { inner })
    }

    /// Whether each point lies in at least one sub-space.
    ///
    /// Unlike [`SearchSpace::contains`], `points` has no sub-space axis:
    /// the trailing axis is the common dimension.
    ///
    /// # Errors
    ///
    /// Returns a shape error if the trailing axis is not the dimension.
    pub fn contains_any(&self, points: &Tensor) -> Result<ArrayD<bool>> {
        let batch = split_trailing(points, self.dimension())?;
        let mut inside = ArrayD::from_elem(IxDyn(&batch.leading), false);
        for space in &self.inner.spaces {
            let flags = space.contains(points)?;
            inside.zip_mut_with(&flags, |any, &member| *any |= member);
        }
        Ok(inside)
    }

    /// Concatenate both sub-space lists under fresh default tags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MixedSubspaceDimensions`] if the operands differ in dimension.
    pub fn product(&self, other: &Self) -> Result<Self> {
        let spaces = self.inner.spaces.iter().chain(&other.inner.spaces).cloned().collect();
        Self::new(spaces)
    }

    fn stack_bounds(&self, bounds: impl Fn(&Space) -> Result<Tensor>) -> Result<Tensor> {
        let parts = self.inner.spaces.iter().map(bounds).collect::<Result<Vec<_>>>()?;
        Tensor::stack(0, &parts)
    }
}

impl CollectionSearchSpace for TaggedMultiSearchSpace {
    fn subspace_tags(&self) -> &[String] {
        &self.inner.tags
    }

    fn subspaces(&self) -> &[Space] {
        &self.inner.spaces
    }
}

impl SearchSpace for TaggedMultiSearchSpace {
    fn dimension(&self) -> usize {
        self.inner.spaces[0].dimension()
    }

    fn has_bounds(&self) -> bool {
        self.inner.has_bounds()
    }

    /// Sub-space bounds stacked to shape `[num_subspaces, dimension]`.
    fn lower(&self) -> Result<Tensor> {
        self.stack_bounds(SearchSpace::lower)
    }

    /// Sub-space bounds stacked to shape `[num_subspaces, dimension]`.
    fn upper(&self) -> Result<Tensor> {
        self.stack_bounds(SearchSpace::upper)
    }

    fn contains(&self, points: &Tensor) -> Result<ArrayD<bool>> {
        let count = self.num_subspaces();
        let shape = points.shape();
        let axis = match shape {
            [.., rows, width] if *rows == count && *width == self.dimension() => shape.len() - 2,
            [.., width] if *width == self.dimension() => {
                return Err(Error::ShapeMismatch {
                    expected: count,
                    shape: shape.to_vec(),
                });
            }
            _ => {
                return Err(Error::ShapeMismatch {
                    expected: self.dimension(),
                    shape: shape.to_vec(),
                });
            }
        };
        let mut inside = ArrayD::from_elem(IxDyn(&shape[..axis]), true);
        for (index, space) in self.inner.spaces.iter().enumerate() {
            let flags = space.contains(&points.index_axis(axis, index))?;
            inside.zip_mut_with(&flags, |all, &member| *all &= member);
        }
        Ok(inside)
    }

    /// Every sub-space is sampled from its own stream; results are stacked
    /// along axis 1.
    fn sample_with_rng(&self, num_samples: usize, rng: &mut fastrand::Rng) -> Result<Tensor> {
        let parts = self.inner.sample_each(num_samples, rng)?;
        Tensor::stack(1, &parts)
    }

    /// Flattens `num_samples` stacked draws to `num_samples * num_subspaces` rows.
    fn discretize(&self, num_samples: i64) -> Result<DiscreteSearchSpace> {
        let samples = self.sample(num_samples, None)?;
        let rows = samples.len() * self.num_subspaces();
        trace_debug!(rows, "discretized multi search space");
        DiscreteSearchSpace::new(samples.reshape(&[rows, self.dimension()])?)
    }
}
