//! Cartesian products of tagged sub-spaces.

use core::ops::Range;

use ndarray::{ArrayD, IxDyn};

use super::collection::{collect_tags, position, CollectionSearchSpace, TaggedSpaces};
use super::{DiscreteSearchSpace, SearchSpace, Space};
use crate::error::Result;
use crate::tensor::{split_trailing, DType, Tensor};

/// The Cartesian product of named sub-spaces.
///
/// A point is the concatenation of one point from each sub-space, in tag
/// order. The product of no sub-spaces is a valid space of dimension 0.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use searchspace::prelude::*;
///
/// let decision = BoxSpace::new(vec![-1.0, -2.0], vec![2.0, 3.0]).unwrap();
/// let context = DiscreteSearchSpace::new(array![[-0.5, 0.5]]).unwrap();
/// let space = TaggedProductSearchSpace::with_tags(
///     vec![decision.into(), context.into()],
///     ["decision", "context"],
/// )
/// .unwrap();
///
/// assert_eq!(space.dimension(), 4);
/// let point = Tensor::from_vec(vec![0.0, 0.0, -0.5, 0.5]);
/// assert!(space.contains_point(&point).unwrap());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TaggedProductSearchSpace {
    inner: TaggedSpaces,
}

impl TaggedProductSearchSpace {
    /// Creates a product with default tags `"0"`, `"1"`, ...
    ///
    /// # Errors
    ///
    /// Never fails for default tags; the signature matches
    /// [`TaggedProductSearchSpace::with_tags`].
    pub fn new(spaces: Vec<Space>) -> Result<Self> {
        Ok(Self {
            inner: TaggedSpaces::new(spaces, None)?,
        })
    }

    /// Creates a product with explicit tags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TagCountMismatch`](crate::Error::TagCountMismatch) or
    /// [`Error::DuplicateTags`](crate::Error::DuplicateTags).
    pub fn with_tags<I, S>(spaces: Vec<Space>, tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            inner: TaggedSpaces::new(spaces, Some(collect_tags(tags)))?,
        })
    }

    /// Columns owned by `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSubspace`](crate::Error::UnknownSubspace).
    pub fn subspace_range(&self, tag: &str) -> Result<Range<usize>> {
        let index = position(&self.inner.tags, tag)?;
        let start: usize = self.inner.dimensions()[..index].iter().sum();
        Ok(start..start + self.inner.spaces[index].dimension())
    }

    /// The columns of `points` that belong to `tag`.
    ///
    /// # Errors
    ///
    /// Returns a shape error if the trailing axis of `points` is not the
    /// product dimension, or [`Error::UnknownSubspace`](crate::Error::UnknownSubspace).
    pub fn get_subspace_component(&self, tag: &str, points: &Tensor) -> Result<Tensor> {
        split_trailing(points, self.dimension())?;
        let range = self.subspace_range(tag)?;
        points.slice_last(range.start, range.end)
    }

    /// A copy where the sub-space `tag` is replaced by the fixed `points`.
    ///
    /// The points are not checked against the replaced sub-space, so the
    /// resulting product takes its dimension from them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSubspace`](crate::Error::UnknownSubspace) or
    /// a rank error if `points` is not rank 2.
    pub fn fix_subspace(&self, tag: &str, points: impl Into<Tensor>) -> Result<Self> {
        let index = position(&self.inner.tags, tag)?;
        let fixed = DiscreteSearchSpace::new(points)?;
        trace_debug!(tag, points = fixed.len(), "fixed sub-space");
        let mut inner = self.inner.clone();
        inner.spaces[index] = Space::Discrete(fixed);
        Ok(Self { inner })
    }

    /// The two-element product `{"0": self, "1": other}`; nesting is kept.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the other space products.
    pub fn product(&self, other: &Self) -> Result<Self> {
        Self::new(vec![Space::Product(self.clone()), Space::Product(other.clone())])
    }

    fn concat_bounds(&self, bounds: impl Fn(&Space) -> Result<Tensor>) -> Result<Tensor> {
        let parts = self.inner.spaces.iter().map(bounds).collect::<Result<Vec<_>>>()?;
        if parts.is_empty() {
            return Ok(Tensor::zeros(&[0], DType::Float64));
        }
        Tensor::concat_last(&parts)
    }
}

impl CollectionSearchSpace for TaggedProductSearchSpace {
    fn subspace_tags(&self) -> &[String] {
        &self.inner.tags
    }

    fn subspaces(&self) -> &[Space] {
        &self.inner.spaces
    }
}

impl SearchSpace for TaggedProductSearchSpace {
    fn dimension(&self) -> usize {
        self.inner.dimensions().iter().sum()
    }

    fn has_bounds(&self) -> bool {
        self.inner.has_bounds()
    }

    fn lower(&self) -> Result<Tensor> {
        self.concat_bounds(SearchSpace::lower)
    }

    fn upper(&self) -> Result<Tensor> {
        self.concat_bounds(SearchSpace::upper)
    }

    /// A point is a member when every sub-space contains its slice.
    fn contains(&self, points: &Tensor) -> Result<ArrayD<bool>> {
        let batch = split_trailing(points, self.dimension())?;
        let mut inside = ArrayD::from_elem(IxDyn(&batch.leading), true);
        let mut start = 0;
        for space in &self.inner.spaces {
            let end = start + space.dimension();
            let flags = space.contains(&points.slice_last(start, end)?)?;
            inside.zip_mut_with(&flags, |all, &member| *all &= member);
            start = end;
        }
        Ok(inside)
    }

    /// Every sub-space is sampled from its own stream; columns are
    /// concatenated in tag order.
    fn sample_with_rng(&self, num_samples: usize, rng: &mut fastrand::Rng) -> Result<Tensor> {
        let parts = self.inner.sample_each(num_samples, rng)?;
        if parts.is_empty() {
            return Ok(Tensor::zeros(&[num_samples, 0], DType::Float64));
        }
        Tensor::concat_last(&parts)
    }
}
