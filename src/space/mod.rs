//! Search spaces and their algebra.
//!
//! Every space implements [`SearchSpace`]. The closed [`Space`] enum holds
//! any of the concrete kinds and is what collections store and what the
//! `*` operator works on:
//!
//! | Left | Right | `left * right` |
//! |------|-------|----------------|
//! | [`BoxSpace`] | [`BoxSpace`] | box with concatenated bounds |
//! | [`DiscreteSearchSpace`] | [`DiscreteSearchSpace`] | Cartesian product of the rows |
//! | [`CategoricalSearchSpace`] | [`CategoricalSearchSpace`] | concatenated label lists |
//! | [`TaggedProductSearchSpace`] | [`TaggedProductSearchSpace`] | nested `{"0": left, "1": right}` |
//! | [`TaggedMultiSearchSpace`] | [`TaggedMultiSearchSpace`] | concatenated sub-space lists |
//! | any | different kind | two-element [`TaggedProductSearchSpace`] |

mod box_space;
mod categorical;
mod collection;
mod discrete;
mod multi;
mod product;

use core::fmt;
use core::ops::Mul;

use ndarray::ArrayD;

pub use box_space::BoxSpace;
pub use categorical::{Categories, CategoricalSearchSpace, CategoryDim};
pub(crate) use categorical::category_index;
pub use collection::CollectionSearchSpace;
pub use discrete::DiscreteSearchSpace;
pub use multi::TaggedMultiSearchSpace;
pub use product::TaggedProductSearchSpace;

use crate::error::{Error, Result};
use crate::rng_util;
use crate::tensor::Tensor;

/// Capabilities shared by every search space.
pub trait SearchSpace {
    /// Number of coordinates of a point.
    fn dimension(&self) -> usize;

    /// Whether [`lower`](SearchSpace::lower) and [`upper`](SearchSpace::upper) are available.
    fn has_bounds(&self) -> bool;

    /// The lower bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unbounded`] when [`has_bounds`](SearchSpace::has_bounds) is false.
    fn lower(&self) -> Result<Tensor>;

    /// The upper bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unbounded`] when [`has_bounds`](SearchSpace::has_bounds) is false.
    fn upper(&self) -> Result<Tensor>;

    /// Membership of every point in a batch.
    ///
    /// The trailing axis of `points` must equal the dimension; the result
    /// has the shape of the remaining leading axes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the trailing axis is wrong.
    fn contains(&self, points: &Tensor) -> Result<ArrayD<bool>>;

    /// Membership of a single point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousMembership`] if `point` is a batch, or any
    /// error of [`contains`](SearchSpace::contains).
    fn contains_point(&self, point: &Tensor) -> Result<bool> {
        let flags = self.contains(point)?;
        if flags.ndim() != 0 {
            return Err(Error::AmbiguousMembership {
                shape: flags.shape().to_vec(),
            });
        }
        flags
            .iter()
            .next()
            .copied()
            .ok_or(Error::Internal("scalar membership without a value"))
    }

    /// Draw `num_samples` points from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error when the space cannot be sampled.
    fn sample_with_rng(&self, num_samples: usize, rng: &mut fastrand::Rng) -> Result<Tensor>;

    /// Draw `num_samples` points; equal seeds give identical points, and
    /// `None` uses a fresh generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSampleSize`] if `num_samples` is negative.
    fn sample(&self, num_samples: i64, seed: Option<u64>) -> Result<Tensor> {
        let num_samples = rng_util::sample_count(num_samples)?;
        let mut rng = rng_util::rng_from_seed(seed);
        self.sample_with_rng(num_samples, &mut rng)
    }

    /// A discrete space of `num_samples` freshly drawn points.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSampleSize`] if `num_samples` is negative.
    fn discretize(&self, num_samples: i64) -> Result<DiscreteSearchSpace> {
        let points = self.sample(num_samples, None)?;
        trace_debug!(num_samples, dimension = self.dimension(), "discretized search space");
        DiscreteSearchSpace::new(points)
    }
}

/// The kind of a [`Space`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpaceKind {
    /// [`BoxSpace`].
    Box,
    /// [`DiscreteSearchSpace`].
    Discrete,
    /// [`CategoricalSearchSpace`].
    Categorical,
    /// [`TaggedProductSearchSpace`].
    Product,
    /// [`TaggedMultiSearchSpace`].
    Multi,
}

impl fmt::Display for SpaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Box => "Box",
            Self::Discrete => "DiscreteSearchSpace",
            Self::Categorical => "CategoricalSearchSpace",
            Self::Product => "TaggedProductSearchSpace",
            Self::Multi => "TaggedMultiSearchSpace",
        };
        f.write_str(name)
    }
}

/// Any search space.
///
/// Spaces of different kinds are never equal. Cloning copies all data;
/// nonlinear constraint functions are shared immutably.
#[derive(Clone, Debug, PartialEq)]
pub enum Space {
    /// A continuous box.
    Box(BoxSpace),
    /// An explicit point set.
    Discrete(DiscreteSearchSpace),
    /// A grid of categories.
    Categorical(CategoricalSearchSpace),
    /// A tagged Cartesian product.
    Product(TaggedProductSearchSpace),
    /// A tagged stack of equally sized spaces.
    Multi(TaggedMultiSearchSpace),
}

macro_rules! dispatch {
    ($space:expr, $inner:ident => $body:expr) => {
        match $space {
            Space::Box($inner) => $body,
            Space::Discrete($inner) => $body,
            Space::Categorical($inner) => $body,
            Space::Product($inner) => $body,
            Space::Multi($inner) => $body,
        }
    };
}

impl Space {
    /// The kind of this space.
    #[must_use]
    pub fn kind(&self) -> SpaceKind {
        match self {
            Self::Box(_) => SpaceKind::Box,
            Self::Discrete(_) => SpaceKind::Discrete,
            Self::Categorical(_) => SpaceKind::Categorical,
            Self::Product(_) => SpaceKind::Product,
            Self::Multi(_) => SpaceKind::Multi,
        }
    }

    /// The box, if this is one.
    #[must_use]
    pub fn as_box(&self) -> Option<&BoxSpace> {
        match self {
            Self::Box(space) => Some(space),
            _ => None,
        }
    }

    /// The discrete space, if this is one.
    #[must_use]
    pub fn as_discrete(&self) -> Option<&DiscreteSearchSpace> {
        match self {
            Self::Discrete(space) => Some(space),
            _ => None,
        }
    }

    /// The categorical space, if this is one.
    #[must_use]
    pub fn as_categorical(&self) -> Option<&CategoricalSearchSpace> {
        match self {
            Self::Categorical(space) => Some(space),
            _ => None,
        }
    }

    /// The product space, if this is one.
    #[must_use]
    pub fn as_product(&self) -> Option<&TaggedProductSearchSpace> {
        match self {
            Self::Product(space) => Some(space),
            _ => None,
        }
    }

    /// The multi space, if this is one.
    #[must_use]
    pub fn as_multi(&self) -> Option<&TaggedMultiSearchSpace> {
        match self {
            Self::Multi(space) => Some(space),
            _ => None,
        }
    }

    /// The Cartesian product of two spaces; see the module docs for how
    /// each pair of kinds combines.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DTypeMismatch`] for same-kind operands of different
    /// dtypes, and [`Error::Unsupported`] for constrained boxes.
    ///
    /// # Examples
    ///
    /// ```
    /// use searchspace::prelude::*;
    ///
    /// let a: Space = BoxSpace::new(vec![0.0], vec![1.0]).unwrap().into();
    /// let b: Space = CategoricalSearchSpace::new(vec!["R", "G", "B"]).unwrap().into();
    /// let product = (&a * &b).unwrap();
    /// assert_eq!(product.kind(), SpaceKind::Product);
    /// assert_eq!(product.dimension(), 2);
    /// ```
    pub fn product(&self, other: &Self) -> Result<Self> {
        Ok(match (self, other) {
            (Self::Box(a), Self::Box(b)) => Self::Box(a.product(b)?),
            (Self::Discrete(a), Self::Discrete(b)) => Self::Discrete(a.product(b)?),
            (Self::Categorical(a), Self::Categorical(b)) => Self::Categorical(a.product(b)?),
            (Self::Product(a), Self::Product(b)) => Self::Product(a.product(b)?),
            (Self::Multi(a), Self::Multi(b)) => Self::Multi(a.product(b)?),
            _ => Self::Product(TaggedProductSearchSpace::new(vec![self.clone(), other.clone()])?),
        })
    }

    /// The `exponent`-fold product of this space with itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExponent`] if `exponent` is not positive, or
    /// any error of [`Space::product`].
    pub fn power(&self, exponent: i64) -> Result<Self> {
        if exponent <= 0 {
            return Err(Error::InvalidExponent(exponent));
        }
        let mut result = self.clone();
        for _ in 1..exponent {
            result = result.product(self)?;
        }
        Ok(result)
    }
}

impl SearchSpace for Space {
    fn dimension(&self) -> usize {
        dispatch!(self, space => space.dimension())
    }

    fn has_bounds(&self) -> bool {
        dispatch!(self, space => space.has_bounds())
    }

    fn lower(&self) -> Result<Tensor> {
        dispatch!(self, space => space.lower())
    }

    fn upper(&self) -> Result<Tensor> {
        dispatch!(self, space => space.upper())
    }

    fn contains(&self, points: &Tensor) -> Result<ArrayD<bool>> {
        dispatch!(self, space => space.contains(points))
    }

    fn contains_point(&self, point: &Tensor) -> Result<bool> {
        dispatch!(self, space => space.contains_point(point))
    }

    fn sample_with_rng(&self, num_samples: usize, rng: &mut fastrand::Rng) -> Result<Tensor> {
        dispatch!(self, space => space.sample_with_rng(num_samples, rng))
    }

    fn discretize(&self, num_samples: i64) -> Result<DiscreteSearchSpace> {
        dispatch!(self, space => space.discretize(num_samples))
    }
}

impl Mul for Space {
    type Output = Result<Space>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.product(&rhs)
    }
}

impl Mul for &Space {
    type Output = Result<Space>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.product(rhs)
    }
}

impl From<BoxSpace> for Space {
    fn from(space: BoxSpace) -> Self {
        Self::Box(space)
    }
}

impl From<DiscreteSearchSpace> for Space {
    fn from(space: DiscreteSearchSpace) -> Self {
        Self::Discrete(space)
    }
}

impl From<CategoricalSearchSpace> for Space {
    fn from(space: CategoricalSearchSpace) -> Self {
        Self::Categorical(space)
    }
}

impl From<TaggedProductSearchSpace> for Space {
    fn from(space: TaggedProductSearchSpace) -> Self {
        Self::Product(space)
    }
}

impl From<TaggedMultiSearchSpace> for Space {
    fn from(space: TaggedMultiSearchSpace) -> Self {
        Self::Multi(space)
    }
}
