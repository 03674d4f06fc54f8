//! Grids of named categories.
//!
//! A [`CategoricalSearchSpace`] is described by one label list per
//! sub-dimension. Its points are the Cartesian grid of integer codes into
//! those lists, enumerated with the last sub-dimension varying fastest.

use ndarray::{Array2, ArrayD};

use super::{DiscreteSearchSpace, SearchSpace};
use crate::error::{Error, Result};
use crate::tensor::{ensure_same_dtype, split_trailing, DType, Tensor};

/// Categories of a single sub-dimension.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CategoryDim {
    /// `n` categories labelled `"0"`, `"1"`, ...
    Count(i64),
    /// Explicitly labelled categories.
    Labels(Vec<String>),
}

/// Description of a categorical space.
///
/// Descriptions are normalised once at construction into label lists.
/// `Counts(vec![])` and `PerDimension(vec![])` describe a space with no
/// sub-dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Categories {
    /// A single sub-dimension with `n` categories.
    Count(i64),
    /// One sub-dimension per count.
    Counts(Vec<i64>),
    /// A single sub-dimension with explicit labels.
    Labels(Vec<String>),
    /// One entry per sub-dimension; entries must all be counts or all labels.
    PerDimension(Vec<CategoryDim>),
}

impl Categories {
    fn resolve(self) -> Result<Vec<Vec<String>>> {
        match self {
            Self::Count(n) => Ok(vec![count_labels(n)?]),
            Self::Counts(counts) => counts.into_iter().map(count_labels).collect(),
            Self::Labels(labels) => Ok(vec![non_empty(labels, 0)?]),
            Self::PerDimension(dims) => {
                let counts = dims.iter().filter(|d| matches!(d, CategoryDim::Count(_))).count();
                if counts != 0 && counts != dims.len() {
                    return Err(Error::MixedCategoryKinds);
                }
                dims.into_iter()
                    .enumerate()
                    .map(|(i, dim)| match dim {
                        CategoryDim::Count(n) => count_labels(n),
                        CategoryDim::Labels(labels) => non_empty(labels, i),
                    })
                    .collect()
            }
        }
    }
}

fn count_labels(n: i64) -> Result<Vec<String>> {
    if n <= 0 {
        return Err(Error::InvalidCategoryCount(n));
    }
    Ok((0..n).map(|i| i.to_string()).collect())
}

fn non_empty(labels: Vec<String>, dimension: usize) -> Result<Vec<String>> {
    if labels.is_empty() {
        Err(Error::EmptyCategoryList { dimension })
    } else {
        Ok(labels)
    }
}

impl From<i32> for Categories {
    fn from(n: i32) -> Self {
        Self::Count(i64::from(n))
    }
}

impl From<i64> for Categories {
    fn from(n: i64) -> Self {
        Self::Count(n)
    }
}

impl From<Vec<i32>> for Categories {
    fn from(counts: Vec<i32>) -> Self {
        Self::Counts(counts.into_iter().map(i64::from).collect())
    }
}

impl From<Vec<i64>> for Categories {
    fn from(counts: Vec<i64>) -> Self {
        Self::Counts(counts)
    }
}

impl From<Vec<&str>> for Categories {
    fn from(labels: Vec<&str>) -> Self {
        Self::Labels(labels.into_iter().map(str::to_owned).collect())
    }
}

impl From<Vec<String>> for Categories {
    fn from(labels: Vec<String>) -> Self {
        Self::Labels(labels)
    }
}

impl From<Vec<Vec<&str>>> for Categories {
    fn from(dims: Vec<Vec<&str>>) -> Self {
        Self::PerDimension(
            dims.into_iter()
                .map(|labels| CategoryDim::Labels(labels.into_iter().map(str::to_owned).collect()))
                .collect(),
        )
    }
}

impl From<Vec<CategoryDim>> for Categories {
    fn from(dims: Vec<CategoryDim>) -> Self {
        Self::PerDimension(dims)
    }
}

/// A discrete space of category codes with their labels.
///
/// # Examples
///
/// ```
/// use searchspace::prelude::*;
///
/// let space = CategoricalSearchSpace::new(vec![3, 2]).unwrap();
/// assert_eq!(space.dimension(), 2);
/// assert_eq!(space.points().shape(), &[6, 2]);
/// assert!(!space.has_bounds());
/// ```
#[derive(Clone, Debug)]
pub struct CategoricalSearchSpace {
    tags: Vec<Vec<String>>,
    discrete: DiscreteSearchSpace,
}

impl CategoricalSearchSpace {
    /// Creates a `Float64` categorical space.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MixedCategoryKinds`] for mixed descriptions,
    /// [`Error::InvalidCategoryCount`] for non-positive counts and
    /// [`Error::EmptyCategoryList`] for empty label lists.
    pub fn new(categories: impl Into<Categories>) -> Result<Self> {
        Self::with_dtype(categories, DType::Float64)
    }

    /// Creates a categorical space whose codes have the given dtype.
    ///
    /// # Errors
    ///
    /// See [`CategoricalSearchSpace::new`].
    pub fn with_dtype(categories: impl Into<Categories>, dtype: DType) -> Result<Self> {
        Self::from_tags(categories.into().resolve()?, dtype)
    }

    fn from_tags(tags: Vec<Vec<String>>, dtype: DType) -> Result<Self> {
        let points = code_grid(&tags)?;
        Ok(Self {
            discrete: DiscreteSearchSpace::new(Tensor::new(points, dtype))?,
            tags,
        })
    }

    /// The label list of every sub-dimension.
    #[must_use]
    pub fn tags(&self) -> &[Vec<String>] {
        &self.tags
    }

    /// Number of categories in every sub-dimension.
    #[must_use]
    pub fn num_categories(&self) -> Vec<usize> {
        self.tags.iter().map(Vec::len).collect()
    }

    /// The code grid, shape `[prod(num_categories), dimension]`.
    #[must_use]
    pub fn points(&self) -> &Tensor {
        self.discrete.points()
    }

    /// Element type of the codes.
    #[must_use]
    pub fn dtype(&self) -> DType {
        self.discrete.dtype()
    }

    /// The underlying discrete point set.
    #[must_use]
    pub fn as_discrete(&self) -> &DiscreteSearchSpace {
        &self.discrete
    }

    /// Map codes back to labels, keeping the shape of `indices`.
    ///
    /// # Errors
    ///
    /// Returns a shape error if the trailing axis is not the dimension,
    /// [`Error::NonIntegerCode`] for fractional codes and
    /// [`Error::CodeOutOfRange`] for codes outside a sub-dimension.
    pub fn to_tags(&self, indices: &Tensor) -> Result<ArrayD<String>> {
        let batch = split_trailing(indices, self.dimension())?;
        let mut labels = Vec::with_capacity(batch.rows.len());
        for row in batch.rows.outer_iter() {
            for (&code, tags) in row.iter().zip(&self.tags) {
                let index = category_index(code, tags.len())?;
                labels.push(tags[index].clone());
            }
        }
        let mut shape = batch.leading.clone();
        shape.push(self.dimension());
        Ok(ArrayD::from_shape_vec(shape, labels)?)
    }

    /// Concatenate the sub-dimensions of two categorical spaces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DTypeMismatch`] if the code dtypes differ.
    pub fn product(&self, other: &Self) -> Result<Self> {
        ensure_same_dtype(self.dtype(), other.dtype())?;
        let tags = self.tags.iter().chain(&other.tags).cloned().collect();
        Self::from_tags(tags, self.dtype())
    }
}

/// Check that `code` is an integer in `[0, categories)` and return it.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub(crate) fn category_index(code: f64, categories: usize) -> Result<usize> {
    if code.fract() != 0.0 || !code.is_finite() {
        return Err(Error::NonIntegerCode(code));
    }
    if code < 0.0 || code >= categories as f64 {
        return Err(Error::CodeOutOfRange { code, categories });
    }
    Ok(code as usize)
}

#[allow(clippy::cast_precision_loss)]
fn code_grid(tags: &[Vec<String>]) -> Result<Array2<f64>> {
    if tags.is_empty() {
        return Ok(Array2::zeros((0, 0)));
    }
    let sizes: Vec<usize> = tags.iter().map(Vec::len).collect();
    let total: usize = sizes.iter().product();
    let width = sizes.len();
    let mut data = Vec::with_capacity(total * width);
    let mut code = vec![0usize; width];
    for _ in 0..total {
        data.extend(code.iter().map(|&c| c as f64));
        // Odometer increment, last sub-dimension fastest.
        for (digit, &size) in code.iter_mut().zip(&sizes).rev() {
            *digit += 1;
            if *digit < size {
                break;
            }
            *digit = 0;
        }
    }
    Ok(Array2::from_shape_vec((total, width), data)?)
}

impl SearchSpace for CategoricalSearchSpace {
    fn dimension(&self) -> usize {
        self.tags.len()
    }

    fn has_bounds(&self) -> bool {
        false
    }

    fn lower(&self) -> Result<Tensor> {
        Err(Error::Unbounded("categorical search space"))
    }

    fn upper(&self) -> Result<Tensor> {
        Err(Error::Unbounded("categorical search space"))
    }

    fn contains(&self, points: &Tensor) -> Result<ArrayD<bool>> {
        self.discrete.contains(points)
    }

    fn sample_with_rng(&self, num_samples: usize, rng: &mut fastrand::Rng) -> Result<Tensor> {
        self.discrete.sample_with_rng(num_samples, rng)
    }
}

/// Categorical spaces compare by their resolved labels.
impl PartialEq for CategoricalSearchSpace {
    fn eq(&self, other: &Self) -> bool {
        self.tags == other.tags
    }
}
