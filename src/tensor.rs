//! Dtype-tagged N-dimensional arrays backing every space.
//!
//! A [`Tensor`] wraps an [`ndarray::ArrayD<f64>`] together with a [`DType`]
//! tag. Values are always stored as `f64` but are rounded to what the tag
//! can represent on construction, so a `Float32` tensor only ever holds
//! `f32`-representable values and an `Int32` tensor only holds integers.
//!
//! Containment checks, constraint residuals and encoders all accept
//! batches with arbitrary leading axes. They go through
//! [`split_trailing`] which checks the trailing axis against the space
//! dimension and flattens the leading axes into rows.

use core::fmt;

use ndarray::{Array, Array1, Array2, ArrayD, Axis, Dimension, IxDyn, Slice};

use crate::error::{Error, Result};

/// Element type tag of a [`Tensor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DType {
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// Single precision float.
    Float32,
    /// Double precision float.
    Float64,
}

impl DType {
    /// Returns `true` for the floating point types.
    #[must_use]
    pub fn is_floating(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Rounds `value` to the nearest value representable in this dtype.
    ///
    /// Integer types truncate toward zero and saturate at their range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn cast_value(self, value: f64) -> f64 {
        match self {
            Self::Float64 => value,
            Self::Float32 => f64::from(value as f32),
            Self::Int32 => f64::from(value as i32),
            Self::Int64 => (value as i64) as f64,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        };
        f.write_str(name)
    }
}

/// Fail with [`Error::DTypeMismatch`] unless both dtypes agree.
pub(crate) fn ensure_same_dtype(left: DType, right: DType) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(Error::DTypeMismatch { left, right })
    }
}

/// A dtype-tagged N-dimensional array.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tensor {
    values: ArrayD<f64>,
    dtype: DType,
}

impl Tensor {
    /// Creates a tensor, rounding `values` to `dtype`.
    #[must_use]
    pub fn new<D: Dimension>(values: Array<f64, D>, dtype: DType) -> Self {
        let values = values.into_dyn();
        let values = if dtype == DType::Float64 {
            values
        } else {
            values.mapv_into(|v| dtype.cast_value(v))
        };
        Self { values, dtype }
    }

    /// Creates a rank-1 `Float64` tensor.
    #[must_use]
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self::new(Array1::from_vec(values), DType::Float64)
    }

    /// Creates a rank-2 `Float64` tensor from equally sized rows.
    ///
    /// An empty slice produces shape `[0, 0]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RaggedRows`] if the rows differ in length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * width);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(Error::RaggedRows {
                    row: index,
                    expected: width,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        let values = Array2::from_shape_vec((rows.len(), width), data)?;
        Ok(Self::new(values, DType::Float64))
    }

    /// Creates a tensor of zeros.
    #[must_use]
    pub fn zeros(shape: &[usize], dtype: DType) -> Self {
        Self {
            values: ArrayD::zeros(IxDyn(shape)),
            dtype,
        }
    }

    /// Creates an empty batch of shape `[0, dimension]`.
    #[must_use]
    pub fn empty(dimension: usize, dtype: DType) -> Self {
        Self::zeros(&[0, dimension], dtype)
    }

    /// The shape of the tensor.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    /// The number of axes.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.values.ndim()
    }

    /// The element type tag.
    #[must_use]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Length of the leading axis (0 for a scalar).
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.shape().first().copied().unwrap_or(0)
    }

    /// Returns `true` if the leading axis is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the underlying values.
    #[must_use]
    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    /// Consume the tensor, returning the underlying values.
    #[must_use]
    pub fn into_values(self) -> ArrayD<f64> {
        self.values
    }

    /// All values in row-major order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// Returns a copy converted to `dtype`.
    #[must_use]
    pub fn cast(&self, dtype: DType) -> Self {
        Self::new(self.values.clone(), dtype)
    }

    /// Iterate over sub-tensors along the leading axis.
    pub fn iter_rows(&self) -> impl Iterator<Item = Tensor> + '_ {
        (0..self.len()).map(move |index| Self {
            values: self.values.index_axis(Axis(0), index).to_owned(),
            dtype: self.dtype,
        })
    }

    /// Columns `start..end` of the trailing axis.
    ///
    /// # Errors
    ///
    /// Returns an error for scalars or when the range exceeds the trailing axis.
    pub fn slice_last(&self, start: usize, end: usize) -> Result<Self> {
        let Some(&width) = self.shape().last() else {
            return Err(Error::InvalidRank {
                expected: 1,
                shape: Vec::new(),
            });
        };
        if start > end || end > width {
            return Err(Error::ShapeMismatch {
                expected: end,
                shape: self.shape().to_vec(),
            });
        }
        let axis = Axis(self.ndim() - 1);
        Ok(Self {
            values: self
                .values
                .slice_axis(axis, Slice::from(start..end))
                .to_owned(),
            dtype: self.dtype,
        })
    }

    /// Concatenate tensors along their trailing axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DTypeMismatch`] if the parts differ in dtype, or a
    /// shape error if their leading axes differ.
    pub fn concat_last(parts: &[Self]) -> Result<Self> {
        let first = parts
            .first()
            .ok_or(Error::Internal("concatenating zero tensors"))?;
        if first.ndim() == 0 {
            return Err(Error::InvalidRank {
                expected: 1,
                shape: Vec::new(),
            });
        }
        for part in &parts[1..] {
            ensure_same_dtype(first.dtype, part.dtype)?;
            if part.ndim() != first.ndim()
                || part.shape()[..part.ndim() - 1] != first.shape()[..first.ndim() - 1]
            {
                return Err(Error::ShapeMismatch {
                    expected: first.ndim(),
                    shape: part.shape().to_vec(),
                });
            }
        }
        let views: Vec<_> = parts.iter().map(|part| part.values.view()).collect();
        let values = ndarray::concatenate(Axis(first.ndim() - 1), &views)?;
        Ok(Self {
            values,
            dtype: first.dtype,
        })
    }

    /// Stack equally shaped tensors along a new axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DTypeMismatch`] if the parts differ in dtype, or a
    /// shape error if their shapes differ.
    pub fn stack(axis: usize, parts: &[Self]) -> Result<Self> {
        let first = parts
            .first()
            .ok_or(Error::Internal("stacking zero tensors"))?;
        for part in &parts[1..] {
            ensure_same_dtype(first.dtype, part.dtype)?;
            if part.shape() != first.shape() {
                return Err(Error::BoundsShapeMismatch {
                    lower: first.shape().to_vec(),
                    upper: part.shape().to_vec(),
                });
            }
        }
        if axis > first.ndim() {
            return Err(Error::InvalidRank {
                expected: axis,
                shape: first.shape().to_vec(),
            });
        }
        let views: Vec<_> = parts.iter().map(|part| part.values.view()).collect();
        let values = ndarray::stack(Axis(axis), &views)?;
        Ok(Self {
            values,
            dtype: first.dtype,
        })
    }

    /// The sub-tensor at `index` along `axis`, with that axis removed.
    pub(crate) fn index_axis(&self, axis: usize, index: usize) -> Self {
        Self {
            values: self.values.index_axis(Axis(axis), index).to_owned(),
            dtype: self.dtype,
        }
    }

    /// Reinterpret the values with a new shape of the same size.
    pub(crate) fn reshape(&self, shape: &[usize]) -> Result<Self> {
        let values = ArrayD::from_shape_vec(IxDyn(shape), self.to_vec())?;
        Ok(Self {
            values,
            dtype: self.dtype,
        })
    }
}

impl<D: Dimension> From<Array<f64, D>> for Tensor {
    fn from(values: Array<f64, D>) -> Self {
        Self::new(values, DType::Float64)
    }
}

impl From<Vec<f64>> for Tensor {
    fn from(values: Vec<f64>) -> Self {
        Self::from_vec(values)
    }
}

/// A batch flattened to rows, remembering its leading shape.
pub(crate) struct Rows {
    pub(crate) leading: Vec<usize>,
    pub(crate) rows: Array2<f64>,
}

impl Rows {
    /// Restore one boolean per row to the leading shape.
    pub(crate) fn unflatten_flags(&self, flags: Vec<bool>) -> Result<ArrayD<bool>> {
        Ok(ArrayD::from_shape_vec(IxDyn(&self.leading), flags)?)
    }

    /// Restore `width` values per row to shape `[..leading, width]`.
    pub(crate) fn unflatten_values(&self, width: usize, values: Vec<f64>, dtype: DType) -> Result<Tensor> {
        let mut shape = self.leading.clone();
        shape.push(width);
        let values = ArrayD::from_shape_vec(IxDyn(&shape), values)?;
        Ok(Tensor::new(values, dtype))
    }
}

/// Align `points` against a space of `dimension` coordinates.
///
/// The trailing axis must have length `dimension`; all leading axes are
/// flattened into rows.
pub(crate) fn split_trailing(points: &Tensor, dimension: usize) -> Result<Rows> {
    let shape = points.shape();
    let Some((&width, leading)) = shape.split_last() else {
        return Err(Error::ShapeMismatch {
            expected: dimension,
            shape: Vec::new(),
        });
    };
    if width != dimension {
        return Err(Error::ShapeMismatch {
            expected: dimension,
            shape: shape.to_vec(),
        });
    }
    let count = leading.iter().product();
    let rows = Array2::from_shape_vec((count, dimension), points.to_vec())?;
    Ok(Rows {
        leading: leading.to_vec(),
        rows,
    })
}
