//! Point encoders for downstream numeric code.
//!
//! An [`EncoderFunction`] maps a batch of points in a space's native
//! coordinates to another representation. [`one_hot_encoder`] expands
//! category codes into indicator columns; [`cast_encoder`] wraps an
//! encoder with dtype conversions on either side.

use std::sync::Arc;

use crate::error::Result;
use crate::space::{category_index, CollectionSearchSpace, SearchSpace, Space};
use crate::tensor::{split_trailing, DType, Tensor};

/// A shareable point transform.
pub type EncoderFunction = Arc<dyn Fn(&Tensor) -> Result<Tensor> + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Segment {
    /// Columns copied unchanged.
    Passthrough(usize),
    /// One categorical column with this many categories.
    Categorical(usize),
}

impl Segment {
    fn input_width(self) -> usize {
        match self {
            Self::Passthrough(width) => width,
            Self::Categorical(_) => 1,
        }
    }

    /// Binary columns stay a single 0/1 column.
    fn output_width(self) -> usize {
        match self {
            Self::Passthrough(width) => width,
            Self::Categorical(2) => 1,
            Self::Categorical(categories) => categories,
        }
    }
}

fn collect_segments(space: &Space, segments: &mut Vec<Segment>) {
    match space {
        Space::Categorical(categorical) => segments.extend(
            categorical
                .num_categories()
                .into_iter()
                .map(Segment::Categorical),
        ),
        Space::Product(product) => {
            for subspace in product.subspaces() {
                collect_segments(subspace, segments);
            }
        }
        other => segments.push(Segment::Passthrough(other.dimension())),
    }
}

/// Build a one-hot encoder for `space`.
///
/// Every categorical column with `k` categories becomes `k` indicator
/// columns, except binary columns which stay a single 0/1 column.
/// Categorical spaces nested in products are encoded in place; all other
/// columns pass through. The encoder keeps the input dtype.
///
/// The returned function fails if the trailing axis of its input is not
/// the space dimension, or if a code is not a valid category index.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use searchspace::prelude::*;
///
/// let space: Space = CategoricalSearchSpace::new(vec!["R", "G", "B"]).unwrap().into();
/// let encode = one_hot_encoder(&space);
/// let encoded = encode(&Tensor::from(array![[0.0], [2.0], [1.0]])).unwrap();
/// assert_eq!(
///     encoded,
///     Tensor::from(array![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]])
/// );
/// ```
#[must_use]
pub fn one_hot_encoder(space: &Space) -> EncoderFunction {
    let mut segments = Vec::new();
    collect_segments(space, &mut segments);
    let input_width = segments.iter().map(|s| s.input_width()).sum();
    let output_width = segments.iter().map(|s| s.output_width()).sum();

    Arc::new(move |points: &Tensor| {
        let batch = split_trailing(points, input_width)?;
        let mut out = Vec::with_capacity(batch.rows.nrows() * output_width);
        for row in batch.rows.outer_iter() {
            let mut column = 0;
            for &segment in &segments {
                match segment {
                    Segment::Passthrough(width) => {
                        out.extend(row.iter().skip(column).take(width).copied());
                    }
                    Segment::Categorical(2) => {
                        out.push(code_value(row[column], 2)?);
                    }
                    Segment::Categorical(categories) => {
                        let hot = category_index(row[column], categories)?;
                        out.extend((0..categories).map(|i| if i == hot { 1.0 } else { 0.0 }));
                    }
                }
                column += segment.input_width();
            }
        }
        batch.unflatten_values(output_width, out, points.dtype())
    })
}

#[allow(clippy::cast_precision_loss)]
fn code_value(code: f64, categories: usize) -> Result<f64> {
    Ok(category_index(code, categories)? as f64)
}

/// Wrap `encoder` with dtype casts.
///
/// The input is cast to `input_dtype` before the call (kept as is when
/// `None`), and the result to `output_dtype` (kept as is when `None`).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use searchspace::encoder::{cast_encoder, EncoderFunction};
/// use searchspace::{DType, Tensor};
///
/// let identity: EncoderFunction = Arc::new(|x: &Tensor| Ok(x.clone()));
/// let encode = cast_encoder(identity, None, Some(DType::Float32));
/// let out = encode(&Tensor::from_vec(vec![1.0, 2.0])).unwrap();
/// assert_eq!(out.dtype(), DType::Float32);
/// ```
#[must_use]
pub fn cast_encoder(
    encoder: EncoderFunction,
    input_dtype: Option<DType>,
    output_dtype: Option<DType>,
) -> EncoderFunction {
    Arc::new(move |points: &Tensor| {
        let cast;
        let input = match input_dtype {
            Some(dtype) => {
                cast = points.cast(dtype);
                &cast
            }
            None => points,
        };
        let encoded = encoder(input)?;
        Ok(match output_dtype {
            Some(dtype) => encoded.cast(dtype),
            None => encoded,
        })
    })
}
