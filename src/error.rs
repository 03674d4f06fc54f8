use crate::tensor::DType;

/// Errors returned by search-space construction, queries and sampling.
///
/// Every failure is local and synchronous: the call that violates a
/// contract returns the error and nothing is partially applied.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when an array has the wrong rank.
    #[error("invalid rank: expected rank {expected} but got shape {shape:?}")]
    InvalidRank {
        /// The required rank.
        expected: usize,
        /// The shape that was supplied.
        shape: Vec<usize>,
    },

    /// Returned when the trailing axis of a query does not match the space dimension.
    #[error("shape mismatch: expected trailing axis of length {expected} but got shape {shape:?}")]
    ShapeMismatch {
        /// The expected trailing length (the space dimension).
        expected: usize,
        /// The shape that was supplied.
        shape: Vec<usize>,
    },

    /// Returned when lower and upper bounds have different shapes.
    #[error("bounds shape mismatch: lower has shape {lower:?}, upper has shape {upper:?}")]
    BoundsShapeMismatch {
        /// Shape of the lower bound.
        lower: Vec<usize>,
        /// Shape of the upper bound.
        upper: Vec<usize>,
    },

    /// Returned when rows of a nested vector have different lengths.
    #[error("ragged rows: row {row} has length {got}, expected {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        got: usize,
    },

    /// Returned when a constraint's shape does not fit its bounds or the box dimension.
    #[error("constraint shape mismatch: {0}")]
    ConstraintShape(String),

    /// Returned when a lower bound is greater than the upper bound.
    #[error("invalid bounds at index {index}: low ({low}) must be less than or equal to high ({high})")]
    InvalidBounds {
        /// Position of the offending coordinate.
        index: usize,
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when a negative number of samples is requested.
    #[error("invalid sample size: {0} must be non-negative")]
    InvalidSampleSize(i64),

    /// Returned when a categorical sub-dimension has a non-positive size.
    #[error("invalid category count: {0} must be positive")]
    InvalidCategoryCount(i64),

    /// Returned when an explicit categorical label list is empty.
    #[error("category list for dimension {dimension} cannot be empty")]
    EmptyCategoryList {
        /// The sub-dimension whose label list is empty.
        dimension: usize,
    },

    /// Returned when a categorical code is not an integer value.
    #[error("categorical code {0} is not an integer")]
    NonIntegerCode(f64),

    /// Returned when a categorical code is outside `[0, categories)`.
    #[error("categorical code {code} is out of range for {categories} categories")]
    CodeOutOfRange {
        /// The offending code.
        code: f64,
        /// Number of categories in that sub-dimension.
        categories: usize,
    },

    /// Returned when a power of a space is taken with a non-positive exponent.
    #[error("invalid exponent: {0} must be positive")]
    InvalidExponent(i64),

    /// Returned when a rejection-sampling configuration value is zero.
    #[error("invalid rejection config: {0} must be positive")]
    InvalidRejectionConfig(&'static str),

    /// Returned when a quasi-random sequence is asked for more dimensions than it supports.
    #[error("dimension {dimension} exceeds the {max} dimensions supported by the {sequence} sequence")]
    DimensionTooLarge {
        /// The requested dimension.
        dimension: usize,
        /// The supported maximum.
        max: usize,
        /// Name of the sequence.
        sequence: &'static str,
    },

    /// Returned when a sequence index would overflow.
    #[error("{0} sequence index overflow")]
    SequenceOverflow(&'static str),

    /// Returned when sampling a discrete space that has no points.
    #[error("cannot sample {0} points from an empty discrete space")]
    EmptySpace(usize),

    /// Returned when the rejection budget runs out before enough feasible points are found.
    #[error(
        "feasible sampling exhausted: accepted {accepted} of {requested} points after {rounds} rounds"
    )]
    FeasibleSamplingExhausted {
        /// Number of points requested.
        requested: usize,
        /// Number of feasible points found.
        accepted: usize,
        /// Number of rounds drawn.
        rounds: usize,
    },

    /// Returned when category descriptions mix counts and label lists.
    #[error("categories must be all counts or all label lists, not a mix")]
    MixedCategoryKinds,

    /// Returned when combining arrays or spaces of different dtypes.
    #[error("dtype mismatch: {left} and {right}")]
    DTypeMismatch {
        /// The dtype of the left operand.
        left: DType,
        /// The dtype of the right operand.
        right: DType,
    },

    /// Returned when box bounds are not floating point.
    #[error("box bounds must be floating point, got {0}")]
    NonFloatingBounds(DType),

    /// Returned when accessing bounds of a space that has none.
    #[error("{0} has no bounds")]
    Unbounded(&'static str),

    /// Returned when an operation is not supported for the given space.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Returned when a nonlinear constraint function returns more than one output column.
    #[error("nonlinear constraint must return a single output column, got shape {shape:?}")]
    MultiOutputConstraint {
        /// The shape returned by the constraint function.
        shape: Vec<usize>,
    },

    /// Returned when single-point membership is asked of a batch.
    #[error("membership of a batch of shape {shape:?} is ambiguous; use `contains`")]
    AmbiguousMembership {
        /// Shape of the membership result.
        shape: Vec<usize>,
    },

    /// Returned when a collection is built with a different number of tags and sub-spaces.
    #[error("Number of tags must match number of subspaces: {tags} tags, {spaces} subspaces")]
    TagCountMismatch {
        /// Number of tags.
        tags: usize,
        /// Number of sub-spaces.
        spaces: usize,
    },

    /// Returned when collection tags repeat.
    #[error("Subspace names must be unique: {0:?}")]
    DuplicateTags(Vec<String>),

    /// Returned when looking up a tag that is not in a collection.
    #[error("Attempted to access a subspace that does not exist: {0}")]
    UnknownSubspace(String),

    /// Returned when a multi space is built without sub-spaces.
    #[error("At least one subspace is required")]
    EmptyCollection,

    /// Returned when the sub-spaces of a multi space differ in dimension.
    #[error("All subspaces must have the same dimension, got {0:?}")]
    MixedSubspaceDimensions(Vec<usize>),

    /// Returned when an internal invariant is violated.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong rank, trailing dimension or bound shapes.
    Shape,
    /// Invalid values: counts, bounds, codes, sample sizes.
    Value,
    /// Mixed category kinds or incompatible dtypes.
    Type,
    /// The space cannot perform the operation.
    Capability,
    /// Tag lookups and collection validation.
    Lookup,
    /// Internal invariant violations.
    Internal,
}

impl Error {
    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRank { .. }
            | Self::ShapeMismatch { .. }
            | Self::BoundsShapeMismatch { .. }
            | Self::RaggedRows { .. }
            | Self::ConstraintShape(_) => ErrorKind::Shape,
            Self::InvalidBounds { .. }
            | Self::InvalidSampleSize(_)
            | Self::InvalidCategoryCount(_)
            | Self::EmptyCategoryList { .. }
            | Self::NonIntegerCode(_)
            | Self::CodeOutOfRange { .. }
            | Self::InvalidExponent(_)
            | Self::InvalidRejectionConfig(_)
            | Self::DimensionTooLarge { .. }
            | Self::SequenceOverflow(_)
            | Self::EmptySpace(_)
            | Self::FeasibleSamplingExhausted { .. } => ErrorKind::Value,
            Self::MixedCategoryKinds | Self::DTypeMismatch { .. } | Self::NonFloatingBounds(_) => {
                ErrorKind::Type
            }
            Self::Unbounded(_)
            | Self::Unsupported(_)
            | Self::MultiOutputConstraint { .. }
            | Self::AmbiguousMembership { .. } => ErrorKind::Capability,
            Self::TagCountMismatch { .. }
            | Self::DuplicateTags(_)
            | Self::UnknownSubspace(_)
            | Self::EmptyCollection
            | Self::MixedSubspaceDimensions(_) => ErrorKind::Lookup,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<ndarray::ShapeError> for Error {
    fn from(_: ndarray::ShapeError) -> Self {
        Error::Internal("array reshape failed")
    }
}

pub type Result<T> = core::result::Result<T, Error>;
