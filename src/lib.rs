#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Search-space algebra for black-box optimization: boxes, finite point
//! sets and categorical grids that compose into tagged products and
//! stacks, with linear and nonlinear constraints and uniform, Sobol and
//! Halton sampling (plus rejection sampling of feasible points).
//!
//! # Getting Started
//!
//! ```
//! use searchspace::prelude::*;
//!
//! let space = BoxSpace::new(vec![-1.0, -2.0], vec![2.0, 3.0]).unwrap();
//! let samples = space.sample_halton(16, Some(0)).unwrap();
//!
//! assert_eq!(samples.shape(), &[16, 2]);
//! assert!(space.contains(&samples).unwrap().iter().all(|&inside| inside));
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`SearchSpace`](space::SearchSpace) | Dimension, bounds, membership, sampling and discretization shared by every space. |
//! | [`BoxSpace`](space::BoxSpace) | A hyper-rectangle, optionally with [`Constraint`](constraint::Constraint)s. |
//! | [`DiscreteSearchSpace`](space::DiscreteSearchSpace) | A finite set of points. |
//! | [`CategoricalSearchSpace`](space::CategoricalSearchSpace) | Integer codes for one or more categorical variables. |
//! | [`TaggedProductSearchSpace`](space::TaggedProductSearchSpace) | The Cartesian product of named sub-spaces. |
//! | [`TaggedMultiSearchSpace`](space::TaggedMultiSearchSpace) | A stack of same-dimension named sub-spaces. |
//! | [`Space`](space::Space) | Any of the above, combinable with `*` and [`Space::power`](space::Space::power). |
//! | [`Tensor`] | A batch of points carrying a [`DType`]. |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `sobol` | Scrambled Sobol sampling ([`BoxSpace::sample_sobol`](space::BoxSpace::sample_sobol)) via `sobol_burley` | on |
//! | `serde` | `Serialize`/`Deserialize` on tensors, category descriptions and the rejection config | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) around sampling and discretization | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::warn!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($($arg:tt)*) => {};
}

pub mod constraint;
pub mod encoder;
mod error;
mod rng_util;
pub mod sampler;
pub mod space;
mod tensor;

pub use error::{Error, ErrorKind, Result};
pub use tensor::{DType, Tensor};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use searchspace::prelude::*;
/// ```
pub mod prelude {
    pub use crate::constraint::{Constraint, LinearConstraint, NonlinearConstraint};
    pub use crate::encoder::{EncoderFunction, cast_encoder, one_hot_encoder};
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::sampler::{RandomSampler, RejectionConfig};
    pub use crate::space::{
        BoxSpace, Categories, CategoricalSearchSpace, CategoryDim, CollectionSearchSpace,
        DiscreteSearchSpace, SearchSpace, Space, SpaceKind, TaggedMultiSearchSpace,
        TaggedProductSearchSpace,
    };
    pub use crate::tensor::{DType, Tensor};
}
