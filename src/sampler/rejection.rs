//! Bounded rejection sampling.
//!
//! Candidates are drawn in batches and filtered by a feasibility mask until
//! the requested number of points has been accepted. The first round draws
//! as many candidates as requested; every round that comes up short doubles
//! the batch, up to [`RejectionConfig::max_batch_size`]. After
//! [`RejectionConfig::max_rounds`] rounds the sampler gives up with
//! [`Error::FeasibleSamplingExhausted`].

use ndarray::{Array2, ArrayD, Ix2};

use crate::error::{Error, Result};
use crate::tensor::Tensor;

const DEFAULT_MAX_ROUNDS: usize = 100;
const DEFAULT_MAX_BATCH_SIZE: usize = 1 << 20;

/// Budget for rejection sampling from a constrained box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RejectionConfig {
    max_rounds: usize,
    max_batch_size: usize,
}

impl RejectionConfig {
    /// Creates a builder for a [`RejectionConfig`].
    ///
    /// # Examples
    ///
    /// ```
    /// use searchspace::sampler::RejectionConfig;
    ///
    /// let config = RejectionConfig::builder()
    ///     .max_rounds(10)
    ///     .max_batch_size(4096)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.max_rounds(), 10);
    /// ```
    #[must_use]
    pub fn builder() -> RejectionConfigBuilder {
        RejectionConfigBuilder::default()
    }

    /// Maximum number of candidate batches drawn.
    #[must_use]
    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    /// Largest batch the doubling schedule grows to.
    #[must_use]
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }
}

impl Default for RejectionConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

/// Builder for [`RejectionConfig`].
#[derive(Debug, Default)]
pub struct RejectionConfigBuilder {
    max_rounds: Option<usize>,
    max_batch_size: Option<usize>,
}

impl RejectionConfigBuilder {
    /// Sets the number of rounds before giving up.
    ///
    /// Default: 100.
    #[must_use]
    pub fn max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    /// Sets the cap on candidates drawn in one round.
    ///
    /// A request larger than the cap still draws the full request in its
    /// first round. Default: 2^20.
    #[must_use]
    pub fn max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = Some(size);
        self
    }

    /// Builds the configured [`RejectionConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRejectionConfig`] if either value is zero.
    pub fn build(self) -> Result<RejectionConfig> {
        let max_rounds = self.max_rounds.unwrap_or(DEFAULT_MAX_ROUNDS);
        let max_batch_size = self.max_batch_size.unwrap_or(DEFAULT_MAX_BATCH_SIZE);
        if max_rounds == 0 {
            return Err(Error::InvalidRejectionConfig("max_rounds"));
        }
        if max_batch_size == 0 {
            return Err(Error::InvalidRejectionConfig("max_batch_size"));
        }
        Ok(RejectionConfig {
            max_rounds,
            max_batch_size,
        })
    }
}

/// Draw batches with `draw` and keep the rows `feasible` accepts until
/// `num_samples` rows have been collected.
///
/// `draw(k)` must return a `[k, d]` tensor; `feasible` one flag per row.
/// A sequence that runs out of indices ends sampling like an exhausted
/// budget.
pub(crate) fn sample_until_full<D, F>(
    num_samples: usize,
    config: &RejectionConfig,
    mut draw: D,
    mut feasible: F,
) -> Result<Tensor>
where
    D: FnMut(usize) -> Result<Tensor>,
    F: FnMut(&Tensor) -> Result<ArrayD<bool>>,
{
    if num_samples == 0 {
        return draw(0);
    }

    let mut data: Vec<f64> = Vec::new();
    let mut accepted = 0;
    let mut batch_size = num_samples;
    let batch_cap = config.max_batch_size.max(num_samples);

    for round in 1..=config.max_rounds {
        let candidates = match draw(batch_size) {
            Err(Error::SequenceOverflow(_)) => {
                trace_warn!(round, accepted, "candidate sequence overflowed");
                return Err(Error::FeasibleSamplingExhausted {
                    requested: num_samples,
                    accepted,
                    rounds: round - 1,
                });
            }
            drawn => drawn?,
        };
        let mask = feasible(&candidates)?;
        let rows = candidates.values().view().into_dimensionality::<Ix2>()?;
        if data.is_empty() {
            data.reserve(num_samples * rows.ncols());
        }
        for (row, _) in rows.outer_iter().zip(mask.iter()).filter(|(_, keep)| **keep) {
            data.extend(row.iter().copied());
            accepted += 1;
            if accepted == num_samples {
                break;
            }
        }
        trace_debug!(round, batch_size, accepted, "rejection sampling round");

        if accepted == num_samples {
            trace_info!(rounds = round, num_samples, "feasible sampling complete");
            let points = Array2::from_shape_vec((num_samples, rows.ncols()), data)?;
            return Ok(Tensor::new(points, candidates.dtype()));
        }
        batch_size = batch_size.saturating_mul(2).min(batch_cap);
    }

    trace_warn!(
        rounds = config.max_rounds,
        accepted,
        num_samples,
        "feasible sampling exhausted its budget"
    );
    Err(Error::FeasibleSamplingExhausted {
        requested: num_samples,
        accepted,
        rounds: config.max_rounds,
    })
}
