use crate::error::{Error, Result};

/// Build a generator from an optional seed; `None` draws a fresh one.
pub(crate) fn rng_from_seed(seed: Option<u64>) -> fastrand::Rng {
    seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)
}

/// Split off an independent child stream from `rng`.
pub(crate) fn child_rng(rng: &mut fastrand::Rng) -> fastrand::Rng {
    fastrand::Rng::with_seed(rng.u64(..))
}

/// Check a requested sample count and convert it to `usize`.
pub(crate) fn sample_count(num_samples: i64) -> Result<usize> {
    usize::try_from(num_samples).map_err(|_| Error::InvalidSampleSize(num_samples))
}
