//! Shared machinery for spaces built from tagged sub-spaces.

use std::collections::HashSet;

use super::{SearchSpace, Space};
use crate::error::{Error, Result};
use crate::rng_util;
use crate::tensor::Tensor;

/// Common queries of spaces composed of named sub-spaces.
pub trait CollectionSearchSpace: SearchSpace {
    /// The sub-space tags in construction order.
    fn subspace_tags(&self) -> &[String];

    /// The sub-spaces in construction order.
    fn subspaces(&self) -> &[Space];

    /// Number of sub-spaces.
    fn num_subspaces(&self) -> usize {
        self.subspaces().len()
    }

    /// The sub-space registered under `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSubspace`] if no sub-space has that tag.
    fn get_subspace(&self, tag: &str) -> Result<&Space> {
        let index = position(self.subspace_tags(), tag)?;
        Ok(&self.subspaces()[index])
    }
}

/// Tags `"0"`, `"1"`, ... for `count` sub-spaces.
pub(crate) fn default_tags(count: usize) -> Vec<String> {
    (0..count).map(|i| i.to_string()).collect()
}

pub(crate) fn position(tags: &[String], tag: &str) -> Result<usize> {
    tags.iter()
        .position(|t| t == tag)
        .ok_or_else(|| Error::UnknownSubspace(tag.to_owned()))
}

/// An ordered list of sub-spaces with unique tags.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TaggedSpaces {
    pub(crate) spaces: Vec<Space>,
    pub(crate) tags: Vec<String>,
}

impl TaggedSpaces {
    pub(crate) fn new(spaces: Vec<Space>, tags: Option<Vec<String>>) -> Result<Self> {
        let tags = tags.unwrap_or_else(|| default_tags(spaces.len()));
        if tags.len() != spaces.len() {
            return Err(Error::TagCountMismatch {
                tags: tags.len(),
                spaces: spaces.len(),
            });
        }
        let unique: HashSet<&str> = tags.iter().map(String::as_str).collect();
        if unique.len() != tags.len() {
            return Err(Error::DuplicateTags(tags));
        }
        Ok(Self { spaces, tags })
    }

    pub(crate) fn dimensions(&self) -> Vec<usize> {
        self.spaces.iter().map(SearchSpace::dimension).collect()
    }

    pub(crate) fn has_bounds(&self) -> bool {
        self.spaces.iter().all(SearchSpace::has_bounds)
    }

    /// Sample every sub-space from its own child stream of `rng`.
    pub(crate) fn sample_each(&self, num_samples: usize, rng: &mut fastrand::Rng) -> Result<Vec<Tensor>> {
        self.spaces
            .iter()
            .map(|space| space.sample_with_rng(num_samples, &mut rng_util::child_rng(rng)))
            .collect()
    }
}

/// Tags from anything string-like.
pub(crate) fn collect_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    tags.into_iter().map(Into::into).collect()
}
