//! Order-independent fingerprint of a configuration.
//!
//! Two configurations that differ only by a permutation of tube positions
//! are the same puzzle state. The visited set of the solver keys on this
//! canonical form, which collapses the `n!` tube orderings of every state
//! into one entry.

use crate::puzzle::{Configuration, Tube};

/// Canonical form of a configuration: its tubes sorted lexicographically.
///
/// Only used as a hashable visited-set key; the encoding is not meant to be
/// read back by humans.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalKey {
    tubes: Vec<Tube>,
}

impl CanonicalKey {
    pub fn from_configuration(config: &Configuration) -> Self {
        let mut tubes = config.tubes().to_vec();
        tubes.sort_unstable();
        Self { tubes }
    }
}
