//! Legacy vs active accession namespaces.
//!
//! Imported (legacy) and actively submitted records live in separate
//! collections but form one identity space. Which collection an accession
//! belongs to depends only on whether it is below the first accession issued
//! by the active service, so the answer never changes for a given value.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CLUSTERED_MONOTONIC_INIT, DEFAULT_SUBMITTED_MONOTONIC_INIT};
use crate::models::Accession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Records imported from the legacy archive (dbSNP).
    Legacy,
    /// Records accessioned by the active service.
    Active,
}

impl Namespace {
    pub const ALL: [Namespace; 2] = [Namespace::Legacy, Namespace::Active];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceSelector {
    pub submitted_monotonic_init: Accession,
    pub clustered_monotonic_init: Accession,
}

impl NamespaceSelector {
    pub fn new(submitted_monotonic_init: Accession, clustered_monotonic_init: Accession) -> Self {
        NamespaceSelector {
            submitted_monotonic_init,
            clustered_monotonic_init,
        }
    }

    pub fn submitted(&self, accession: Accession) -> Namespace {
        select(accession, self.submitted_monotonic_init)
    }

    pub fn clustered(&self, accession: Accession) -> Namespace {
        select(accession, self.clustered_monotonic_init)
    }
}

impl Default for NamespaceSelector {
    fn default() -> Self {
        NamespaceSelector::new(DEFAULT_SUBMITTED_MONOTONIC_INIT, DEFAULT_CLUSTERED_MONOTONIC_INIT)
    }
}

fn select(accession: Accession, threshold: Accession) -> Namespace {
    if accession >= threshold {
        Namespace::Active
    } else {
        Namespace::Legacy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1, Namespace::Legacy)]
    #[case(2_999_999_999, Namespace::Legacy)]
    #[case(3_000_000_000, Namespace::Active)]
    #[case(3_000_000_001, Namespace::Active)]
    fn test_clustered_threshold(#[case] accession: Accession, #[case] expected: Namespace) {
        let selector = NamespaceSelector::default();
        assert_eq!(selector.clustered(accession), expected);
    }

    #[rstest]
    fn test_submitted_and_clustered_thresholds_are_independent() {
        let selector = NamespaceSelector::new(100, 50);
        assert_eq!(selector.submitted(70), Namespace::Legacy);
        assert_eq!(selector.clustered(70), Namespace::Active);
    }
}
