use thiserror::Error;

use varclust_core::{Accession, Namespace};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not generate a new accession: {0}")]
    AccessionCouldNotBeGenerated(String),

    #[error("Accession {0} does not exist")]
    AccessionDoesNotExist(Accession),

    #[error("Accession {accession} was merged into {merged_into}")]
    AccessionMerged {
        accession: Accession,
        merged_into: Accession,
    },

    #[error("Accession {0} is deprecated")]
    AccessionDeprecated(Accession),

    #[error("Duplicate hash {hash} in the {namespace:?} clustered collection")]
    DuplicateHash { hash: String, namespace: Namespace },

    #[error("Store state lock is poisoned")]
    Poisoned,

    #[error("Invalid store snapshot: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Lookups on an accession whose history has moved on. Callers may skip
    /// the accession instead of failing the batch.
    pub fn is_stale_reference(&self) -> bool {
        matches!(
            self,
            StoreError::AccessionDoesNotExist(_)
                | StoreError::AccessionMerged { .. }
                | StoreError::AccessionDeprecated(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
