use thiserror::Error;

use varclust_core::VariantError;
use varclust_store::StoreError;

#[derive(Error, Debug)]
pub enum ClusteringError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Malformed submitted variant: {0}")]
    InputMalformed(#[from] VariantError),
}

pub type Result<T> = std::result::Result<T, ClusteringError>;
