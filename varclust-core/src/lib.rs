//! # Core model for variant clustering
//!
//! This crate holds everything the clustering engine needs that does not talk
//! to a store:
//!
//! - `models` - submitted (SS) and clustered (RS) variants, their stored
//!   entities and the audit operations written alongside every mutation
//! - `hashing` - content digests that identify a clustered/submitted variant
//! - `namespace` - the legacy/active split of the accession space
//! - `multimap` - the policy that keeps multi-location RS out of merges
//!
//! ```rust
//! use varclust_core::{ClusteredVariant, VariantType, hashing::clustered_variant_hash};
//!
//! let rs = ClusteredVariant::new("GCA_000000001.1", 60711, "chr1", 1000, VariantType::Snv);
//! let hash = clustered_variant_hash(&rs);
//! assert_eq!(hash, clustered_variant_hash(&rs.clone()));
//! ```

pub mod consts;
pub mod errors;
pub mod hashing;
pub mod models;
pub mod multimap;
pub mod namespace;

// re-export for cleaner imports
pub use errors::VariantError;
pub use models::{
    Accession, AccessionOperation, ClusteredVariant, ClusteredVariantEntity,
    ClusteredVariantOperation, EventType, SubmittedVariant, SubmittedVariantEntity,
    SubmittedVariantOperation, VariantType,
};
pub use multimap::is_multimap;
pub use namespace::{Namespace, NamespaceSelector};
