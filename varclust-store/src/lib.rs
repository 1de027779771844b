//! # Stores for clustered and submitted variants
//!
//! The clustering engine talks to two stores:
//!
//! - an [`AccessionStore`] that maps RS identities to accessions and mints new
//!   ones, and
//! - a [`VariantDocumentStore`] that holds the submitted and clustered
//!   documents of each namespace together with their audit operations.
//!
//! [`InMemoryVariantStore`] implements both over one set of collections and
//! can be persisted to a JSON snapshot between runs.
//!
//! ```rust
//! use varclust_core::{ClusteredVariant, NamespaceSelector, VariantType};
//! use varclust_store::{AccessionStore, InMemoryVariantStore};
//!
//! let store = InMemoryVariantStore::new(NamespaceSelector::default());
//! let variant = ClusteredVariant::new("GCA_000001405.15", 9606, "chr1", 1000, VariantType::Snv);
//!
//! let first = store.resolve_or_create(&[variant.clone()]).unwrap();
//! let again = store.resolve_or_create(&[variant]).unwrap();
//! assert_eq!(first[0].accession, again[0].accession);
//! assert!(!again[0].is_new);
//! ```
pub mod errors;
pub mod memory;
pub mod traits;

pub use errors::{Result, StoreError};
pub use memory::InMemoryVariantStore;
pub use traits::{AccessionStore, ClusteredAccessionUpdate, ResolvedAccession, VariantDocumentStore};
