//! # Clustering of submitted variants into RS identities
//!
//! The [`ClusteringEngine`] takes batches of submitted variants (SS) and makes
//! sure each one references the RS of the clustered identity it belongs to.
//! Along the way it creates missing RS, merges RS that turn out to be the
//! same identity, and flags RS that a remapping split over several loci. Every
//! change of a clustered accession is recorded as an audit operation.
//!
//! ```rust
//! use chrono::Utc;
//! use varclust_core::{SubmittedVariant, SubmittedVariantEntity};
//! use varclust_engine::{ClusteringConfig, ClusteringEngine};
//! use varclust_store::InMemoryVariantStore;
//!
//! let config = ClusteringConfig::default();
//! let store = InMemoryVariantStore::new(config.selector());
//!
//! let variant = SubmittedVariant {
//!     assembly_accession: "GCA_000001405.15".to_string(),
//!     taxonomy_accession: 9606,
//!     project_accession: "PRJEB1".to_string(),
//!     contig: "chr1".to_string(),
//!     start: 1000,
//!     reference_allele: "A".to_string(),
//!     alternate_allele: "T".to_string(),
//!     clustered_variant_accession: None,
//!     remapped_from: None,
//!     validated: false,
//! };
//! let entity = SubmittedVariantEntity::new(5_000_000_001, variant, Utc::now());
//! store.insert_submitted_variants(vec![entity.clone()]).unwrap();
//!
//! let mut engine = ClusteringEngine::new(&store, &store, &config);
//! let counts = engine.process_batch(&[entity]).unwrap();
//! assert_eq!(counts.clustered_variants_created, 1);
//! assert_eq!(counts.submitted_variants_clustered, 1);
//! ```
pub mod assigned;
pub mod config;
pub mod consts;
pub mod counts;
pub mod engine;
pub mod errors;
pub mod merge;
mod split;

pub use assigned::AssignedAccessions;
pub use config::{ClusteringConfig, ConfigError};
pub use counts::ClusteringCounts;
pub use engine::ClusteringEngine;
pub use errors::ClusteringError;
pub use merge::{MergeOutcome, MergeResolver, Priority, prioritise};
