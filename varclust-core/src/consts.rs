//! Constants shared by the clustering crates.
//!
//! Reason strings are part of the audit trail format: split-candidate
//! operations are upserted by (accession, reason), so changing
//! [`split_candidate_reason`] would stop previous candidates from being found.

use crate::models::Accession;

/// First submitted (SS) accession issued by the active accessioning service.
/// Anything below belongs to the legacy (imported) namespace.
pub const DEFAULT_SUBMITTED_MONOTONIC_INIT: Accession = 5_000_000_000;

/// First clustered (RS) accession issued by the active accessioning service.
pub const DEFAULT_CLUSTERED_MONOTONIC_INIT: Accession = 3_000_000_000;

/// Separator used when building the summary string that is digested.
pub const SUMMARY_SEPARATOR: char = '_';

/// Number of bytes of the SHA-512 digest that are kept.
pub const DIGEST_TRUNCATION_BYTES: usize = 24;

/// Length of an encoded digest (24 bytes, base64url without padding).
pub const DIGEST_LENGTH: usize = 32;

/// Valid bases for a reference or alternate allele.
pub const NUCLEOTIDES: &[u8] = b"ACGTN";

pub fn split_candidate_reason(accession: Accession) -> String {
    format!("Hash mismatch with {}", accession)
}

pub fn merge_reason(merged: Accession, merged_into: Accession) -> String {
    format!("Original rs{} was merged into rs{}.", merged, merged_into)
}

pub fn clustering_reason(submitted: Accession, clustered: Accession) -> String {
    format!("Clustering submitted variant {} with rs{}", submitted, clustered)
}
