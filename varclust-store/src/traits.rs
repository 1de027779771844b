//! Interfaces of the two stores the clustering engine works against.
//!
//! Implementations are expected to provide atomic single-document writes and
//! their own timeout/retry policy. Everything here takes `&self`: stores are
//! shared with other workers, so any state lives behind interior mutability.

use varclust_core::{
    Accession, ClusteredVariant, ClusteredVariantEntity, ClusteredVariantOperation, Namespace,
    SubmittedVariantEntity, SubmittedVariantOperation,
};

use crate::errors::Result;

/// Outcome of resolving one clustered identity against the accession store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAccession {
    pub hash: String,
    pub accession: Accession,
    /// The variant as stored, so attributes set by other processes (map
    /// weight) are visible to the caller.
    pub variant: ClusteredVariant,
    pub is_new: bool,
}

/// New `rs` value for one submitted variant, addressed by its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusteredAccessionUpdate {
    pub hash: String,
    pub clustered_variant_accession: Accession,
}

pub trait AccessionStore: Send + Sync {
    ///
    /// Get the accession of every identity, minting new monotonic accessions
    /// for hashes that are not stored yet.
    ///
    /// Returns one result per input, in input order. A hash present twice in
    /// `variants` is minted once and only its first result has `is_new` set.
    /// Concurrent callers racing on the same unknown hash must all receive the
    /// same accession.
    ///
    fn resolve_or_create(&self, variants: &[ClusteredVariant]) -> Result<Vec<ResolvedAccession>>;

    /// Like [`AccessionStore::resolve_or_create`] without minting: identities
    /// whose hash is unknown are left out of the result.
    fn get(&self, variants: &[ClusteredVariant]) -> Result<Vec<ResolvedAccession>>;

    /// One stored locus of `accession`. Fails with `AccessionMerged`,
    /// `AccessionDeprecated` or `AccessionDoesNotExist` when it is not active.
    fn lookup_by_accession(&self, accession: Accession) -> Result<ClusteredVariantEntity>;

    /// Every stored locus of `accession`, with the same failure modes as
    /// [`AccessionStore::lookup_by_accession`].
    fn lookup_all_loci(&self, accession: Accession) -> Result<Vec<ClusteredVariantEntity>>;
}

pub trait VariantDocumentStore: Send + Sync {
    fn find_clustered_by_accession(
        &self,
        namespace: Namespace,
        accession: Accession,
    ) -> Result<Vec<ClusteredVariantEntity>>;

    fn insert_clustered(
        &self,
        namespace: Namespace,
        entities: Vec<ClusteredVariantEntity>,
    ) -> Result<()>;

    /// Rewrite the accession of every clustered variant carrying `from`.
    /// Returns the number of documents modified.
    fn update_clustered_accession(
        &self,
        namespace: Namespace,
        from: Accession,
        to: Accession,
    ) -> Result<usize>;

    fn insert_clustered_operations(
        &self,
        namespace: Namespace,
        operations: Vec<ClusteredVariantOperation>,
    ) -> Result<()>;

    /// Submitted variants whose `rs` is `accession`, optionally restricted to
    /// one assembly.
    fn find_submitted_by_clustered_accession(
        &self,
        namespace: Namespace,
        accession: Accession,
        assembly: Option<&str>,
    ) -> Result<Vec<SubmittedVariantEntity>>;

    /// Rewrite `rs` of every submitted variant carrying `from`.
    /// Returns the number of documents modified.
    fn update_submitted_clustered_accession(
        &self,
        namespace: Namespace,
        from: Accession,
        to: Accession,
    ) -> Result<usize>;

    /// Unordered bulk of single-document `rs` assignments. An update only
    /// applies to a stored document whose `rs` is still unset.
    ///
    /// Returns the documents modified, as they were before the update.
    fn bulk_update_submitted(
        &self,
        namespace: Namespace,
        updates: Vec<ClusteredAccessionUpdate>,
    ) -> Result<Vec<SubmittedVariantEntity>>;

    fn insert_submitted_operations(
        &self,
        namespace: Namespace,
        operations: Vec<SubmittedVariantOperation>,
    ) -> Result<()>;

    /// Split-candidate operations previously written for `accession`.
    fn find_split_candidates(&self, accession: Accession) -> Result<Vec<SubmittedVariantOperation>>;

    /// Insert or replace the split-candidate operation keyed by
    /// (accession, reason).
    fn upsert_split_candidate(&self, operation: SubmittedVariantOperation) -> Result<()>;
}
