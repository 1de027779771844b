//! Detection of RS split candidates among remapped, already clustered
//! submitted variants.
//!
//! Remapping moves submitted variants to a new assembly but keeps their RS.
//! Two variants sharing an RS can end up at different loci or with different
//! types there, and an RS must not describe two identities in one assembly.
//! Those RS are recorded for manual rectification; no accession is changed.

use std::collections::BTreeMap;

use chrono::Utc;
use fxhash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

use varclust_core::consts::split_candidate_reason;
use varclust_core::hashing::clustered_variant_hash;
use varclust_core::{
    Accession, ClusteredVariant, ClusteredVariantEntity, Namespace, NamespaceSelector,
    SubmittedVariantEntity, SubmittedVariantOperation, VariantError,
};
use varclust_store::{AccessionStore, VariantDocumentStore};

use crate::counts::ClusteringCounts;
use crate::errors::Result;

/// A submitted variant together with the clustered identity it projects to.
#[derive(Debug, Clone)]
pub(crate) struct PendingVariant<'b> {
    pub entity: &'b SubmittedVariantEntity,
    pub identity: ClusteredVariant,
    pub hash: String,
}

impl<'b> PendingVariant<'b> {
    pub fn new(entity: &'b SubmittedVariantEntity) -> std::result::Result<Self, VariantError> {
        let identity = entity.to_clustered_variant()?;
        let hash = clustered_variant_hash(&identity);
        Ok(PendingVariant {
            entity,
            identity,
            hash,
        })
    }
}

pub(crate) struct SplitDetector<'s, A: AccessionStore, D: VariantDocumentStore> {
    accessions: &'s A,
    documents: &'s D,
    selector: NamespaceSelector,
}

impl<'s, A: AccessionStore, D: VariantDocumentStore> SplitDetector<'s, A, D> {
    pub fn new(accessions: &'s A, documents: &'s D, selector: NamespaceSelector) -> Self {
        SplitDetector {
            accessions,
            documents,
            selector,
        }
    }

    ///
    /// Inspect remapped, clustered variants and record what their new
    /// positions mean for the RS they carry.
    ///
    /// For each (RS, hash) group, in ascending order:
    /// - the hash is already one of the RS's hashes in that assembly: nothing to do
    /// - the hash belongs to some other RS: flagged and left alone
    /// - the RS has no hash in that assembly yet: a clustered variant is created
    ///   for it
    /// - otherwise the RS is a split candidate
    ///
    /// Every variant passed in is considered handled by the caller.
    ///
    pub fn process(
        &self,
        variants: &[&PendingVariant<'_>],
        counts: &mut ClusteringCounts,
    ) -> Result<()> {
        if variants.is_empty() {
            return Ok(());
        }

        let identities: Vec<ClusteredVariant> =
            variants.iter().map(|v| v.identity.clone()).collect();
        let mut existing_hashes: FxHashSet<String> = self
            .accessions
            .get(&identities)?
            .into_iter()
            .map(|resolved| resolved.hash)
            .collect();

        let mut grouped: BTreeMap<Accession, BTreeMap<&str, Vec<&PendingVariant<'_>>>> =
            BTreeMap::new();
        for variant in variants {
            if let Some(accession) = variant.entity.clustered_variant_accession() {
                grouped
                    .entry(accession)
                    .or_default()
                    .entry(variant.hash.as_str())
                    .or_default()
                    .push(*variant);
            }
        }

        let mut new_entities: FxHashMap<Namespace, Vec<ClusteredVariantEntity>> =
            FxHashMap::default();
        let mut split_snapshots: BTreeMap<Accession, Vec<SubmittedVariantEntity>> =
            BTreeMap::new();
        let mut fetched: FxHashSet<(Accession, String)> = FxHashSet::default();

        for (accession, by_hash) in &grouped {
            let accession = *accession;
            let loci = match self.accessions.lookup_all_loci(accession) {
                Ok(loci) => loci,
                Err(err) if err.is_stale_reference() => {
                    warn!(accession, error = %err, "cannot read clustered variant, skipping split detection");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let mut hashes_by_assembly: FxHashMap<String, FxHashSet<String>> =
                FxHashMap::default();

            for (hash, group) in by_hash {
                let first = group[0];
                let assembly = first.identity.assembly_accession.clone();
                let known = hashes_by_assembly
                    .entry(assembly.clone())
                    .or_insert_with(|| {
                        loci.iter()
                            .filter(|locus| locus.variant.assembly_accession == assembly)
                            .map(|locus| locus.hash.clone())
                            .collect()
                    });

                if known.contains(*hash) {
                    continue;
                }

                if existing_hashes.contains(*hash) {
                    info!(
                        accession,
                        hash = *hash,
                        "remapped hash already belongs to another clustered variant"
                    );
                    counts.remapped_hash_collisions_flagged += 1;
                    continue;
                }

                if known.is_empty() {
                    let entity =
                        ClusteredVariantEntity::new(accession, first.identity.clone(), Utc::now());
                    known.insert(entity.hash.clone());
                    existing_hashes.insert(entity.hash.clone());
                    new_entities
                        .entry(self.selector.clustered(accession))
                        .or_default()
                        .push(entity);
                    continue;
                }

                if fetched.insert((accession, assembly.clone())) {
                    let snapshots = split_snapshots.entry(accession).or_default();
                    for namespace in Namespace::ALL {
                        snapshots.extend(self.documents.find_submitted_by_clustered_accession(
                            namespace,
                            accession,
                            Some(assembly.as_str()),
                        )?);
                    }
                }
            }
        }

        for namespace in Namespace::ALL {
            if let Some(entities) = new_entities.remove(&namespace) {
                let created = entities.len() as u64;
                debug!(count = created, ?namespace, "inserting remapped clustered variants");
                self.documents.insert_clustered(namespace, entities)?;
                counts.clustered_variants_created_from_remapping += created;
            }
        }

        for (accession, snapshots) in split_snapshots {
            self.record_split_candidate(accession, snapshots, counts)?;
        }

        Ok(())
    }

    fn record_split_candidate(
        &self,
        accession: Accession,
        snapshots: Vec<SubmittedVariantEntity>,
        counts: &mut ClusteringCounts,
    ) -> Result<()> {
        let reason = split_candidate_reason(accession);

        let mut affected: Vec<SubmittedVariantEntity> = self
            .documents
            .find_split_candidates(accession)?
            .into_iter()
            .find(|op| op.reason == reason)
            .map(|op| op.inactive_objects)
            .unwrap_or_default();

        let mut seen: FxHashSet<String> = affected.iter().map(|sve| sve.hash.clone()).collect();
        let mut added = 0;
        for snapshot in snapshots {
            if seen.insert(snapshot.hash.clone()) {
                affected.push(snapshot);
                added += 1;
            }
        }

        info!(accession, affected = affected.len(), "recording RS split candidate");

        self.documents
            .upsert_split_candidate(SubmittedVariantOperation::split_candidate(
                accession, reason, affected,
            ))?;
        counts.clustered_variants_rs_split += added;
        Ok(())
    }
}
