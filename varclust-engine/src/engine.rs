use fxhash::FxHashMap;
use tracing::{debug, error, info};

use varclust_core::consts::clustering_reason;
use varclust_core::{
    Accession, Namespace, NamespaceSelector, SubmittedVariantEntity, SubmittedVariantOperation,
    is_multimap,
};
use varclust_store::{AccessionStore, ClusteredAccessionUpdate, VariantDocumentStore};

use crate::assigned::AssignedAccessions;
use crate::config::ClusteringConfig;
use crate::counts::ClusteringCounts;
use crate::errors::Result;
use crate::merge::{MergeOutcome, MergeResolver};
use crate::split::{PendingVariant, SplitDetector};

///
/// Clusters batches of submitted variants into RS identities.
///
/// Each batch goes through four steps:
/// 1. split detection on remapped, clustered variants (when enabled)
/// 2. resolve-or-create of the RS identity of every remaining variant
/// 3. merges where a remapped, clustered variant resolved to another RS
/// 4. assignment of an RS to every unclustered variant
///
/// Batches are independent; the engine only keeps the running counts.
///
pub struct ClusteringEngine<'s, A: AccessionStore, D: VariantDocumentStore> {
    accessions: &'s A,
    documents: &'s D,
    selector: NamespaceSelector,
    process_clustered_remapped_variants: bool,
    totals: ClusteringCounts,
}

impl<'s, A: AccessionStore, D: VariantDocumentStore> ClusteringEngine<'s, A, D> {
    pub fn new(accessions: &'s A, documents: &'s D, config: &ClusteringConfig) -> Self {
        ClusteringEngine {
            accessions,
            documents,
            selector: config.selector(),
            process_clustered_remapped_variants: config
                .clustering
                .process_clustered_remapped_variants,
            totals: ClusteringCounts::default(),
        }
    }

    /// Running totals over every batch processed so far.
    pub fn counts(&self) -> &ClusteringCounts {
        &self.totals
    }

    ///
    /// Cluster one batch.
    ///
    /// # Arguments
    /// * `batch` - submitted variants as currently stored
    ///
    /// # Returns
    /// * the counts of this batch; they are also added to the running totals
    ///
    pub fn process_batch(&mut self, batch: &[SubmittedVariantEntity]) -> Result<ClusteringCounts> {
        let mut counts = ClusteringCounts::default();
        let mut assigned = AssignedAccessions::new();

        let pending = batch
            .iter()
            .map(|entity| {
                PendingVariant::new(entity).inspect_err(|err| {
                    error!(accession = entity.accession, error = %err, "cannot classify submitted variant");
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let remaining: Vec<&PendingVariant<'_>> = if self.process_clustered_remapped_variants {
            let (remapped, rest): (Vec<_>, Vec<_>) = pending
                .iter()
                .partition(|p| p.entity.is_clustered() && p.entity.is_remapped());
            SplitDetector::new(self.accessions, self.documents, self.selector)
                .process(&remapped, &mut counts)?;
            rest
        } else {
            pending.iter().collect()
        };

        self.get_or_create_accessions(&remaining, &mut assigned, &mut counts)?;
        self.check_for_merges(&remaining, &mut assigned, &mut counts)?;
        self.cluster_submitted_variants(&remaining, &assigned, &mut counts)?;

        debug!(
            batch = batch.len(),
            created = counts.clustered_variants_created,
            clustered = counts.submitted_variants_clustered,
            "processed batch"
        );
        self.totals += &counts;
        Ok(counts)
    }

    fn get_or_create_accessions(
        &self,
        variants: &[&PendingVariant<'_>],
        assigned: &mut AssignedAccessions,
        counts: &mut ClusteringCounts,
    ) -> Result<()> {
        if variants.is_empty() {
            return Ok(());
        }

        let identities: Vec<_> = variants.iter().map(|p| p.identity.clone()).collect();
        for resolved in self.accessions.resolve_or_create(&identities)? {
            if resolved.is_new {
                counts.clustered_variants_created += 1;
            }
            if is_multimap([&resolved.variant]) {
                debug!(accession = resolved.accession, "multimap clustered variant, not a candidate");
                continue;
            }
            assigned.insert(resolved.hash, resolved.accession);
        }
        Ok(())
    }

    fn check_for_merges(
        &self,
        variants: &[&PendingVariant<'_>],
        assigned: &mut AssignedAccessions,
        counts: &mut ClusteringCounts,
    ) -> Result<()> {
        let resolver = MergeResolver::new(self.documents, self.selector);

        for variant in variants.iter().filter(|p| p.entity.is_remapped()) {
            let Some(provided) = variant.entity.clustered_variant_accession() else {
                continue;
            };
            // absent when the candidate was excluded as a multimap
            let Some(in_store) = assigned.get(&variant.hash) else {
                continue;
            };
            if assigned.survivor(provided) == in_store {
                continue;
            }

            match resolver.merge(provided, in_store, assigned, counts)? {
                MergeOutcome::Merged(priority) => {
                    assigned.insert(variant.hash.clone(), priority.accession_to_keep);
                }
                MergeOutcome::MultimapVeto | MergeOutcome::Unchanged => {}
            }
        }
        Ok(())
    }

    fn cluster_submitted_variants(
        &self,
        variants: &[&PendingVariant<'_>],
        assigned: &AssignedAccessions,
        counts: &mut ClusteringCounts,
    ) -> Result<()> {
        let mut updates: FxHashMap<Namespace, Vec<ClusteredAccessionUpdate>> = FxHashMap::default();

        for variant in variants.iter().filter(|p| !p.entity.is_clustered()) {
            let entity = variant.entity;
            let Some(rs) = assigned.get(&variant.hash) else {
                counts.submitted_variants_kept_unclustered += 1;
                continue;
            };

            updates
                .entry(self.selector.submitted(entity.accession))
                .or_default()
                .push(ClusteredAccessionUpdate {
                    hash: entity.hash.clone(),
                    clustered_variant_accession: rs,
                });
        }

        for namespace in Namespace::ALL {
            let Some(namespace_updates) = updates.remove(&namespace) else {
                continue;
            };
            let assignments: FxHashMap<String, Accession> = namespace_updates
                .iter()
                .map(|update| (update.hash.clone(), update.clustered_variant_accession))
                .collect();

            // records clustered by someone else since the batch was read are left alone
            let modified = self
                .documents
                .bulk_update_submitted(namespace, namespace_updates)?;
            counts.submitted_variants_clustered += modified.len() as u64;
            if modified.is_empty() {
                continue;
            }

            let operations: Vec<SubmittedVariantOperation> = modified
                .iter()
                .filter_map(|before| {
                    let rs = assignments.get(&before.hash)?;
                    Some(SubmittedVariantOperation::updated(
                        before.accession,
                        clustering_reason(before.accession, *rs),
                        before,
                    ))
                })
                .collect();
            let written = operations.len() as u64;
            self.documents
                .insert_submitted_operations(namespace, operations)?;
            counts.submitted_variants_update_operations_written += written;

            info!(?namespace, modified = modified.len(), "clustered submitted variants");
        }
        Ok(())
    }
}
