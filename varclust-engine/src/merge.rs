//! Merging of two RS that turn out to describe the same clustered identity.

use tracing::{debug, info};

use varclust_core::consts::merge_reason;
use varclust_core::{
    Accession, ClusteredVariantEntity, ClusteredVariantOperation, Namespace, NamespaceSelector,
    SubmittedVariantOperation, is_multimap,
};
use varclust_store::{Result, VariantDocumentStore};

use crate::assigned::AssignedAccessions;
use crate::counts::ClusteringCounts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority {
    pub accession_to_keep: Accession,
    pub accession_to_be_merged: Accession,
}

///
/// Decide which of two accessions survives a merge.
///
/// Legacy accessions beat active ones; within a namespace the smaller
/// accession wins. The result does not depend on argument order.
///
pub fn prioritise(a: Accession, b: Accession, selector: &NamespaceSelector) -> Priority {
    let key_a = (selector.clustered(a), a);
    let key_b = (selector.clustered(b), b);
    if key_a <= key_b {
        Priority {
            accession_to_keep: a,
            accession_to_be_merged: b,
        }
    } else {
        Priority {
            accession_to_keep: b,
            accession_to_be_merged: a,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged(Priority),
    /// One side maps to several places; nothing was written.
    MultimapVeto,
    /// Both accessions are the same RS already.
    Unchanged,
}

pub struct MergeResolver<'s, D: VariantDocumentStore> {
    documents: &'s D,
    selector: NamespaceSelector,
}

impl<'s, D: VariantDocumentStore> MergeResolver<'s, D> {
    pub fn new(documents: &'s D, selector: NamespaceSelector) -> Self {
        MergeResolver {
            documents,
            selector,
        }
    }

    fn clustered_in_both_namespaces(
        &self,
        accession: Accession,
    ) -> Result<Vec<(Namespace, ClusteredVariantEntity)>> {
        let mut found = Vec::new();
        for namespace in Namespace::ALL {
            for entity in self.documents.find_clustered_by_accession(namespace, accession)? {
                found.push((namespace, entity));
            }
        }
        Ok(found)
    }

    ///
    /// Merge `provided` (the RS a submitted variant carries) with `in_store`
    /// (the RS its hash resolved to).
    ///
    /// Every clustered document of the losing accession gets a MERGED audit
    /// entry and is rewritten to the winner; every submitted variant pointing
    /// at the loser, in either namespace, gets an UPDATED audit entry and is
    /// rewritten too. `assigned` is redirected so the rest of the batch never
    /// sees the loser again.
    ///
    pub fn merge(
        &self,
        provided: Accession,
        in_store: Accession,
        assigned: &mut AssignedAccessions,
        counts: &mut ClusteringCounts,
    ) -> Result<MergeOutcome> {
        let provided = assigned.survivor(provided);
        let in_store = assigned.survivor(in_store);
        if provided == in_store {
            return Ok(MergeOutcome::Unchanged);
        }

        let priority = prioritise(provided, in_store, &self.selector);
        let keep = priority.accession_to_keep;
        let merged = priority.accession_to_be_merged;

        let to_merge = self.clustered_in_both_namespaces(merged)?;
        let to_keep = self.clustered_in_both_namespaces(keep)?;

        if is_multimap(to_merge.iter().map(|(_, entity)| entity))
            || is_multimap(to_keep.iter().map(|(_, entity)| entity))
        {
            debug!(keep, merged, "multimap clustered variant, skipping merge");
            return Ok(MergeOutcome::MultimapVeto);
        }

        let reason = merge_reason(merged, keep);

        for namespace in Namespace::ALL {
            let operations: Vec<ClusteredVariantOperation> = to_merge
                .iter()
                .filter(|(ns, _)| *ns == namespace)
                .map(|(_, entity)| {
                    ClusteredVariantOperation::merged(merged, keep, reason.clone(), entity)
                })
                .collect();
            if operations.is_empty() {
                continue;
            }
            let written = operations.len() as u64;
            self.documents
                .insert_clustered_operations(namespace, operations)?;
            counts.clustered_variants_merge_operations_written += written;

            let modified = self
                .documents
                .update_clustered_accession(namespace, merged, keep)?;
            counts.clustered_variants_updated += modified as u64;
        }

        for namespace in Namespace::ALL {
            let submitted = self
                .documents
                .find_submitted_by_clustered_accession(namespace, merged, None)?;
            if submitted.is_empty() {
                continue;
            }
            let operations: Vec<SubmittedVariantOperation> = submitted
                .iter()
                .map(|sve| SubmittedVariantOperation::updated(sve.accession, reason.clone(), sve))
                .collect();
            let written = operations.len() as u64;
            self.documents
                .insert_submitted_operations(namespace, operations)?;
            counts.submitted_variants_update_operations_written += written;

            let modified = self
                .documents
                .update_submitted_clustered_accession(namespace, merged, keep)?;
            counts.submitted_variants_updated_rs += modified as u64;
        }

        assigned.redirect(merged, keep);
        info!(merged, keep, "merged clustered variant");

        Ok(MergeOutcome::Merged(priority))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(10, 3_010, 10)]
    #[case(3_010, 10, 10)]
    #[case(3_020, 3_010, 3_010)]
    #[case(20, 10, 10)]
    fn test_prioritise(#[case] a: Accession, #[case] b: Accession, #[case] keep: Accession) {
        let selector = NamespaceSelector::new(5_000, 3_000);
        let priority = prioritise(a, b, &selector);
        assert_eq!(priority.accession_to_keep, keep);
        assert_eq!(
            priority.accession_to_be_merged,
            if keep == a { b } else { a }
        );
    }

    #[rstest]
    fn test_prioritise_is_symmetric() {
        let selector = NamespaceSelector::default();
        assert_eq!(
            prioritise(3_000_000_005, 12, &selector),
            prioritise(12, 3_000_000_005, &selector)
        );
    }
}
