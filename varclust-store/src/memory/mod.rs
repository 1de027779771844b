//! In-memory reference implementation of both store interfaces.
//!
//! One [`InMemoryVariantStore`] plays the accession store and the document
//! store at once, over the same collections, the way a single document
//! database backs both in production. All state sits behind one mutex, which
//! makes every trait call atomic with respect to other threads; in
//! particular two workers racing to mint the same hash get the same accession.

mod snapshot;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use varclust_core::hashing::clustered_variant_hash;
use varclust_core::{
    Accession, ClusteredVariant, ClusteredVariantEntity, ClusteredVariantOperation, EventType,
    Namespace, NamespaceSelector, SubmittedVariantEntity, SubmittedVariantOperation,
};

use crate::errors::{Result, StoreError};
use crate::traits::{
    AccessionStore, ClusteredAccessionUpdate, ResolvedAccession, VariantDocumentStore,
};

/// The collections of one namespace. Documents are keyed by their hash.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Collections {
    submitted: BTreeMap<String, SubmittedVariantEntity>,
    clustered: BTreeMap<String, ClusteredVariantEntity>,
    submitted_operations: Vec<SubmittedVariantOperation>,
    clustered_operations: Vec<ClusteredVariantOperation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoreState {
    legacy: Collections,
    active: Collections,
    next_clustered_accession: Accession,
    #[serde(default)]
    deprecated: BTreeSet<Accession>,
}

impl StoreState {
    fn new(selector: &NamespaceSelector) -> Self {
        StoreState {
            legacy: Collections::default(),
            active: Collections::default(),
            next_clustered_accession: selector.clustered_monotonic_init,
            deprecated: BTreeSet::new(),
        }
    }

    fn collections(&self, namespace: Namespace) -> &Collections {
        match namespace {
            Namespace::Legacy => &self.legacy,
            Namespace::Active => &self.active,
        }
    }

    fn collections_mut(&mut self, namespace: Namespace) -> &mut Collections {
        match namespace {
            Namespace::Legacy => &mut self.legacy,
            Namespace::Active => &mut self.active,
        }
    }

    fn clustered_by_hash(&self, hash: &str) -> Option<&ClusteredVariantEntity> {
        Namespace::ALL
            .iter()
            .find_map(|ns| self.collections(*ns).clustered.get(hash))
    }

    fn clustered_by_accession(&self, accession: Accession) -> Vec<ClusteredVariantEntity> {
        Namespace::ALL
            .iter()
            .flat_map(|ns| self.collections(*ns).clustered.values())
            .filter(|entity| entity.accession == accession)
            .cloned()
            .collect()
    }

    fn merged_into(&self, accession: Accession) -> Option<Accession> {
        Namespace::ALL
            .iter()
            .flat_map(|ns| self.collections(*ns).clustered_operations.iter())
            .filter(|op| op.event_type == EventType::Merged && op.accession == accession)
            .filter_map(|op| op.merge_into)
            .last()
    }

    fn active_loci(&self, accession: Accession) -> Result<Vec<ClusteredVariantEntity>> {
        let loci = self.clustered_by_accession(accession);
        if !loci.is_empty() {
            return Ok(loci);
        }
        if self.deprecated.contains(&accession) {
            return Err(StoreError::AccessionDeprecated(accession));
        }
        match self.merged_into(accession) {
            Some(merged_into) => Err(StoreError::AccessionMerged {
                accession,
                merged_into,
            }),
            None => Err(StoreError::AccessionDoesNotExist(accession)),
        }
    }
}

#[derive(Debug)]
pub struct InMemoryVariantStore {
    selector: NamespaceSelector,
    state: Mutex<StoreState>,
}

impl InMemoryVariantStore {
    /// Create an empty store. New RS accessions are minted from the selector's
    /// clustered threshold upwards.
    pub fn new(selector: NamespaceSelector) -> Self {
        InMemoryVariantStore {
            selector,
            state: Mutex::new(StoreState::new(&selector)),
        }
    }

    pub fn selector(&self) -> NamespaceSelector {
        self.selector
    }

    fn state(&self) -> Result<MutexGuard<'_, StoreState>> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Seed submitted variants, each into the namespace of its accession.
    /// A variant with an already stored hash replaces the stored one.
    pub fn insert_submitted_variants(&self, entities: Vec<SubmittedVariantEntity>) -> Result<()> {
        let mut state = self.state()?;
        for entity in entities {
            let namespace = self.selector.submitted(entity.accession);
            state
                .collections_mut(namespace)
                .submitted
                .insert(entity.hash.clone(), entity);
        }
        Ok(())
    }

    /// Seed clustered variants, each into the namespace of its accession.
    pub fn insert_clustered_variants(&self, entities: Vec<ClusteredVariantEntity>) -> Result<()> {
        let mut state = self.state()?;
        for entity in entities {
            let namespace = self.selector.clustered(entity.accession);
            insert_unique(state.collections_mut(namespace), namespace, entity)?;
        }
        Ok(())
    }

    /// Remove every locus of `accession` and flag it as deprecated.
    pub fn deprecate(&self, accession: Accession) -> Result<()> {
        let mut state = self.state()?;
        for namespace in Namespace::ALL {
            state
                .collections_mut(namespace)
                .clustered
                .retain(|_, entity| entity.accession != accession);
        }
        state.deprecated.insert(accession);
        Ok(())
    }

    pub fn submitted_variants(&self, namespace: Namespace) -> Result<Vec<SubmittedVariantEntity>> {
        Ok(self.state()?.collections(namespace).submitted.values().cloned().collect())
    }

    pub fn clustered_variants(&self, namespace: Namespace) -> Result<Vec<ClusteredVariantEntity>> {
        Ok(self.state()?.collections(namespace).clustered.values().cloned().collect())
    }

    pub fn submitted_operations(
        &self,
        namespace: Namespace,
    ) -> Result<Vec<SubmittedVariantOperation>> {
        Ok(self.state()?.collections(namespace).submitted_operations.clone())
    }

    pub fn clustered_operations(
        &self,
        namespace: Namespace,
    ) -> Result<Vec<ClusteredVariantOperation>> {
        Ok(self.state()?.collections(namespace).clustered_operations.clone())
    }

    /// Look a submitted variant up by its hash, in either namespace.
    pub fn find_submitted_by_hash(&self, hash: &str) -> Result<Option<SubmittedVariantEntity>> {
        let state = self.state()?;
        Ok(Namespace::ALL
            .iter()
            .find_map(|ns| state.collections(*ns).submitted.get(hash))
            .cloned())
    }

    /// Submitted variants of one assembly across both namespaces, ordered by
    /// accession. This is what a clustering job reads when it clusters from
    /// the store rather than from a file.
    pub fn submitted_variants_by_assembly(
        &self,
        assembly: &str,
    ) -> Result<Vec<SubmittedVariantEntity>> {
        let state = self.state()?;
        let mut variants: Vec<SubmittedVariantEntity> = Namespace::ALL
            .iter()
            .flat_map(|ns| state.collections(*ns).submitted.values())
            .filter(|entity| entity.assembly_accession() == assembly)
            .cloned()
            .collect();
        variants.sort_by_key(|entity| entity.accession);
        Ok(variants)
    }
}

fn insert_unique(
    collections: &mut Collections,
    namespace: Namespace,
    entity: ClusteredVariantEntity,
) -> Result<()> {
    if collections.clustered.contains_key(&entity.hash) {
        return Err(StoreError::DuplicateHash {
            hash: entity.hash,
            namespace,
        });
    }
    collections.clustered.insert(entity.hash.clone(), entity);
    Ok(())
}

impl AccessionStore for InMemoryVariantStore {
    fn resolve_or_create(&self, variants: &[ClusteredVariant]) -> Result<Vec<ResolvedAccession>> {
        let mut state = self.state()?;
        let mut resolved = Vec::with_capacity(variants.len());

        for variant in variants {
            let hash = clustered_variant_hash(variant);
            if let Some(existing) = state.clustered_by_hash(&hash) {
                resolved.push(ResolvedAccession {
                    hash,
                    accession: existing.accession,
                    variant: existing.variant.clone(),
                    is_new: false,
                });
                continue;
            }

            let accession = state.next_clustered_accession;
            state.next_clustered_accession = accession.checked_add(1).ok_or_else(|| {
                StoreError::AccessionCouldNotBeGenerated(format!(
                    "clustered accession space exhausted at {}",
                    accession
                ))
            })?;

            let entity = ClusteredVariantEntity::new(accession, variant.clone(), chrono::Utc::now());
            let namespace = self.selector.clustered(accession);
            debug!(accession, hash = %entity.hash, "minted clustered accession");
            insert_unique(state.collections_mut(namespace), namespace, entity)?;

            resolved.push(ResolvedAccession {
                hash,
                accession,
                variant: variant.clone(),
                is_new: true,
            });
        }

        Ok(resolved)
    }

    fn get(&self, variants: &[ClusteredVariant]) -> Result<Vec<ResolvedAccession>> {
        let state = self.state()?;
        Ok(variants
            .iter()
            .filter_map(|variant| {
                let hash = clustered_variant_hash(variant);
                state.clustered_by_hash(&hash).map(|existing| ResolvedAccession {
                    hash,
                    accession: existing.accession,
                    variant: existing.variant.clone(),
                    is_new: false,
                })
            })
            .collect())
    }

    fn lookup_by_accession(&self, accession: Accession) -> Result<ClusteredVariantEntity> {
        let state = self.state()?;
        let mut loci = state.active_loci(accession)?;
        // active_loci never returns an empty list
        Ok(loci.swap_remove(0))
    }

    fn lookup_all_loci(&self, accession: Accession) -> Result<Vec<ClusteredVariantEntity>> {
        self.state()?.active_loci(accession)
    }
}

impl VariantDocumentStore for InMemoryVariantStore {
    fn find_clustered_by_accession(
        &self,
        namespace: Namespace,
        accession: Accession,
    ) -> Result<Vec<ClusteredVariantEntity>> {
        let state = self.state()?;
        Ok(state
            .collections(namespace)
            .clustered
            .values()
            .filter(|entity| entity.accession == accession)
            .cloned()
            .collect())
    }

    fn insert_clustered(
        &self,
        namespace: Namespace,
        entities: Vec<ClusteredVariantEntity>,
    ) -> Result<()> {
        let mut state = self.state()?;
        for entity in entities {
            insert_unique(state.collections_mut(namespace), namespace, entity)?;
        }
        Ok(())
    }

    fn update_clustered_accession(
        &self,
        namespace: Namespace,
        from: Accession,
        to: Accession,
    ) -> Result<usize> {
        let mut state = self.state()?;
        let mut modified = 0;
        for entity in state.collections_mut(namespace).clustered.values_mut() {
            if entity.accession == from {
                entity.accession = to;
                modified += 1;
            }
        }
        Ok(modified)
    }

    fn insert_clustered_operations(
        &self,
        namespace: Namespace,
        operations: Vec<ClusteredVariantOperation>,
    ) -> Result<()> {
        let mut state = self.state()?;
        state
            .collections_mut(namespace)
            .clustered_operations
            .extend(operations);
        Ok(())
    }

    fn find_submitted_by_clustered_accession(
        &self,
        namespace: Namespace,
        accession: Accession,
        assembly: Option<&str>,
    ) -> Result<Vec<SubmittedVariantEntity>> {
        let state = self.state()?;
        Ok(state
            .collections(namespace)
            .submitted
            .values()
            .filter(|entity| entity.clustered_variant_accession() == Some(accession))
            .filter(|entity| assembly.is_none_or(|asm| entity.assembly_accession() == asm))
            .cloned()
            .collect())
    }

    fn update_submitted_clustered_accession(
        &self,
        namespace: Namespace,
        from: Accession,
        to: Accession,
    ) -> Result<usize> {
        let mut state = self.state()?;
        let mut modified = 0;
        for entity in state.collections_mut(namespace).submitted.values_mut() {
            if entity.clustered_variant_accession() == Some(from) {
                entity.variant.clustered_variant_accession = Some(to);
                modified += 1;
            }
        }
        Ok(modified)
    }

    fn bulk_update_submitted(
        &self,
        namespace: Namespace,
        updates: Vec<ClusteredAccessionUpdate>,
    ) -> Result<Vec<SubmittedVariantEntity>> {
        let mut state = self.state()?;
        let submitted = &mut state.collections_mut(namespace).submitted;
        let mut modified = Vec::new();
        for update in updates {
            // unordered bulk: a missing or already clustered document is skipped
            let Some(entity) = submitted.get_mut(&update.hash) else {
                continue;
            };
            if entity.is_clustered() {
                continue;
            }
            modified.push(entity.clone());
            entity.variant.clustered_variant_accession = Some(update.clustered_variant_accession);
        }
        Ok(modified)
    }

    fn insert_submitted_operations(
        &self,
        namespace: Namespace,
        operations: Vec<SubmittedVariantOperation>,
    ) -> Result<()> {
        let mut state = self.state()?;
        state
            .collections_mut(namespace)
            .submitted_operations
            .extend(operations);
        Ok(())
    }

    fn find_split_candidates(&self, accession: Accession) -> Result<Vec<SubmittedVariantOperation>> {
        let state = self.state()?;
        Ok(Namespace::ALL
            .iter()
            .flat_map(|ns| state.collections(*ns).submitted_operations.iter())
            .filter(|op| op.event_type == EventType::RsSplitCandidate && op.accession == accession)
            .cloned()
            .collect())
    }

    fn upsert_split_candidate(&self, operation: SubmittedVariantOperation) -> Result<()> {
        let mut state = self.state()?;
        let operations = &mut state.collections_mut(Namespace::Active).submitted_operations;
        let existing = operations.iter_mut().find(|op| {
            op.event_type == EventType::RsSplitCandidate
                && op.accession == operation.accession
                && op.reason == operation.reason
        });
        match existing {
            Some(op) => op.inactive_objects = operation.inactive_objects,
            None => operations.push(operation),
        }
        Ok(())
    }
}
