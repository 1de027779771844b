use std::sync::Arc;
use std::thread;

use chrono::Utc;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

use varclust_core::{
    ClusteredVariant, ClusteredVariantEntity, ClusteredVariantOperation, Namespace,
    NamespaceSelector, SubmittedVariant, SubmittedVariantEntity, VariantType,
};
use varclust_store::{
    AccessionStore, ClusteredAccessionUpdate, InMemoryVariantStore, StoreError,
    VariantDocumentStore,
};

#[fixture]
fn store() -> InMemoryVariantStore {
    InMemoryVariantStore::new(NamespaceSelector::new(5_000, 3_000))
}

fn clustered(start: u64) -> ClusteredVariant {
    ClusteredVariant::new("GCA_000000001.1", 60711, "chr1", start, VariantType::Snv)
}

fn submitted(accession: u64, start: u64, rs: Option<u64>) -> SubmittedVariantEntity {
    let variant = SubmittedVariant {
        assembly_accession: "GCA_000000001.1".to_string(),
        taxonomy_accession: 60711,
        project_accession: "PRJEB1".to_string(),
        contig: "chr1".to_string(),
        start,
        reference_allele: "A".to_string(),
        alternate_allele: "T".to_string(),
        clustered_variant_accession: rs,
        remapped_from: None,
        validated: false,
    };
    SubmittedVariantEntity::new(accession, variant, Utc::now())
}

#[rstest]
fn test_racing_workers_share_one_accession(store: InMemoryVariantStore) {
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.resolve_or_create(&[clustered(42)]).unwrap()[0].accession)
        })
        .collect();

    let accessions: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(accessions.iter().all(|acc| *acc == accessions[0]));
    assert_eq!(store.clustered_variants(Namespace::Active).unwrap().len(), 1);
}

#[rstest]
fn test_lookup_of_unknown_accession(store: InMemoryVariantStore) {
    let result = store.lookup_by_accession(77);
    assert!(matches!(result, Err(StoreError::AccessionDoesNotExist(77))));
}

#[rstest]
fn test_lookup_of_merged_accession(store: InMemoryVariantStore) {
    let entity = ClusteredVariantEntity::new(3_001, clustered(10), Utc::now());
    store.insert_clustered_variants(vec![entity.clone()]).unwrap();

    store
        .update_clustered_accession(Namespace::Active, 3_001, 12)
        .unwrap();
    store
        .insert_clustered_operations(
            Namespace::Active,
            vec![ClusteredVariantOperation::merged(
                3_001,
                12,
                "merged".to_string(),
                &entity,
            )],
        )
        .unwrap();

    let result = store.lookup_all_loci(3_001);
    assert!(matches!(
        result,
        Err(StoreError::AccessionMerged {
            accession: 3_001,
            merged_into: 12
        })
    ));
    assert_eq!(store.lookup_by_accession(12).unwrap().hash, entity.hash);
}

#[rstest]
fn test_lookup_of_deprecated_accession(store: InMemoryVariantStore) {
    let entity = ClusteredVariantEntity::new(15, clustered(10), Utc::now());
    store.insert_clustered_variants(vec![entity]).unwrap();
    store.deprecate(15).unwrap();

    let err = store.lookup_by_accession(15).unwrap_err();
    assert!(matches!(err, StoreError::AccessionDeprecated(15)));
    assert!(err.is_stale_reference());
}

#[rstest]
fn test_all_loci_spans_both_namespaces(store: InMemoryVariantStore) {
    store
        .insert_clustered(
            Namespace::Legacy,
            vec![ClusteredVariantEntity::new(15, clustered(10), Utc::now())],
        )
        .unwrap();
    store
        .insert_clustered(
            Namespace::Active,
            vec![ClusteredVariantEntity::new(15, clustered(20), Utc::now())],
        )
        .unwrap();

    let loci = store.lookup_all_loci(15).unwrap();
    assert_eq!(loci.len(), 2);
}

#[rstest]
fn test_insert_rejects_duplicate_hash(store: InMemoryVariantStore) {
    let entity = ClusteredVariantEntity::new(15, clustered(10), Utc::now());
    store
        .insert_clustered(Namespace::Legacy, vec![entity.clone()])
        .unwrap();

    let result = store.insert_clustered(Namespace::Legacy, vec![entity]);
    assert!(matches!(
        result,
        Err(StoreError::DuplicateHash {
            namespace: Namespace::Legacy,
            ..
        })
    ));
}

#[rstest]
fn test_submitted_updates(store: InMemoryVariantStore) {
    let first = submitted(10, 100, Some(15));
    let second = submitted(11, 200, None);
    store
        .insert_submitted_variants(vec![first.clone(), second.clone()])
        .unwrap();

    let found = store
        .find_submitted_by_clustered_accession(Namespace::Legacy, 15, Some("GCA_000000001.1"))
        .unwrap();
    assert_eq!(found, vec![first.clone()]);
    assert!(store
        .find_submitted_by_clustered_accession(Namespace::Legacy, 15, Some("GCA_other"))
        .unwrap()
        .is_empty());

    let modified = store
        .update_submitted_clustered_accession(Namespace::Legacy, 15, 12)
        .unwrap();
    assert_eq!(modified, 1);

    let modified = store
        .bulk_update_submitted(
            Namespace::Legacy,
            vec![
                ClusteredAccessionUpdate {
                    hash: second.hash.clone(),
                    clustered_variant_accession: 12,
                },
                ClusteredAccessionUpdate {
                    hash: "not-stored".to_string(),
                    clustered_variant_accession: 12,
                },
            ],
        )
        .unwrap();
    assert_eq!(modified, vec![second.clone()]);

    let updated = store.find_submitted_by_hash(&second.hash).unwrap().unwrap();
    assert_eq!(updated.clustered_variant_accession(), Some(12));
}

#[rstest]
fn test_bulk_update_leaves_clustered_records_alone(store: InMemoryVariantStore) {
    let clustered = submitted(10, 100, Some(7));
    store.insert_submitted_variants(vec![clustered.clone()]).unwrap();

    let update = ClusteredAccessionUpdate {
        hash: clustered.hash.clone(),
        clustered_variant_accession: 3_000,
    };
    let modified = store
        .bulk_update_submitted(Namespace::Legacy, vec![update.clone(), update])
        .unwrap();

    assert!(modified.is_empty());
    let stored = store.find_submitted_by_hash(&clustered.hash).unwrap().unwrap();
    assert_eq!(stored.clustered_variant_accession(), Some(7));
}

#[rstest]
fn test_submitted_by_assembly_is_sorted(store: InMemoryVariantStore) {
    store
        .insert_submitted_variants(vec![
            submitted(6_000, 300, None),
            submitted(11, 200, None),
            submitted(10, 100, None),
        ])
        .unwrap();

    let accessions: Vec<u64> = store
        .submitted_variants_by_assembly("GCA_000000001.1")
        .unwrap()
        .iter()
        .map(|sve| sve.accession)
        .collect();
    assert_eq!(accessions, vec![10, 11, 6_000]);
    assert_eq!(store.submitted_variants(Namespace::Active).unwrap().len(), 1);
}
