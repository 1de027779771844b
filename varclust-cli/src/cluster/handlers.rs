use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use varclust_core::SubmittedVariantEntity;
use varclust_core::hashing::submitted_variant_hash;
use varclust_engine::{ClusteringConfig, ClusteringCounts, ClusteringEngine};
use varclust_store::InMemoryVariantStore;

///
/// Read submitted variants from a JSON lines file. Blank lines are skipped.
///
/// The hash of every record is recomputed from its fields, so a stale or
/// hand-written hash can't create a duplicate document.
///
pub fn read_submitted_variants(path: &Path) -> Result<Vec<SubmittedVariantEntity>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut variants = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut entity: SubmittedVariantEntity = serde_json::from_str(&line)
            .with_context(|| format!("Invalid submitted variant on line {}", index + 1))?;

        let hash = submitted_variant_hash(&entity.variant);
        if entity.hash != hash {
            warn!(accession = entity.accession, line = index + 1, "replacing mismatching submitted variant hash");
            entity.hash = hash;
        }
        variants.push(entity);
    }
    Ok(variants)
}

///
/// Cluster `variants` in batches of the configured chunk size.
///
/// Each batch is re-read from the store before it is processed, since merges
/// in earlier batches may have changed the RS of later records.
///
pub fn cluster_variants(
    store: &InMemoryVariantStore,
    config: &ClusteringConfig,
    variants: &[SubmittedVariantEntity],
) -> Result<ClusteringCounts> {
    let bar = ProgressBar::new(variants.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?
            .progress_chars("##-"),
    );

    let mut engine = ClusteringEngine::new(store, store, config);
    for chunk in variants.chunks(config.clustering.chunk_size) {
        let mut batch = Vec::with_capacity(chunk.len());
        for entity in chunk {
            let current = store.find_submitted_by_hash(&entity.hash)?;
            batch.push(current.unwrap_or_else(|| entity.clone()));
        }
        engine.process_batch(&batch)?;
        bar.inc(chunk.len() as u64);
    }
    bar.finish_and_clear();

    Ok(engine.counts().clone())
}

pub fn run_cluster(matches: &ArgMatches) -> Result<()> {
    let store_path = matches
        .get_one::<String>("store")
        .context("--store is required")?;
    let input = matches.get_one::<String>("input");
    let assembly = matches.get_one::<String>("assembly");
    let output = matches
        .get_one::<String>("output")
        .unwrap_or(store_path);

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => ClusteringConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load config file: {}", path))?,
        None => ClusteringConfig::default(),
    };
    if let Some(chunk_size) = matches.get_one::<usize>("chunk-size") {
        config.clustering.chunk_size = *chunk_size;
    }
    config.validate()?;

    let store = InMemoryVariantStore::load_or_new(store_path, config.selector())
        .with_context(|| format!("Failed to load store snapshot: {}", store_path))?;

    // the snapshot decides which namespace an accession lives in
    let selector = store.selector();
    config.accessioning.submitted_monotonic_init = selector.submitted_monotonic_init;
    config.accessioning.clustered_monotonic_init = selector.clustered_monotonic_init;

    let variants = match input {
        Some(path) => {
            let mut variants = read_submitted_variants(Path::new(path))?;
            if let Some(assembly) = assembly {
                variants.retain(|sve| sve.assembly_accession() == assembly);
            }

            let mut new_records = Vec::new();
            for entity in &variants {
                if store.find_submitted_by_hash(&entity.hash)?.is_none() {
                    new_records.push(entity.clone());
                }
            }
            info!(read = variants.len(), new = new_records.len(), "loaded submitted variants");
            store.insert_submitted_variants(new_records)?;
            variants
        }
        None => {
            let assembly = assembly.context("Either --input or --assembly is required")?;
            let variants = store.submitted_variants_by_assembly(assembly)?;
            info!(assembly = assembly.as_str(), count = variants.len(), "clustering from store");
            variants
        }
    };

    let counts = cluster_variants(&store, &config, &variants)?;
    info!(
        created = counts.clustered_variants_created,
        merged = counts.clustered_variants_merge_operations_written,
        split = counts.clustered_variants_rs_split,
        clustered = counts.submitted_variants_clustered,
        kept_unclustered = counts.submitted_variants_kept_unclustered,
        "clustering finished"
    );

    let json = serde_json::to_string_pretty(&counts)
        .context("Failed to serialize clustering counts to JSON")?;
    println!("{}", json);

    store
        .save(output)
        .with_context(|| format!("Failed to write store snapshot: {}", output))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::cli::create_cluster_cli;

    use std::io::Write;

    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use tempfile::{TempDir, tempdir};

    use varclust_core::{Namespace, SubmittedVariant};

    fn submitted(accession: u64, start: u64, alternate: &str) -> SubmittedVariantEntity {
        let variant = SubmittedVariant {
            assembly_accession: "GCA_000000001.1".to_string(),
            taxonomy_accession: 60711,
            project_accession: "PRJEB1".to_string(),
            contig: "chr1".to_string(),
            start,
            reference_allele: "A".to_string(),
            alternate_allele: alternate.to_string(),
            clustered_variant_accession: None,
            remapped_from: None,
            validated: false,
        };
        SubmittedVariantEntity::new(accession, variant, Utc::now())
    }

    #[fixture]
    fn workdir() -> TempDir {
        let dir = tempdir().unwrap();
        let mut file = File::create(dir.path().join("variants.jsonl")).unwrap();
        for entity in [
            submitted(5_000_000_001, 1000, "T"),
            submitted(5_000_000_002, 1000, "G"),
            submitted(5_000_000_003, 2000, "T"),
        ] {
            writeln!(file, "{}", serde_json::to_string(&entity).unwrap()).unwrap();
        }
        writeln!(file).unwrap();
        dir
    }

    #[rstest]
    fn test_read_submitted_variants(workdir: TempDir) {
        let variants = read_submitted_variants(&workdir.path().join("variants.jsonl")).unwrap();
        assert_eq!(variants.len(), 3);
        assert_eq!(variants[2].variant.start, 2000);
    }

    #[rstest]
    fn test_run_cluster_writes_snapshot(workdir: TempDir) {
        let store_path = workdir.path().join("store.json");
        let input_path = workdir.path().join("variants.jsonl");

        let matches = create_cluster_cli()
            .try_get_matches_from([
                "cluster",
                "--store",
                store_path.to_str().unwrap(),
                "--input",
                input_path.to_str().unwrap(),
                "--chunk-size",
                "2",
            ])
            .unwrap();
        run_cluster(&matches).unwrap();

        let store = InMemoryVariantStore::load(&store_path).unwrap();
        let clustered = store.clustered_variants(Namespace::Active).unwrap();
        assert_eq!(clustered.len(), 2);

        let submitted = store.submitted_variants(Namespace::Active).unwrap();
        assert_eq!(submitted.len(), 3);
        assert!(submitted.iter().all(|sve| sve.is_clustered()));
    }

    #[rstest]
    fn test_cluster_from_store_needs_assembly(workdir: TempDir) {
        let store_path = workdir.path().join("store.json");
        let matches = create_cluster_cli()
            .try_get_matches_from(["cluster", "--store", store_path.to_str().unwrap()])
            .unwrap();

        assert!(run_cluster(&matches).is_err());
    }

    #[rstest]
    fn test_cluster_from_store(workdir: TempDir) {
        let store_path = workdir.path().join("store.json");
        let store = InMemoryVariantStore::new(ClusteringConfig::default().selector());
        store
            .insert_submitted_variants(read_submitted_variants(&workdir.path().join("variants.jsonl")).unwrap())
            .unwrap();
        store.save(&store_path).unwrap();

        let matches = create_cluster_cli()
            .try_get_matches_from([
                "cluster",
                "--store",
                store_path.to_str().unwrap(),
                "--assembly",
                "GCA_000000001.1",
            ])
            .unwrap();
        run_cluster(&matches).unwrap();

        let store = InMemoryVariantStore::load(&store_path).unwrap();
        let operations = store.submitted_operations(Namespace::Active).unwrap();
        assert_eq!(operations.len(), 3);
    }
}
