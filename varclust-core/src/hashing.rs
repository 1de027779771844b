//! Content digests for variant identities.
//!
//! A variant identity is first rendered as a summary string (fields joined by
//! `_`), then digested with sha512t24u: SHA-512 truncated to 24 bytes and
//! encoded as base64url. Two identities are the same cluster iff their digests
//! are equal, so nothing that varies between runs (timestamps, map weight,
//! validation status) may enter the summary.

use sha2::{Digest, Sha512};

use crate::consts::{DIGEST_TRUNCATION_BYTES, SUMMARY_SEPARATOR};
use crate::models::{ClusteredVariant, SubmittedVariant};

/// Compute the sha512t24u digest of `input`.
///
/// # Arguments
///
/// * `input` - The input string to be processed, as a string slice or byte slice.
///
/// # Returns
///
/// A 32 character base64url string.
pub fn sha512t24u<T: AsRef<[u8]>>(input: T) -> String {
    let mut hasher = Sha512::new();
    for chunk in input.as_ref().chunks(1024) {
        hasher.update(chunk);
    }
    base64_url::encode(&hasher.finalize()[0..DIGEST_TRUNCATION_BYTES])
}

/// Summary of the RS identity: assembly, taxonomy, contig, start, type.
pub fn clustered_variant_summary(variant: &ClusteredVariant) -> String {
    let sep = SUMMARY_SEPARATOR;
    format!(
        "{}{sep}{}{sep}{}{sep}{}{sep}{}",
        variant.assembly_accession,
        variant.taxonomy_accession,
        variant.contig,
        variant.start,
        variant.variant_type,
    )
}

/// Summary of the SS identity: assembly, taxonomy, project, contig, start, ref, alt.
pub fn submitted_variant_summary(variant: &SubmittedVariant) -> String {
    let sep = SUMMARY_SEPARATOR;
    format!(
        "{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
        variant.assembly_accession,
        variant.taxonomy_accession,
        variant.project_accession,
        variant.contig,
        variant.start,
        variant.reference_allele,
        variant.alternate_allele,
    )
}

pub fn clustered_variant_hash(variant: &ClusteredVariant) -> String {
    sha512t24u(clustered_variant_summary(variant))
}

pub fn submitted_variant_hash(variant: &SubmittedVariant) -> String {
    sha512t24u(submitted_variant_summary(variant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DIGEST_LENGTH;
    use crate::models::VariantType;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn variant() -> ClusteredVariant {
        ClusteredVariant::new("GCA_000000001.1", 60711, "chr1", 1000, VariantType::Snv)
    }

    #[rstest]
    fn test_sha512t24u_known_value() {
        // GA4GH refget test vector
        assert_eq!(sha512t24u("ACGT"), "aKF498dAxcJAqme6QYQ7EZ07-fiw8Kw2");
    }

    #[rstest]
    fn test_summary_layout(variant: ClusteredVariant) {
        assert_eq!(clustered_variant_summary(&variant), "GCA_000000001.1_60711_chr1_1000_SNV");
    }

    #[rstest]
    fn test_hash_is_deterministic(variant: ClusteredVariant) {
        let first = clustered_variant_hash(&variant);
        let second = clustered_variant_hash(&variant.clone());
        assert_eq!(first, second);
        assert_eq!(first.len(), DIGEST_LENGTH);
    }

    #[rstest]
    fn test_attributes_do_not_change_identity(variant: ClusteredVariant) {
        let mut weighted = variant.clone().with_map_weight(3);
        weighted.validated = Some(true);
        assert_eq!(clustered_variant_hash(&variant), clustered_variant_hash(&weighted));
    }

    #[rstest]
    #[case("GCA_000000002.1", "chr1", 1000, VariantType::Snv)]
    #[case("GCA_000000001.1", "chr2", 1000, VariantType::Snv)]
    #[case("GCA_000000001.1", "chr1", 1001, VariantType::Snv)]
    #[case("GCA_000000001.1", "chr1", 1000, VariantType::Ins)]
    fn test_identity_fields_change_hash(
        variant: ClusteredVariant,
        #[case] assembly: &str,
        #[case] contig: &str,
        #[case] start: u64,
        #[case] variant_type: VariantType,
    ) {
        let other = ClusteredVariant::new(assembly, 60711, contig, start, variant_type);
        assert_ne!(clustered_variant_hash(&variant), clustered_variant_hash(&other));
    }
}
