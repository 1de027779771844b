use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Accession, ClusteredVariant, VariantType};
use crate::errors::VariantError;
use crate::hashing::submitted_variant_hash;

///
/// A variant as reported by a study (SS). The clustered accession is the only
/// field clustering ever changes.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedVariant {
    pub assembly_accession: String,
    pub taxonomy_accession: u32,
    pub project_accession: String,
    pub contig: String,
    pub start: u64,
    pub reference_allele: String,
    pub alternate_allele: String,
    #[serde(default, rename = "rs", skip_serializing_if = "Option::is_none")]
    pub clustered_variant_accession: Option<Accession>,
    /// Source assembly when this record was produced by remapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remapped_from: Option<String>,
    #[serde(default)]
    pub validated: bool,
}

impl SubmittedVariant {
    pub fn is_clustered(&self) -> bool {
        self.clustered_variant_accession.is_some()
    }

    pub fn is_remapped(&self) -> bool {
        self.remapped_from
            .as_deref()
            .is_some_and(|source| !source.trim().is_empty())
    }

    ///
    /// Project this submitted variant onto the RS identity it belongs to.
    ///
    /// # Returns
    /// * the clustered variant, or an error when the alleles can't be classified
    ///
    pub fn to_clustered_variant(&self) -> Result<ClusteredVariant, VariantError> {
        let variant_type = VariantType::classify(&self.reference_allele, &self.alternate_allele)?;
        Ok(ClusteredVariant {
            assembly_accession: self.assembly_accession.clone(),
            taxonomy_accession: self.taxonomy_accession,
            contig: self.contig.clone(),
            start: self.start,
            variant_type,
            validated: Some(self.validated),
            map_weight: None,
        })
    }
}

///
/// A submitted variant as stored. `hash` is the document id and never changes.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedVariantEntity {
    pub accession: Accession,
    pub hash: String,
    #[serde(flatten)]
    pub variant: SubmittedVariant,
    pub created_date: DateTime<Utc>,
}

impl SubmittedVariantEntity {
    pub fn new(accession: Accession, variant: SubmittedVariant, created_date: DateTime<Utc>) -> Self {
        let hash = submitted_variant_hash(&variant);
        SubmittedVariantEntity {
            accession,
            hash,
            variant,
            created_date,
        }
    }

    pub fn clustered_variant_accession(&self) -> Option<Accession> {
        self.variant.clustered_variant_accession
    }

    pub fn is_clustered(&self) -> bool {
        self.variant.is_clustered()
    }

    pub fn is_remapped(&self) -> bool {
        self.variant.is_remapped()
    }

    pub fn assembly_accession(&self) -> &str {
        &self.variant.assembly_accession
    }

    pub fn to_clustered_variant(&self) -> Result<ClusteredVariant, VariantError> {
        self.variant.to_clustered_variant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn submitted() -> SubmittedVariant {
        SubmittedVariant {
            assembly_accession: "GCA_000000001.1".to_string(),
            taxonomy_accession: 60711,
            project_accession: "PRJ1".to_string(),
            contig: "chr1".to_string(),
            start: 1000,
            reference_allele: "A".to_string(),
            alternate_allele: "T".to_string(),
            clustered_variant_accession: None,
            remapped_from: None,
            validated: false,
        }
    }

    #[rstest]
    fn test_blank_remapped_from_is_not_remapped(mut submitted: SubmittedVariant) {
        assert!(!submitted.is_remapped());
        submitted.remapped_from = Some("  ".to_string());
        assert!(!submitted.is_remapped());
        submitted.remapped_from = Some("GCA_000000002.1".to_string());
        assert!(submitted.is_remapped());
    }

    #[rstest]
    fn test_clustered_variant_keeps_locus_and_type(submitted: SubmittedVariant) {
        let clustered = submitted.to_clustered_variant().unwrap();
        assert_eq!(clustered.assembly_accession, "GCA_000000001.1");
        assert_eq!(clustered.contig, "chr1");
        assert_eq!(clustered.start, 1000);
        assert_eq!(clustered.variant_type, VariantType::Snv);
        assert_eq!(clustered.map_weight, None);
    }

    #[rstest]
    fn test_entity_json_uses_rs_field(mut submitted: SubmittedVariant) {
        submitted.clustered_variant_accession = Some(3_000_000_001);
        let entity = SubmittedVariantEntity::new(5_000_000_001, submitted, Utc::now());
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["rs"], 3_000_000_001u64);
        assert_eq!(json["accession"], 5_000_000_001u64);

        let back: SubmittedVariantEntity = serde_json::from_value(json).unwrap();
        assert_eq!(back, entity);
    }
}
