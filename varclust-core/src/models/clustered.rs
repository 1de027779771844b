use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Accession, VariantType};
use crate::hashing::clustered_variant_hash;

///
/// Identity of a clustered variant (RS): a locus and a variant class in one
/// assembly. Only the fields that go into [`clustered_variant_hash`] define
/// identity; `validated` and `map_weight` are attributes.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteredVariant {
    pub assembly_accession: String,
    pub taxonomy_accession: u32,
    pub contig: String,
    pub start: u64,
    #[serde(rename = "type")]
    pub variant_type: VariantType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated: Option<bool>,
    /// Number of loci the RS maps to in this assembly. Set by the mapping
    /// process, never written by clustering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_weight: Option<u32>,
}

impl ClusteredVariant {
    pub fn new(
        assembly_accession: &str,
        taxonomy_accession: u32,
        contig: &str,
        start: u64,
        variant_type: VariantType,
    ) -> Self {
        ClusteredVariant {
            assembly_accession: assembly_accession.to_string(),
            taxonomy_accession,
            contig: contig.to_string(),
            start,
            variant_type,
            validated: None,
            map_weight: None,
        }
    }

    pub fn with_map_weight(mut self, map_weight: u32) -> Self {
        self.map_weight = Some(map_weight);
        self
    }
}

///
/// A clustered variant as stored: one document per (accession, hash). An
/// accession owns several documents when it is mapped to more than one
/// assembly, or when remapping gave it a second locus.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteredVariantEntity {
    pub accession: Accession,
    pub hash: String,
    #[serde(flatten)]
    pub variant: ClusteredVariant,
    pub created_date: DateTime<Utc>,
}

impl ClusteredVariantEntity {
    /// Build an entity, deriving its hash from the variant.
    pub fn new(accession: Accession, variant: ClusteredVariant, created_date: DateTime<Utc>) -> Self {
        let hash = clustered_variant_hash(&variant);
        ClusteredVariantEntity {
            accession,
            hash,
            variant,
            created_date,
        }
    }

    pub fn map_weight(&self) -> Option<u32> {
        self.variant.map_weight
    }
}
