use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Accession, ClusteredVariantEntity, SubmittedVariantEntity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// The accession was retired in favour of `merge_into`.
    Merged,
    /// A field of the record changed (for clustering, the `rs` field).
    Updated,
    /// The RS now describes more than one locus and needs to be split by hand.
    RsSplitCandidate,
}

///
/// Audit record of a change to an accessioned object. `inactive_objects`
/// holds owned copies of the affected objects taken before the change, so a
/// later mutation of the live records can't leak into the history.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessionOperation<T> {
    pub event_type: EventType,
    pub accession: Accession,
    #[serde(default)]
    pub merge_into: Option<Accession>,
    pub reason: String,
    pub inactive_objects: Vec<T>,
    pub created_date: DateTime<Utc>,
}

pub type SubmittedVariantOperation = AccessionOperation<SubmittedVariantEntity>;
pub type ClusteredVariantOperation = AccessionOperation<ClusteredVariantEntity>;

impl<T: Clone> AccessionOperation<T> {
    /// `original` retired into `merge_into`.
    pub fn merged(accession: Accession, merge_into: Accession, reason: String, original: &T) -> Self {
        AccessionOperation {
            event_type: EventType::Merged,
            accession,
            merge_into: Some(merge_into),
            reason,
            inactive_objects: vec![original.clone()],
            created_date: Utc::now(),
        }
    }

    /// A field of `original` was rewritten. There is no destination accession.
    pub fn updated(accession: Accession, reason: String, original: &T) -> Self {
        AccessionOperation {
            event_type: EventType::Updated,
            accession,
            merge_into: None,
            reason,
            inactive_objects: vec![original.clone()],
            created_date: Utc::now(),
        }
    }

    pub fn split_candidate(accession: Accession, reason: String, affected: Vec<T>) -> Self {
        AccessionOperation {
            event_type: EventType::RsSplitCandidate,
            accession,
            merge_into: Some(accession),
            reason,
            inactive_objects: affected,
            created_date: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClusteredVariant, VariantType};

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_snapshot_is_detached_from_the_live_record() {
        let variant = ClusteredVariant::new("GCA_1", 9606, "chr1", 100, VariantType::Snv);
        let mut live = ClusteredVariantEntity::new(30, variant, Utc::now());

        let operation = ClusteredVariantOperation::merged(30, 10, "merged".to_string(), &live);
        live.accession = 10;

        assert_eq!(operation.inactive_objects[0].accession, 30);
        assert_eq!(operation.merge_into, Some(10));
        assert_eq!(operation.event_type, EventType::Merged);
    }

    #[rstest]
    fn test_event_type_wire_names() {
        let json = serde_json::to_string(&EventType::RsSplitCandidate).unwrap();
        assert_eq!(json, "\"RS_SPLIT_CANDIDATE\"");
    }
}
