use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Counters of every state transition made while clustering.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusteringCounts {
    pub clustered_variants_created: u64,
    /// Clustered documents whose accession was rewritten by a merge.
    pub clustered_variants_updated: u64,
    pub clustered_variants_merge_operations_written: u64,
    /// Submitted variants newly recorded as split candidate snapshots.
    pub clustered_variants_rs_split: u64,
    pub clustered_variants_created_from_remapping: u64,
    pub remapped_hash_collisions_flagged: u64,
    pub submitted_variants_clustered: u64,
    /// Submitted variants moved to the surviving RS of a merge.
    pub submitted_variants_updated_rs: u64,
    pub submitted_variants_update_operations_written: u64,
    pub submitted_variants_kept_unclustered: u64,
}

impl AddAssign<&ClusteringCounts> for ClusteringCounts {
    fn add_assign(&mut self, other: &ClusteringCounts) {
        self.clustered_variants_created += other.clustered_variants_created;
        self.clustered_variants_updated += other.clustered_variants_updated;
        self.clustered_variants_merge_operations_written +=
            other.clustered_variants_merge_operations_written;
        self.clustered_variants_rs_split += other.clustered_variants_rs_split;
        self.clustered_variants_created_from_remapping +=
            other.clustered_variants_created_from_remapping;
        self.remapped_hash_collisions_flagged += other.remapped_hash_collisions_flagged;
        self.submitted_variants_clustered += other.submitted_variants_clustered;
        self.submitted_variants_updated_rs += other.submitted_variants_updated_rs;
        self.submitted_variants_update_operations_written +=
            other.submitted_variants_update_operations_written;
        self.submitted_variants_kept_unclustered += other.submitted_variants_kept_unclustered;
    }
}

impl Add for ClusteringCounts {
    type Output = ClusteringCounts;

    fn add(mut self, other: ClusteringCounts) -> ClusteringCounts {
        self += &other;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_counts_add_up() {
        let first = ClusteringCounts {
            clustered_variants_created: 2,
            submitted_variants_clustered: 3,
            ..Default::default()
        };
        let second = ClusteringCounts {
            clustered_variants_created: 1,
            submitted_variants_kept_unclustered: 4,
            ..Default::default()
        };

        let total = first + second;
        assert_eq!(total.clustered_variants_created, 3);
        assert_eq!(total.submitted_variants_clustered, 3);
        assert_eq!(total.submitted_variants_kept_unclustered, 4);
    }
}
