use fxhash::FxHashMap;

use varclust_core::Accession;

///
/// Batch-scoped map from clustered hash to the accession clustering should
/// use for it. Built fresh for every batch and handed down explicitly.
///
/// It also remembers which accessions were retired by merges in this batch,
/// so no entry ever points at a retired accession.
///
#[derive(Debug, Default)]
pub struct AssignedAccessions {
    by_hash: FxHashMap<String, Accession>,
    merged_into: FxHashMap<Accession, Accession>,
}

impl AssignedAccessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hash: String, accession: Accession) {
        let accession = self.survivor(accession);
        self.by_hash.insert(hash, accession);
    }

    pub fn get(&self, hash: &str) -> Option<Accession> {
        self.by_hash.get(hash).copied()
    }

    ///
    /// Record that `from` was merged into `to` and repoint every entry that
    /// referenced `from`.
    ///
    pub fn redirect(&mut self, from: Accession, to: Accession) {
        let to = self.survivor(to);
        if from == to {
            return;
        }
        for accession in self.by_hash.values_mut() {
            if *accession == from {
                *accession = to;
            }
        }
        self.merged_into.insert(from, to);
    }

    /// Follow merges made in this batch until an accession that is still alive.
    pub fn survivor(&self, accession: Accession) -> Accession {
        let mut current = accession;
        // merges always move to a higher priority accession, so the chain ends
        while let Some(next) = self.merged_into.get(&current) {
            current = *next;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_redirect_repoints_all_entries() {
        let mut assigned = AssignedAccessions::new();
        assigned.insert("h1".to_string(), 30);
        assigned.insert("h2".to_string(), 30);
        assigned.insert("h3".to_string(), 40);

        assigned.redirect(30, 10);

        assert_eq!(assigned.get("h1"), Some(10));
        assert_eq!(assigned.get("h2"), Some(10));
        assert_eq!(assigned.get("h3"), Some(40));
        assert_eq!(assigned.get("h4"), None);
    }

    #[rstest]
    fn test_survivor_follows_chained_merges() {
        let mut assigned = AssignedAccessions::new();
        assigned.redirect(30, 20);
        assigned.redirect(20, 10);

        assert_eq!(assigned.survivor(30), 10);
        assert_eq!(assigned.survivor(10), 10);

        assigned.insert("late".to_string(), 30);
        assert_eq!(assigned.get("late"), Some(10));
    }

    #[rstest]
    fn test_self_redirect_is_ignored() {
        let mut assigned = AssignedAccessions::new();
        assigned.insert("h1".to_string(), 10);
        assigned.redirect(10, 10);
        assert_eq!(assigned.survivor(10), 10);
        assert_eq!(assigned.get("h1"), Some(10));
    }
}
