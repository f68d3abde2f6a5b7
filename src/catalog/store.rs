use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::core::entry::ReferenceEntry;

/// The in-memory reference index.
///
/// Entries keep file order. Duplicate sequences are all retained; each is a
/// separate activity or source record and each is matchable.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    /// All reference entries in load order
    entries: Vec<ReferenceEntry>,

    /// Index: uppercase sequence -> indices of matchable entries, ascending
    sequence_to_entries: HashMap<String, Vec<usize>>,

    /// Longest matchable fragment, in residues
    longest_fragment: usize,
}

impl ReferenceIndex {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from entries, preserving their order
    pub fn from_entries(entries: impl IntoIterator<Item = ReferenceEntry>) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index.add_entry(entry);
        }

        let skipped = index.entries.len() - index.matchable_count();
        if skipped > 0 {
            debug!("{skipped} reference entries have malformed sequences and will not match");
        }
        index
    }

    fn add_entry(&mut self, entry: ReferenceEntry) {
        let idx = self.entries.len();

        if entry.is_matchable() {
            self.longest_fragment = self.longest_fragment.max(entry.residue_count());
            self.sequence_to_entries
                .entry(entry.sequence.clone())
                .or_default()
                .push(idx);
        }

        self.entries.push(entry);
    }

    /// All entries in load order
    #[must_use]
    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReferenceEntry> {
        self.entries.iter()
    }

    /// Matchable entries in load order
    pub fn matchable(&self) -> impl Iterator<Item = &ReferenceEntry> {
        self.entries.iter().filter(|e| e.is_matchable())
    }

    fn matchable_count(&self) -> usize {
        self.sequence_to_entries.values().map(Vec::len).sum()
    }

    /// Entries whose sequence equals `sequence` exactly (uppercase), in load order
    pub fn lookup_sequence<'a>(
        &'a self,
        sequence: &str,
    ) -> impl Iterator<Item = &'a ReferenceEntry> + 'a {
        self.sequence_to_entries
            .get(sequence)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.entries[idx])
    }

    /// Length in residues of the longest matchable fragment
    #[must_use]
    pub fn longest_fragment(&self) -> usize {
        self.longest_fragment
    }

    /// Distinct non-empty activity labels, in order of first occurrence
    #[must_use]
    pub fn activities(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.entries
            .iter()
            .filter(|e| e.has_activity())
            .filter(|e| seen.insert(e.activity.as_str()))
            .map(|e| e.activity.clone())
            .collect()
    }

    /// MD5 fingerprint over all entries, for tagging annotation runs with
    /// the exact reference data they used
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut context = md5::Context::new();
        for entry in &self.entries {
            context.consume(entry.id.as_bytes());
            context.consume(b"|");
            context.consume(entry.activity.as_bytes());
            context.consume(b"|");
            context.consume(entry.sequence.as_bytes());
            context.consume(b"\n");
        }
        format!("{:x}", context.compute())
    }

    /// Number of entries in the index
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ReferenceIndex {
    type Item = &'a ReferenceEntry;
    type IntoIter = std::slice::Iter<'a, ReferenceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<ReferenceEntry> for ReferenceIndex {
    fn from_iter<T: IntoIterator<Item = ReferenceEntry>>(iter: T) -> Self {
        Self::from_entries(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, activity: &str, sequence: &str) -> ReferenceEntry {
        ReferenceEntry::new(id, activity, sequence)
    }

    #[test]
    fn test_preserves_order_and_duplicates() {
        let index = ReferenceIndex::from_entries(vec![
            entry("1", "ACE inhibitor", "PG"),
            entry("2", "antioxidant", "FW"),
            entry("3", "antithrombotic", "PG"),
        ]);

        assert_eq!(index.len(), 3);
        let ids: Vec<&str> = index.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        let pg: Vec<&str> = index.lookup_sequence("PG").map(|e| e.id.as_str()).collect();
        assert_eq!(pg, vec!["1", "3"]);
    }

    #[test]
    fn test_lookup_missing_sequence() {
        let index = ReferenceIndex::from_entries(vec![entry("1", "a", "PG")]);
        assert_eq!(index.lookup_sequence("GP").count(), 0);
    }

    #[test]
    fn test_malformed_entry_retained_but_not_indexed() {
        let index = ReferenceIndex::from_entries(vec![
            entry("1", "a", "P G"),
            entry("2", "b", "GF"),
        ]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.matchable().count(), 1);
        assert_eq!(index.lookup_sequence("P G").count(), 0);
        assert_eq!(index.longest_fragment(), 2);
    }

    #[test]
    fn test_activities_dedup_and_exclude_empty() {
        let index = ReferenceIndex::from_entries(vec![
            entry("1", "ACE inhibitor", "PG"),
            entry("2", "ACE inhibitor", "GF"),
            entry("3", "", "FF"),
            entry("4", "antioxidant", "FW"),
        ]);

        assert_eq!(index.activities(), vec!["ACE inhibitor", "antioxidant"]);
    }

    #[test]
    fn test_fingerprint_stable_and_order_sensitive() {
        let a = ReferenceIndex::from_entries(vec![entry("1", "x", "PG"), entry("2", "y", "GF")]);
        let b = ReferenceIndex::from_entries(vec![entry("1", "x", "PG"), entry("2", "y", "GF")]);
        let c = ReferenceIndex::from_entries(vec![entry("2", "y", "GF"), entry("1", "x", "PG")]);

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 32);
    }

    #[test]
    fn test_empty_index() {
        let index = ReferenceIndex::new();
        assert!(index.is_empty());
        assert!(index.activities().is_empty());
        assert_eq!(index.longest_fragment(), 0);
    }
}
