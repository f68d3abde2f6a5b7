//! Shaping annotation results for collaborators: the activity catalog,
//! activity filters and per-activity summaries.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::catalog::store::ReferenceIndex;
use crate::core::annotation::AnnotationRecord;

/// Distinct non-empty activities in the index, in order of first occurrence
#[must_use]
pub fn list_activities(index: &ReferenceIndex) -> Vec<String> {
    index.activities()
}

/// Keep records whose activity is one of `selected`. An empty selection keeps
/// everything.
#[must_use]
pub fn filter_by_activities<S: AsRef<str>>(
    records: Vec<AnnotationRecord>,
    selected: &[S],
) -> Vec<AnnotationRecord> {
    if selected.is_empty() {
        return records;
    }

    let wanted: HashSet<&str> = selected.iter().map(AsRef::as_ref).collect();
    records
        .into_iter()
        .filter(|r| wanted.contains(r.activity.as_str()))
        .collect()
}

/// Number of fragments found for one activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityCount {
    pub activity: String,
    pub count: usize,
}

/// Aggregate view of a batch of annotation records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    /// Total records
    pub total_fragments: usize,
    /// Distinct annotated peptides
    pub unique_peptides: usize,
    /// Distinct non-empty activities
    pub unique_activities: usize,
    /// Records per activity, most frequent first
    pub activity_counts: Vec<ActivityCount>,
}

impl ActivitySummary {
    /// Summarize records. Records with an empty activity count toward the
    /// totals but not toward the per-activity breakdown. Ties keep the order
    /// in which activities first appear.
    #[must_use]
    pub fn from_records(records: &[AnnotationRecord]) -> Self {
        let unique_peptides = records
            .iter()
            .map(|r| r.original_peptide.as_str())
            .collect::<HashSet<_>>()
            .len();

        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in records.iter().filter(|r| !r.activity.is_empty()) {
            let count = counts.entry(record.activity.as_str()).or_insert_with(|| {
                order.push(record.activity.as_str());
                0
            });
            *count += 1;
        }

        let mut activity_counts: Vec<ActivityCount> = order
            .into_iter()
            .map(|activity| ActivityCount {
                activity: activity.to_string(),
                count: counts[activity],
            })
            .collect();
        // Stable sort keeps first-appearance order among equal counts
        activity_counts.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            total_fragments: records.len(),
            unique_peptides,
            unique_activities: activity_counts.len(),
            activity_counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::ReferenceEntry;

    fn record(peptide: &str, fragment: &str, activity: &str) -> AnnotationRecord {
        AnnotationRecord::contained(peptide, &ReferenceEntry::new("id", activity, fragment))
    }

    #[test]
    fn test_list_activities() {
        let index: ReferenceIndex = vec![
            ReferenceEntry::new("1", "ACE inhibitor", "PG"),
            ReferenceEntry::new("2", "ACE inhibitor", "GF"),
            ReferenceEntry::new("3", "", "FF"),
        ]
        .into_iter()
        .collect();

        assert_eq!(list_activities(&index), vec!["ACE inhibitor"]);
    }

    #[test]
    fn test_filter_by_activities() {
        let records = vec![
            record("FFMPGF", "FF", "ACE inhibitor"),
            record("FFMPGF", "GF", "dipeptidyl peptidase IV inhibitor"),
            record("DFPFW", "FW", "antioxidant"),
        ];

        let filtered = filter_by_activities(records.clone(), &["antioxidant", "ACE inhibitor"]);
        let fragments: Vec<&str> = filtered.iter().map(|r| r.active_fragment.as_str()).collect();
        assert_eq!(fragments, vec!["FF", "FW"]);

        let none: &[&str] = &[];
        assert_eq!(filter_by_activities(records.clone(), none), records);
    }

    #[test]
    fn test_summary_counts() {
        let records = vec![
            record("FFMPGF", "FF", "ACE inhibitor"),
            record("FFMPGF", "GF", "dipeptidyl peptidase IV inhibitor"),
            record("DFPFW", "FW", "antioxidant"),
            record("DFPFW", "DF", "ACE inhibitor"),
            record("SFGWF", "WF", "antioxidant"),
            record("SFGWF", "XX", ""),
        ];

        let summary = ActivitySummary::from_records(&records);
        assert_eq!(summary.total_fragments, 6);
        assert_eq!(summary.unique_peptides, 3);
        assert_eq!(summary.unique_activities, 3);
        assert_eq!(
            summary.activity_counts,
            vec![
                ActivityCount { activity: "ACE inhibitor".to_string(), count: 2 },
                ActivityCount { activity: "antioxidant".to_string(), count: 2 },
                ActivityCount {
                    activity: "dipeptidyl peptidase IV inhibitor".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_summary_empty() {
        let summary = ActivitySummary::from_records(&[]);
        assert_eq!(summary.total_fragments, 0);
        assert!(summary.activity_counts.is_empty());
    }
}
