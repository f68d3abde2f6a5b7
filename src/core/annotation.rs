use serde::{Serialize, Serializer};

use crate::core::entry::ReferenceEntry;

/// 1-based inclusive residue range of a fragment inside its query peptide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragmentPosition {
    pub start: usize,
    pub end: usize,
}

impl FragmentPosition {
    /// Build from a 0-based window offset and window length
    #[must_use]
    pub fn from_window(offset: usize, length: usize) -> Self {
        Self {
            start: offset + 1,
            end: offset + length,
        }
    }
}

impl std::fmt::Display for FragmentPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}-{}]", self.start, self.end)
    }
}

// Rendered as "[start-end]" to stay compatible with existing front ends
impl Serialize for FragmentPosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One bioactive fragment found in one query peptide
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    /// The normalized query peptide
    pub original_peptide: String,

    /// The fragment that matched
    pub active_fragment: String,

    /// Activity label of the matched reference entry
    pub activity: String,

    /// Identifier of the matched reference entry
    pub biopep_id: String,

    /// Only set for records found by window enumeration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<FragmentPosition>,
}

impl AnnotationRecord {
    /// A record for a reference fragment found verbatim in the peptide
    pub fn contained(peptide: &str, entry: &ReferenceEntry) -> Self {
        Self {
            original_peptide: peptide.to_string(),
            active_fragment: entry.sequence.clone(),
            activity: entry.activity.clone(),
            biopep_id: entry.id.clone(),
            position: None,
        }
    }

    /// A record for a window of the peptide that equals a reference fragment
    pub fn enumerated(
        peptide: &str,
        fragment: &str,
        entry: &ReferenceEntry,
        position: FragmentPosition,
    ) -> Self {
        Self {
            original_peptide: peptide.to_string(),
            active_fragment: fragment.to_string(),
            activity: entry.activity.clone(),
            biopep_id: entry.id.clone(),
            position: Some(position),
        }
    }
}
