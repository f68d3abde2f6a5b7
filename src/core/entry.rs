use serde::{Deserialize, Serialize};

use crate::core::peptide::is_matchable_sequence;

/// A known bioactive fragment from the reference database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Source identifier (second header field, may be empty)
    pub id: String,

    /// Biological activity label (third header field, may be empty)
    pub activity: String,

    /// Fragment sequence, uppercase
    pub sequence: String,
}

impl ReferenceEntry {
    pub fn new(
        id: impl Into<String>,
        activity: impl Into<String>,
        sequence: impl AsRef<str>,
    ) -> Self {
        Self {
            id: id.into(),
            activity: activity.into(),
            sequence: sequence.as_ref().to_ascii_uppercase(),
        }
    }

    /// Build an entry from a header line and its accumulated sequence.
    ///
    /// The header is split on `|` as `marker | id | activity`. Absent fields
    /// default to the empty string; fields past the third are ignored.
    pub fn from_header(header: &str, sequence: &str) -> Self {
        let mut fields = header.split('|').skip(1).map(str::trim);
        let id = fields.next().unwrap_or_default();
        let activity = fields.next().unwrap_or_default();
        Self::new(id, activity, sequence)
    }

    /// Number of residues in the fragment
    #[must_use]
    pub fn residue_count(&self) -> usize {
        self.sequence.chars().count()
    }

    /// Whether the matcher can use this entry.
    ///
    /// Entries whose sequence picked up non-letter characters (digits, spaces,
    /// punctuation from malformed continuation lines) stay in the index but
    /// never match.
    #[must_use]
    pub fn is_matchable(&self) -> bool {
        is_matchable_sequence(&self.sequence)
    }

    #[must_use]
    pub fn has_activity(&self) -> bool {
        !self.activity.is_empty()
    }
}
