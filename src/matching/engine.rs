use tracing::debug;

use crate::catalog::store::ReferenceIndex;
use crate::core::annotation::{AnnotationRecord, FragmentPosition};
use crate::core::peptide::normalize_peptide;

/// Shortest window tried by the enumeration fallback
pub const DEFAULT_MIN_WINDOW: usize = 2;

/// Longest window tried by the enumeration fallback. References longer than
/// this can only be found by the direct-containment pass.
pub const DEFAULT_MAX_WINDOW: usize = 9;

/// Configuration for the matching engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchingConfig {
    /// Shortest enumerated window, in residues
    pub min_window: usize,
    /// Longest enumerated window, in residues
    pub max_window: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_window: DEFAULT_MIN_WINDOW,
            max_window: DEFAULT_MAX_WINDOW,
        }
    }
}

impl MatchingConfig {
    /// Config with a custom upper window bound
    #[must_use]
    pub fn with_max_window(max_window: usize) -> Self {
        Self {
            max_window,
            ..Self::default()
        }
    }
}

/// The fragment matcher.
///
/// For each query peptide it first reports every reference fragment contained
/// verbatim in the peptide. Only when there are none does it enumerate the
/// peptide's windows of `min_window..=max_window` residues and look each one
/// up by exact sequence.
pub struct MatchingEngine<'a> {
    index: &'a ReferenceIndex,
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a new matching engine with default configuration
    pub fn new(index: &'a ReferenceIndex) -> Self {
        Self::with_config(index, MatchingConfig::default())
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(index: &'a ReferenceIndex, config: MatchingConfig) -> Self {
        if index.longest_fragment() > config.max_window {
            debug!(
                "Reference fragments up to {} residues exceed the enumeration window of {}",
                index.longest_fragment(),
                config.max_window
            );
        }
        Self { index, config }
    }

    #[must_use]
    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Annotate a single query peptide.
    ///
    /// The query is trimmed and uppercased; an empty query yields no records.
    #[must_use]
    pub fn find_fragments(&self, query: &str) -> Vec<AnnotationRecord> {
        let Some(peptide) = normalize_peptide(query) else {
            return Vec::new();
        };

        let contained = self.find_contained(&peptide);
        if !contained.is_empty() {
            return contained;
        }

        self.find_enumerated(&peptide)
    }

    /// Annotate a batch of peptides; results keep query order
    #[must_use]
    pub fn analyze_batch<S: AsRef<str>>(&self, queries: &[S]) -> Vec<AnnotationRecord> {
        queries
            .iter()
            .flat_map(|q| self.find_fragments(q.as_ref()))
            .collect()
    }

    /// Phase 1: reference fragments contained in the peptide, index order
    fn find_contained(&self, peptide: &str) -> Vec<AnnotationRecord> {
        self.index
            .matchable()
            .filter(|entry| peptide.contains(entry.sequence.as_str()))
            .map(|entry| AnnotationRecord::contained(peptide, entry))
            .collect()
    }

    /// Phase 2: windows of the peptide equal to a reference fragment.
    ///
    /// Ordered by window length, then offset, then index order.
    fn find_enumerated(&self, peptide: &str) -> Vec<AnnotationRecord> {
        let residues: Vec<char> = peptide.chars().collect();
        let max_len = residues.len().min(self.config.max_window);
        let min_len = self.config.min_window.max(1);

        let mut records = Vec::new();
        for length in min_len..=max_len {
            for (offset, window) in residues.windows(length).enumerate() {
                let fragment: String = window.iter().collect();
                let position = FragmentPosition::from_window(offset, length);
                records.extend(
                    self.index
                        .lookup_sequence(&fragment)
                        .map(|entry| AnnotationRecord::enumerated(peptide, &fragment, entry, position)),
                );
            }
        }
        records
    }
}

/// Annotate a batch of peptides against an index with the default configuration
#[must_use]
pub fn analyze_batch<S: AsRef<str>>(index: &ReferenceIndex, queries: &[S]) -> Vec<AnnotationRecord> {
    MatchingEngine::new(index).analyze_batch(queries)
}
