//! Query peptide normalization.

/// Residue letters of the 20 standard amino acids
pub const STANDARD_RESIDUES: &str = "ACDEFGHIKLMNPQRSTVWY";

/// Canonicalize a caller-supplied peptide: trim surrounding whitespace and
/// uppercase. Returns `None` for empty or whitespace-only input.
#[must_use]
pub fn normalize_peptide(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// A sequence the matcher will consider: non-empty, ASCII letters only.
#[must_use]
pub fn is_matchable_sequence(sequence: &str) -> bool {
    !sequence.is_empty() && sequence.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Whether every residue is one of the 20 standard amino acids (case-insensitive)
#[must_use]
pub fn is_standard_peptide(sequence: &str) -> bool {
    !sequence.is_empty()
        && sequence
            .chars()
            .all(|c| STANDARD_RESIDUES.contains(c.to_ascii_uppercase()))
}
