//! Core data types for peptide annotation.
//!
//! - [`ReferenceEntry`]: a known bioactive fragment with its activity and source ID
//! - [`AnnotationRecord`]: one fragment found in one query peptide
//! - [`FragmentPosition`]: 1-based inclusive location of an enumerated fragment
//!
//! ## Sequences
//!
//! Reference fragments and query peptides are compared case-insensitively; both
//! are uppercased before matching. Lengths and positions count residues.
//!
//! [`ReferenceEntry`]: entry::ReferenceEntry
//! [`AnnotationRecord`]: annotation::AnnotationRecord
//! [`FragmentPosition`]: annotation::FragmentPosition

pub mod annotation;
pub mod entry;
pub mod peptide;
