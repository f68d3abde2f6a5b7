//! # biopep-annotator
//!
//! A library for finding known bioactive fragments inside peptide sequences.
//!
//! Peptides produced by simulated or experimental digestion are compared
//! against a BIOPEP-style reference list of short bioactive sequences. Each
//! reference record carries an identifier, an activity label (for example
//! "ACE inhibitor") and the fragment sequence itself.
//!
//! ## Matching
//!
//! For every query peptide, in order:
//!
//! 1. **Containment**: every matchable reference fragment that occurs
//!    verbatim in the peptide is reported, in reference order.
//! 2. **Enumeration**: only when nothing was contained, every window of 2 to
//!    9 residues is compared for equality against the reference fragments,
//!    and hits are reported with their 1-based position (`[3-5]`).
//!
//! Matching is case-insensitive on the query. Reference entries whose
//! sequence is empty or contains anything but letters stay loaded but are
//! never matched.
//!
//! ## Example
//!
//! ```rust
//! use biopep_annotator::{analyze_batch, ReferenceIndex, ReferenceSource, TextSource};
//!
//! let source = TextSource::new("inline", ">BIOPEP|8221|ACE inhibitor\nPG\n");
//! let index: ReferenceIndex = source.load().unwrap();
//!
//! let records = analyze_batch(&index, &["ffmpgf"]);
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].original_peptide, "FFMPGF");
//! assert_eq!(records[0].activity, "ACE inhibitor");
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Reference index and the sources it is loaded from
//! - [`core`]: Reference entries, annotation records and peptide helpers
//! - [`matching`]: Fragment matcher, activity filters and summaries
//! - [`parsing`]: Parsers for reference files and query uploads
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: HTTP JSON service

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use catalog::source::{
    load_or_empty, load_reference_index, DemoSource, FileSource, LoadError, ReferenceSource,
    TextSource,
};
pub use catalog::store::ReferenceIndex;
pub use core::annotation::{AnnotationRecord, FragmentPosition};
pub use core::entry::ReferenceEntry;
pub use matching::engine::{analyze_batch, MatchingConfig, MatchingEngine};
pub use matching::report::{filter_by_activities, list_activities, ActivitySummary};
