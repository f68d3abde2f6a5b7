//! Fragment matching and result shaping.
//!
//! - [`MatchingEngine`]: finds reference fragments in query peptides
//! - [`ActivitySummary`]: per-activity counts over a batch of results
//!
//! ## Matching Algorithm
//!
//! Each query peptide is matched in two phases:
//!
//! 1. **Direct containment**: every reference fragment that occurs verbatim in
//!    the peptide is reported, in reference index order, without a position.
//! 2. **Window enumeration**: only when phase 1 found nothing, every window of
//!    2 to 9 residues (capped at the peptide length) is looked up by exact
//!    sequence. Windows are visited by increasing length, then increasing
//!    offset; hits carry a 1-based inclusive position.
//!
//! A peptide with no hits yields no records; that is not an error.
//!
//! ## Example
//!
//! ```rust,no_run
//! use biopep_annotator::catalog::source::{load_reference_index, DemoSource};
//! use biopep_annotator::matching::engine::MatchingEngine;
//!
//! let index = load_reference_index(&DemoSource).unwrap();
//! let engine = MatchingEngine::new(&index);
//!
//! for record in engine.analyze_batch(&["FFMPGF", "DFPFW"]) {
//!     println!("{} {} {}", record.original_peptide, record.active_fragment, record.activity);
//! }
//! ```
//!
//! [`MatchingEngine`]: engine::MatchingEngine
//! [`ActivitySummary`]: report::ActivitySummary

pub mod engine;
pub mod report;
