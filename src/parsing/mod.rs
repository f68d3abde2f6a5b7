//! Parsers for reference data and query peptide files.
//!
//! This module provides parsers for:
//!
//! - **BIOPEP reference files**: headered records of `>marker|id|activity`
//!   followed by the fragment sequence
//! - **Query files**: CSV/TSV (first column), FASTA, or one peptide per line
//!
//! ## Example
//!
//! ```rust,no_run
//! use biopep_annotator::parsing::biopep::parse_reference_text;
//! use biopep_annotator::parsing::queries::{parse_query_text, QueryFormat};
//!
//! let entries = parse_reference_text(">BIOPEP|8221|ACE inhibitor\nPG\n");
//! let queries = parse_query_text("Peptide\nFFMPGF\n", QueryFormat::Csv).unwrap();
//! ```
//!
//! ## Reference Header Fields
//!
//! | Field | Description | Required |
//! |-------|-------------|----------|
//! | 1     | Record marker (`>BIOPEP`) | Yes |
//! | 2     | Reference ID | No (defaults to "") |
//! | 3     | Activity | No (defaults to "") |

pub mod biopep;
pub mod queries;
