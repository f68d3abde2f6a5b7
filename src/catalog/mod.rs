//! Reference data loading and indexing.
//!
//! Reference data is a BIOPEP-style headered-record file: each record is a
//! `>marker|id|activity` header followed by the fragment sequence. It is loaded
//! once through a [`ReferenceSource`] backend into an immutable
//! [`ReferenceIndex`] that callers pass to the matcher explicitly.
//!
//! ## Backends
//!
//! - [`FileSource`]: a file on disk, plain or gzip-compressed
//! - [`TextSource`]: headered-record text already in memory
//! - [`DemoSource`]: a small reference set embedded in the binary
//!
//! ## Example
//!
//! ```rust,no_run
//! use biopep_annotator::catalog::source::{load_or_empty, load_reference_index, FileSource};
//!
//! // Abort if the file is missing
//! let index = load_reference_index(&FileSource::new("biopep.fasta")).unwrap();
//!
//! // Or carry on with an empty index
//! let index = load_or_empty(&FileSource::new("biopep.fasta"));
//! println!("{} entries", index.len());
//! ```
//!
//! [`ReferenceSource`]: source::ReferenceSource
//! [`ReferenceIndex`]: store::ReferenceIndex
//! [`FileSource`]: source::FileSource
//! [`TextSource`]: source::TextSource
//! [`DemoSource`]: source::DemoSource

pub mod source;
pub mod store;
