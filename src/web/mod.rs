//! HTTP JSON service for peptide annotation.
//!
//! The service holds one [`ReferenceIndex`](crate::catalog::store::ReferenceIndex)
//! in shared state and answers independent requests against it. If the
//! reference file cannot be read at startup the service still starts with an
//! empty index; analysis then returns empty lists.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 5000 with a local reference file
//! biopep-annotator serve --references biopep.fasta
//!
//! # Embedded demo references, bind to all interfaces
//! biopep-annotator serve --demo --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /health` - Liveness probe, returns `ok`
//! - `GET /api/activities` - Activity catalog as a JSON array
//! - `GET /api/references` - Entry count, fingerprint and source of the index
//! - `POST /api/analyze` - `{"sequences": [..], "activities": [..]}` to annotation records
//! - `POST /api/summary` - Same body, per-activity counts
//! - `POST /api/upload` - Multipart `file` (CSV, TSV, TXT, FASTA) or pasted `text`
//!   to `{"sequences": [..], "format": ".."}`

pub mod server;
