//! Swappable backends that produce a [`ReferenceIndex`].

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::store::ReferenceIndex;
use crate::parsing::biopep::{parse_reference_reader, parse_reference_text};
use crate::utils::validation::is_gzipped;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Reference source unavailable: {path}: {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Something that can produce a reference index
pub trait ReferenceSource {
    /// Short description for logs and reports
    fn describe(&self) -> String;

    /// Load and index the reference entries
    ///
    /// # Errors
    ///
    /// Returns `LoadError::SourceUnavailable` if the backing data cannot be read.
    fn load(&self) -> Result<ReferenceIndex, LoadError>;
}

/// Reference entries read from a headered-record file, plain or gzip-compressed
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, source: std::io::Error) -> LoadError {
        LoadError::SourceUnavailable {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl ReferenceSource for FileSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn load(&self) -> Result<ReferenceIndex, LoadError> {
        let file = File::open(&self.path).map_err(|e| self.unavailable(e))?;

        let entries = if is_gzipped(&self.path) {
            parse_reference_reader(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            parse_reference_reader(BufReader::new(file))
        }
        .map_err(|e| self.unavailable(e))?;

        Ok(ReferenceIndex::from_entries(entries))
    }
}

/// Reference entries held in memory as headered-record text
#[derive(Debug, Clone)]
pub struct TextSource {
    label: String,
    text: String,
}

impl TextSource {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

impl ReferenceSource for TextSource {
    fn describe(&self) -> String {
        format!("text:{}", self.label)
    }

    fn load(&self) -> Result<ReferenceIndex, LoadError> {
        Ok(ReferenceIndex::from_entries(parse_reference_text(&self.text)))
    }
}

/// Small fixed reference set compiled into the binary, for demos and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSource;

impl DemoSource {
    /// Embedded at compile time; validated by build.rs
    pub const TEXT: &'static str = include_str!("../../catalogs/demo_biopep.fasta");
}

impl ReferenceSource for DemoSource {
    fn describe(&self) -> String {
        "embedded demo references".to_string()
    }

    fn load(&self) -> Result<ReferenceIndex, LoadError> {
        Ok(ReferenceIndex::from_entries(parse_reference_text(
            Self::TEXT,
        )))
    }
}

/// Load the reference index from a source
///
/// # Errors
///
/// Returns `LoadError::SourceUnavailable` if the source cannot be read.
pub fn load_reference_index(source: &dyn ReferenceSource) -> Result<ReferenceIndex, LoadError> {
    let index = source.load()?;
    info!(
        "Loaded {} reference entries ({} activities) from {}",
        index.len(),
        index.activities().len(),
        source.describe()
    );
    Ok(index)
}

/// Load the reference index, falling back to an empty index when the source
/// is unavailable. Analysis against an empty index returns empty results.
pub fn load_or_empty(source: &dyn ReferenceSource) -> ReferenceIndex {
    match load_reference_index(source) {
        Ok(index) => index,
        Err(e) => {
            warn!("{e}; continuing with an empty reference index");
            ReferenceIndex::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_demo_source_loads() {
        let index = DemoSource.load().unwrap();
        assert!(!index.is_empty());
        assert!(index.activities().contains(&"ACE inhibitor".to_string()));
    }

    #[test]
    fn test_text_source() {
        let source = TextSource::new("inline", ">A|1|ACE inhibitor\nPG\n>A|2\nGF\n");
        let index = load_reference_index(&source).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.entries()[1].activity, "");
        assert_eq!(source.describe(), "text:inline");
    }

    #[test]
    fn test_file_source_plain() {
        let mut temp = NamedTempFile::with_suffix(".fasta").unwrap();
        temp.write_all(b">BIOPEP|1|ACE inhibitor\nPG\n>BIOPEP|2|antioxidant\nFW\n")
            .unwrap();
        temp.flush().unwrap();

        let index = FileSource::new(temp.path()).load().unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_file_source_gzipped() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut temp = NamedTempFile::with_suffix(".fasta.gz").unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">BIOPEP|1|opioid\nYGG\nFM\n").unwrap();
        temp.write_all(&encoder.finish().unwrap()).unwrap();
        temp.flush().unwrap();

        let index = FileSource::new(temp.path()).load().unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.entries()[0].sequence, "YGGFM");
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let source = FileSource::new("/nonexistent/biopep.fasta");
        let result = load_reference_index(&source);
        assert!(matches!(result, Err(LoadError::SourceUnavailable { .. })));
    }

    #[test]
    fn test_load_or_empty_falls_back() {
        let index = load_or_empty(&FileSource::new("/nonexistent/biopep.fasta"));
        assert!(index.is_empty());
    }
}
