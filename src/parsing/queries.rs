//! Extract query peptides from uploaded or on-disk files.
//!
//! Supported layouts:
//!
//! - **CSV / TSV**: peptides in the first column; a header row is detected
//!   and skipped
//! - **FASTA**: one peptide per record (`.fa`, `.fasta`, `.faa`, optionally gzipped)
//! - **Lines**: one peptide per line, `#` comments allowed
//!
//! Values are trimmed and empty cells dropped; case is left untouched so the
//! caller sees what was uploaded. Normalization happens in the matcher.

use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;
use thiserror::Error;

use crate::core::peptide::is_standard_peptide;
use crate::utils::validation::{check_query_limit, is_gzipped, MAX_QUERIES};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid query file: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Too many queries: {0} exceeds maximum allowed ({MAX_QUERIES})")]
    TooManyQueries(usize),
}

/// Layout of a query file
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum QueryFormat {
    Csv,
    Tsv,
    Fasta,
    Lines,
}

impl QueryFormat {
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Tsv => "TSV",
            Self::Fasta => "FASTA",
            Self::Lines => "one peptide per line",
        }
    }
}

/// Column names treated as a header row in tabular files
const HEADER_WORDS: &[&str] = &[
    "sequence",
    "sequences",
    "peptide",
    "peptides",
    "peptide_sequence",
    "peptide sequence",
    "seq",
    "original_peptide_sequence",
];

/// Guess the layout from the filename extension, falling back to content
#[must_use]
pub fn detect_query_format(filename: Option<&str>, text: &str) -> QueryFormat {
    if let Some(format) = filename.and_then(format_from_filename) {
        return format;
    }

    let first_line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#'))
        .unwrap_or_default();

    if first_line.starts_with('>') {
        QueryFormat::Fasta
    } else if first_line.contains('\t') {
        QueryFormat::Tsv
    } else if first_line.contains(',') {
        QueryFormat::Csv
    } else {
        QueryFormat::Lines
    }
}

fn format_from_filename(filename: &str) -> Option<QueryFormat> {
    let lower = filename.to_lowercase();
    let stem = lower
        .strip_suffix(".gz")
        .or_else(|| lower.strip_suffix(".bgz"))
        .unwrap_or(&lower);

    // rsplit keeps bare dot-names such as ".csv", which Path::extension ignores
    let extension = Path::new(stem)
        .file_name()
        .and_then(OsStr::to_str)
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext);

    match extension {
        Some("csv") => Some(QueryFormat::Csv),
        Some("tsv" | "tab") => Some(QueryFormat::Tsv),
        Some("fa" | "fasta" | "faa" | "fas") => Some(QueryFormat::Fasta),
        Some("txt") => Some(QueryFormat::Lines),
        _ => None,
    }
}

/// Parse query peptides from text in a known layout
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for unreadable CSV/TSV rows,
/// `ParseError::Noodles` for malformed FASTA, or `ParseError::TooManyQueries`
/// if the limit is exceeded.
pub fn parse_query_text(text: &str, format: QueryFormat) -> Result<Vec<String>, ParseError> {
    match format {
        QueryFormat::Csv => parse_delimited(text, b','),
        QueryFormat::Tsv => parse_delimited(text, b'\t'),
        QueryFormat::Fasta => parse_fasta(BufReader::new(text.as_bytes())),
        QueryFormat::Lines => parse_lines(text),
    }
}

/// Parse query peptides from a file, detecting the layout unless given.
/// `.gz`/`.bgz` files are decompressed first.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or any error from
/// [`parse_query_text`].
pub fn parse_query_file(path: &Path, format: Option<QueryFormat>) -> Result<Vec<String>, ParseError> {
    let file = std::fs::File::open(path)?;
    let mut text = String::new();
    if is_gzipped(path) {
        MultiGzDecoder::new(file).read_to_string(&mut text)?;
    } else {
        BufReader::new(file).read_to_string(&mut text)?;
    }

    let format = format.unwrap_or_else(|| {
        let name = path.file_name().map(|n| n.to_string_lossy().to_string());
        detect_query_format(name.as_deref(), &text)
    });

    parse_query_text(&text, format)
}

/// Read one peptide per line from any reader (used for stdin)
///
/// # Errors
///
/// Returns `ParseError::Io` on read failure.
pub fn parse_query_reader<R: BufRead>(reader: R) -> Result<Vec<String>, ParseError> {
    let mut queries = Vec::new();
    for line in reader.lines() {
        push_query(&mut queries, &line?)?;
    }
    Ok(queries)
}

fn push_query(queries: &mut Vec<String>, value: &str) -> Result<(), ParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    if check_query_limit(queries.len()).is_some() {
        return Err(ParseError::TooManyQueries(queries.len() + 1));
    }
    queries.push(value.to_string());
    Ok(())
}

fn parse_lines(text: &str) -> Result<Vec<String>, ParseError> {
    let mut queries = Vec::new();
    for line in text.lines().filter(|l| !l.trim_start().starts_with('#')) {
        push_query(&mut queries, line)?;
    }
    Ok(queries)
}

/// Whether the first cell of a tabular file is a column name rather than a peptide
fn looks_like_header(cell: &str) -> bool {
    let lower = cell.trim().to_lowercase();
    HEADER_WORDS.contains(&lower.as_str()) || !is_standard_peptide(cell.trim())
}

fn parse_delimited(text: &str, delimiter: u8) -> Result<Vec<String>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut queries = Vec::new();
    let mut first_row = true;

    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            ParseError::InvalidFormat(format!("Row {} could not be read: {e}", i + 1))
        })?;
        let Some(cell) = record.get(0) else {
            continue;
        };

        if first_row {
            first_row = false;
            if looks_like_header(cell) {
                continue;
            }
        }

        push_query(&mut queries, cell)?;
    }

    Ok(queries)
}

fn parse_fasta<R: BufRead>(reader: R) -> Result<Vec<String>, ParseError> {
    let mut fasta_reader = fasta::io::Reader::new(reader);
    let mut queries = Vec::new();

    for result in fasta_reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;
        let sequence = String::from_utf8_lossy(record.sequence().as_ref()).to_string();
        push_query(&mut queries, &sequence)?;
    }

    Ok(queries)
}
