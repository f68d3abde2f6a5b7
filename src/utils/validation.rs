//! Centralized validation and helper functions.

use std::path::Path;

/// Maximum number of query peptides accepted in one batch (DOS protection)
pub const MAX_QUERIES: usize = 100_000;

/// Maximum residues in a single query peptide
pub const MAX_PEPTIDE_LENGTH: usize = 10_000;

/// Security-related constants for input validation
pub const MAX_FILENAME_LENGTH: usize = 255;
pub const MIN_FILE_CONTENT_SIZE: usize = 1;

/// Check if adding another query would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new query.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if check_query_limit(queries.len()).is_some() {
///     return Err(...);
/// }
/// queries.push(query); // Safe to add
/// ```
#[must_use]
pub fn check_query_limit(count: usize) -> Option<String> {
    if count >= MAX_QUERIES {
        Some(format!(
            "Too many queries: adding another would exceed maximum of {MAX_QUERIES}"
        ))
    } else {
        None
    }
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Security validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: contains path traversal or invalid characters")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
    #[error("File content appears malformed or invalid")]
    InvalidFileContent,
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("Too many queries: {0} exceeds maximum of {MAX_QUERIES}")]
    TooManyQueries(usize),
    #[error("Peptide too long: {0} residues exceeds maximum of {MAX_PEPTIDE_LENGTH}")]
    PeptideTooLong(usize),
}

/// Secure filename validation to prevent directory traversal and other attacks
///
/// Validates and sanitizes filenames by:
/// - Checking length limits
/// - Preventing directory traversal (../, ..\\)
/// - Removing potentially dangerous characters
/// - Ensuring filename is not empty after sanitization
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the filename is empty,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if it contains invalid characters.
pub fn validate_filename(filename: &str) -> Result<String, ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    // Prevent directory traversal attacks
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(ValidationError::InvalidFilename);
    }

    // Check for null bytes and other dangerous characters
    if filename.contains('\0') || filename.chars().any(|c| ('\x01'..='\x1F').contains(&c)) {
        return Err(ValidationError::InvalidFilename);
    }

    // Sanitize filename by keeping only safe characters
    let sanitized = filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-' || *c == '_' || *c == ' ')
        .collect::<String>();

    if sanitized.trim().is_empty() {
        return Err(ValidationError::InvalidFilename);
    }

    // Prevent hidden files (starting with .) unless it's a known extension
    if sanitized.starts_with('.') && !has_known_extension(&sanitized) {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(sanitized)
}

/// Extensions accepted for query uploads
const QUERY_EXTENSIONS: &[&str] = &[".csv", ".tsv", ".tab", ".txt", ".fa", ".fasta", ".faa", ".fas"];

/// Check if filename has a known safe extension
fn has_known_extension(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    QUERY_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Validate that file content is readable text.
///
/// # Errors
///
/// Returns `ValidationError::InvalidFileContent` if the content is too small,
/// contains excessive binary data, or fails UTF-8 validation.
pub fn validate_file_content(content: &[u8]) -> Result<(), ValidationError> {
    if content.len() < MIN_FILE_CONTENT_SIZE {
        return Err(ValidationError::InvalidFileContent);
    }

    let non_printable_count = content
        .iter()
        .filter(|&&b| b < 9 || (b > 13 && b < 32) || b == 127)
        .count();

    // Allow up to 5% non-printable characters for text files
    if content.len() > 100 && non_printable_count > content.len() / 20 {
        return Err(ValidationError::InvalidFileContent);
    }

    if std::str::from_utf8(content).is_err() {
        return Err(ValidationError::InvalidFileContent);
    }

    Ok(())
}

/// Comprehensive upload validation combining filename and content checks.
///
/// Returns the sanitized filename, if one was provided.
///
/// # Errors
///
/// Returns a `ValidationError` if filename validation fails, the extension is
/// not a supported query layout (spreadsheets are rejected), or content
/// validation fails.
pub fn validate_upload(
    filename: Option<&str>,
    content: &[u8],
) -> Result<Option<String>, ValidationError> {
    let validated_filename = if let Some(name) = filename {
        let sanitized = validate_filename(name)?;
        let lower = sanitized.to_lowercase();
        if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            return Err(ValidationError::UnsupportedFileType(
                "Excel workbooks are not supported; export the sheet as CSV".to_string(),
            ));
        }
        Some(sanitized)
    } else {
        None
    };

    validate_file_content(content)?;

    Ok(validated_filename)
}

/// Validate a batch of raw query strings before matching.
///
/// # Errors
///
/// Returns `ValidationError::TooManyQueries` or `ValidationError::PeptideTooLong`.
pub fn validate_query_batch<S: AsRef<str>>(queries: &[S]) -> Result<(), ValidationError> {
    if queries.len() > MAX_QUERIES {
        return Err(ValidationError::TooManyQueries(queries.len()));
    }

    if let Some(len) = queries
        .iter()
        .map(|q| q.as_ref().trim().chars().count())
        .find(|&len| len > MAX_PEPTIDE_LENGTH)
    {
        return Err(ValidationError::PeptideTooLong(len));
    }

    Ok(())
}
