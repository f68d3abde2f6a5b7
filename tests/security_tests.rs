//! Input validation and upload hardening tests
//!
//! Uploaded query files are parsed in memory and never written to disk, so
//! these tests focus on what reaches the parsers: filenames, file content and
//! batch sizes.

/// Test filename validation and sanitization
#[test]
fn test_filename_validation_security() {
    use biopep_annotator::utils::validation::{validate_filename, ValidationError};

    // Test directory traversal prevention
    let traversal_attempts = vec![
        "../etc/passwd",
        "..\\windows\\system32",
        "test/../../secret",
        "normal/../../../etc/passwd",
        "..\\..\\..\\windows\\system.ini",
    ];

    for attempt in traversal_attempts {
        match validate_filename(attempt) {
            Err(ValidationError::InvalidFilename) => {}
            Ok(_) => panic!("Directory traversal attempt '{attempt}' should have been blocked"),
            Err(e) => panic!("Unexpected error for '{attempt}': {e:?}"),
        }
    }

    // Test null byte injection prevention
    let null_byte_attempts = vec!["test\0.csv", "normal.csv\0", "file\x00name.fasta"];

    for attempt in null_byte_attempts {
        assert!(
            validate_filename(attempt).is_err(),
            "Null byte injection '{attempt}' should be blocked"
        );
    }

    // Test control character prevention
    let control_char_attempts = vec!["test\x01.csv", "file\x1f.tsv", "name\x0b.txt"];

    for attempt in control_char_attempts {
        assert!(
            validate_filename(attempt).is_err(),
            "Control character injection '{attempt}' should be blocked"
        );
    }

    // Test valid filenames are accepted and properly sanitized
    let valid_tests = vec![
        ("peptides.csv", "peptides.csv"),
        ("my-file_123.fasta", "my-file_123.fasta"),
        ("test@#$%file.txt", "testfile.txt"),
        ("sample 123.tsv", "sample 123.tsv"),
    ];

    for (input, expected) in valid_tests {
        match validate_filename(input) {
            Ok(sanitized) => assert_eq!(sanitized, expected, "Sanitization failed for '{input}'"),
            Err(e) => panic!("Valid filename '{input}' should be accepted: {e:?}"),
        }
    }
}

/// Test content integrity validation
#[test]
fn test_content_integrity_validation() {
    use biopep_annotator::utils::validation::validate_file_content;

    assert!(validate_file_content(b"Peptide,Score\nFFMPGF,0.91\n").is_ok());

    // All null bytes
    assert!(validate_file_content(&vec![0u8; 1000]).is_err());

    // Not UTF-8
    assert!(validate_file_content(&[0xABu8; 100]).is_err());

    assert!(validate_file_content(b"").is_err());

    // A stray control byte in otherwise normal text is tolerated
    assert!(validate_file_content(b"FFMPGF\n\x01DFPFW\n").is_ok());

    let mut high_binary_content = vec![0u8; 500];
    high_binary_content.extend_from_slice(b"FFMPGF");
    assert!(validate_file_content(&high_binary_content).is_err());
}

/// Test comprehensive upload validation
#[test]
fn test_comprehensive_upload_validation() {
    use biopep_annotator::utils::validation::{validate_upload, ValidationError};

    let csv_content = b"Peptide\nFFMPGF\n";

    let result = validate_upload(Some("peptides.csv"), csv_content);
    assert_eq!(result.unwrap().as_deref(), Some("peptides.csv"));

    assert!(validate_upload(None, csv_content).unwrap().is_none());
    assert!(validate_upload(Some("../etc/passwd"), csv_content).is_err());

    for workbook in ["peptides.xlsx", "PEPTIDES.XLS"] {
        assert!(matches!(
            validate_upload(Some(workbook), csv_content),
            Err(ValidationError::UnsupportedFileType(_))
        ));
    }
}

/// Test error message sanitization
#[test]
fn test_error_sanitization() {
    use biopep_annotator::web::server::create_safe_error_response;

    let error_response = create_safe_error_response(
        "test_error",
        "User-friendly message",
        Some("/internal/path/file.rs:123 - reference file unreadable"),
    );

    assert_eq!(error_response.error, "User-friendly message");
    assert_eq!(error_response.error_type, "test_error");
    assert!(
        error_response.details.is_none(),
        "Internal details should never be exposed"
    );

    let error_response = create_safe_error_response("test_error", "User message", None);
    assert!(error_response.details.is_none());
}

/// Test query batch limits used by the CLI, the analyze endpoint and uploads
#[test]
fn test_query_batch_limits() {
    use biopep_annotator::parsing::queries::{parse_query_text, ParseError, QueryFormat};
    use biopep_annotator::utils::validation::{
        validate_query_batch, ValidationError, MAX_PEPTIDE_LENGTH, MAX_QUERIES,
    };

    let too_many = vec!["PG"; MAX_QUERIES + 1];
    assert!(matches!(
        validate_query_batch(&too_many),
        Err(ValidationError::TooManyQueries(_))
    ));

    let long = "W".repeat(MAX_PEPTIDE_LENGTH + 1);
    assert!(matches!(
        validate_query_batch(&[long.as_str()]),
        Err(ValidationError::PeptideTooLong(_))
    ));

    let lines = "PG\n".repeat(MAX_QUERIES + 1);
    assert!(matches!(
        parse_query_text(&lines, QueryFormat::Lines),
        Err(ParseError::TooManyQueries(_))
    ));
}

/// Test that multipart limits are set to secure values
#[test]
fn test_field_limit_constants() {
    use biopep_annotator::web::server::{MAX_FILE_FIELD_SIZE, MAX_MULTIPART_FIELDS, MAX_TEXT_FIELD_SIZE};

    assert_eq!(MAX_MULTIPART_FIELDS, 10);
    assert_eq!(MAX_FILE_FIELD_SIZE, 16 * 1024 * 1024);
    assert_eq!(MAX_TEXT_FIELD_SIZE, 1024 * 1024);
}

/// Test validation error handling
#[test]
fn test_validation_error_handling() {
    use biopep_annotator::utils::validation::{validate_filename, ValidationError};

    let long_filename = "a".repeat(300);
    let test_cases = vec![
        ("", ValidationError::EmptyFilename),
        (long_filename.as_str(), ValidationError::FilenameTooLong),
        ("../etc/passwd", ValidationError::InvalidFilename),
        ("test\0.txt", ValidationError::InvalidFilename),
    ];

    for (input, expected_error_type) in test_cases {
        let result = validate_filename(input);
        assert!(result.is_err(), "Input '{input}' should fail validation");

        let error = result.unwrap_err();
        match (&error, &expected_error_type) {
            (ValidationError::EmptyFilename, ValidationError::EmptyFilename)
            | (ValidationError::FilenameTooLong, ValidationError::FilenameTooLong)
            | (ValidationError::InvalidFilename, ValidationError::InvalidFilename) => {}
            _ => panic!(
                "Expected error type {expected_error_type:?} but got {error:?} for input '{input}'"
            ),
        }
    }
}
