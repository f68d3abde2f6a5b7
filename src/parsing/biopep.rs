//! Parser for BIOPEP-style headered-record reference files.
//!
//! ```text
//! >BIOPEP|8221|ACE inhibitor
//! PG
//! >BIOPEP|3090|antioxidant
//! PH
//! W
//! ```
//!
//! Each record starts with a `>` header whose `|`-separated fields are
//! `marker | id | activity`; following lines are concatenated into the
//! fragment sequence. Parsing is permissive and never fails: missing header
//! fields default to empty strings and anything that is not a header is
//! continuation text.

use std::io::BufRead;

use crate::core::entry::ReferenceEntry;

const HEADER_MARKER: char = '>';

/// Accumulates the header and sequence of the record being read
#[derive(Default)]
struct RecordBuilder {
    header: String,
    sequence: String,
    entries: Vec<ReferenceEntry>,
}

impl RecordBuilder {
    fn push_line(&mut self, raw: &str) {
        let line = raw.trim();
        if line.starts_with(HEADER_MARKER) {
            self.flush();
            self.header = line.to_string();
            self.sequence.clear();
        } else {
            self.sequence.push_str(line);
        }
    }

    /// Emit the pending record when both header and sequence are present
    fn flush(&mut self) {
        if !self.header.is_empty() && !self.sequence.is_empty() {
            self.entries
                .push(ReferenceEntry::from_header(&self.header, &self.sequence));
        }
    }

    fn finish(mut self) -> Vec<ReferenceEntry> {
        self.flush();
        self.entries
    }
}

/// Parse reference entries from an iterator of lines
pub fn parse_reference_lines<I, S>(lines: I) -> Vec<ReferenceEntry>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = RecordBuilder::default();
    for line in lines {
        builder.push_line(line.as_ref());
    }
    builder.finish()
}

/// Parse reference entries from in-memory text
#[must_use]
pub fn parse_reference_text(text: &str) -> Vec<ReferenceEntry> {
    parse_reference_lines(text.lines())
}

/// Parse reference entries from a buffered reader.
///
/// Invalid UTF-8 is replaced rather than rejected.
///
/// # Errors
///
/// Returns the underlying I/O error if reading fails.
pub fn parse_reference_reader<R: BufRead>(mut reader: R) -> std::io::Result<Vec<ReferenceEntry>> {
    let mut builder = RecordBuilder::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        builder.push_line(&String::from_utf8_lossy(&buf));
    }

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_records() {
        let text = ">BIOPEP|8221|ACE inhibitor\nPG\n>BIOPEP|3090|antioxidant\nFW\n";
        let entries = parse_reference_text(text);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "8221");
        assert_eq!(entries[0].activity, "ACE inhibitor");
        assert_eq!(entries[0].sequence, "PG");
        assert_eq!(entries[1].id, "3090");
        assert_eq!(entries[1].activity, "antioxidant");
        assert_eq!(entries[1].sequence, "FW");
    }

    #[test]
    fn test_missing_activity_field() {
        let entries = parse_reference_text(">BIOPEP|42\nGW\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "42");
        assert_eq!(entries[0].activity, "");
    }

    #[test]
    fn test_multiline_sequence_concatenated() {
        let entries = parse_reference_text(">BIOPEP|1|opioid\nYGG\nFL \n\n  m\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sequence, "YGGFLM");
    }

    #[test]
    fn test_trailing_record_without_newline_is_flushed() {
        let entries = parse_reference_text(">A|1|x\nPG\n>A|2|y\nGF");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].sequence, "GF");
    }

    #[test]
    fn test_header_without_sequence_is_dropped() {
        let entries = parse_reference_text(">A|1|x\n>A|2|y\nGF\n>A|3|z\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "2");
    }

    #[test]
    fn test_text_before_first_header_is_discarded() {
        let entries = parse_reference_text("junk line\nMORE\n>A|1|x\nPG\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sequence, "PG");
    }

    #[test]
    fn test_duplicates_retained() {
        let text = ">A|1|ACE inhibitor\nPG\n>A|2|antithrombotic\nPG\n";
        let entries = parse_reference_text(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].sequence, entries[1].sequence);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_reference_text("").is_empty());
        assert!(parse_reference_text("\n\n").is_empty());
    }

    #[test]
    fn test_reader_replaces_invalid_utf8() {
        let bytes: &[u8] = b">A|1|act\xffivity\nPG\r\n";
        let entries = parse_reference_reader(bytes).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sequence, "PG");
        assert!(entries[0].activity.starts_with("act"));
    }
}
