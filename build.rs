use std::path::Path;

fn main() {
    let references_path = Path::new("catalogs/demo_biopep.fasta");
    validate_reference_file(references_path);
    set_build_dependencies();
}

fn validate_reference_file(references_path: &Path) {
    // Ensure the embedded reference file exists at build time
    assert!(
        references_path.exists(),
        "\n\nREFERENCE BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the demo reference file before building.\n",
        references_path.display()
    );

    let contents = std::fs::read_to_string(references_path).unwrap_or_else(|e| {
        panic!(
            "\n\nREFERENCE BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            references_path.display()
        );
    });

    let (records, activities) = validate_records(&contents);

    println!(
        "cargo:warning=Validated demo references: {records} entries, {activities} activities"
    );
}

/// Check every record and return (record count, distinct activity count)
fn validate_records(contents: &str) -> (usize, usize) {
    let mut records = 0;
    let mut activities: Vec<&str> = Vec::new();
    let mut header: Option<(usize, &str)> = None;
    let mut sequence_lines = 0;

    for (i, raw) in contents.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('>') {
            if let Some((prev_line, prev)) = header {
                assert_has_sequence(prev, prev_line, sequence_lines);
            }

            let activity = validate_header_fields(rest, line_no);
            if !activity.is_empty() && !activities.contains(&activity) {
                activities.push(activity);
            }

            header = Some((line_no, line));
            sequence_lines = 0;
            records += 1;
        } else {
            assert!(
                header.is_some(),
                "\n\nREFERENCE BUILD ERROR: Sequence before first header at line {line_no}\n"
            );
            validate_sequence_line(line, line_no);
            sequence_lines += 1;
        }
    }

    if let Some((prev_line, prev)) = header {
        assert_has_sequence(prev, prev_line, sequence_lines);
    }

    assert!(
        records > 0,
        "\n\nREFERENCE BUILD ERROR: No records found\n\
         Headers must look like '>BIOPEP|<id>|<activity>'.\n"
    );

    (records, activities.len())
}

fn validate_header_fields(header: &str, line_no: usize) -> &str {
    let fields: Vec<&str> = header.split('|').map(str::trim).collect();

    assert!(
        fields.len() >= 3,
        "\n\nREFERENCE BUILD ERROR: Header at line {line_no} needs 3 '|' fields\n\
         Got: >{header}\n"
    );
    assert!(
        !fields[1].is_empty(),
        "\n\nREFERENCE BUILD ERROR: Header at line {line_no} has an empty id\n"
    );

    fields[2]
}

fn validate_sequence_line(line: &str, line_no: usize) {
    assert!(
        line.chars().all(|c| c.is_ascii_alphabetic()),
        "\n\nREFERENCE BUILD ERROR: Sequence at line {line_no} contains non-letters\n\
         Got: {line}\n"
    );
}

fn assert_has_sequence(header: &str, line_no: usize, sequence_lines: usize) {
    assert!(
        sequence_lines > 0,
        "\n\nREFERENCE BUILD ERROR: Record '{header}' (line {line_no}) has no sequence\n"
    );
}

fn set_build_dependencies() {
    // Tell cargo to rerun if the embedded references change
    println!("cargo:rerun-if-changed=catalogs/demo_biopep.fasta");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
