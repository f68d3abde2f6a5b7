use std::io::Write;
use std::path::{Path, PathBuf};

use clap::builder::TypedValueParser as _;
use clap::Args;

use crate::catalog::store::ReferenceIndex;
use crate::cli::{OutputFormat, ReferenceArgs};
use crate::core::annotation::AnnotationRecord;
use crate::matching::engine::{MatchingConfig, MatchingEngine, DEFAULT_MAX_WINDOW};
use crate::matching::report::{filter_by_activities, ActivitySummary};
use crate::parsing::queries::{parse_query_file, parse_query_reader, QueryFormat};
use crate::utils::validation::validate_query_batch;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Query files (CSV, TSV, FASTA, or one peptide per line).
    /// Use '-' for stdin (one peptide per line)
    pub inputs: Vec<PathBuf>,

    /// Peptide sequence to analyze (repeatable)
    #[arg(short, long = "sequence", value_name = "PEPTIDE")]
    pub sequences: Vec<String>,

    /// Query file layout (auto-detected by default)
    #[arg(long)]
    pub input_format: Option<QueryFormat>,

    #[command(flatten)]
    pub reference: ReferenceArgs,

    /// Only report fragments with this activity (repeatable)
    #[arg(short, long = "activity", value_name = "ACTIVITY")]
    pub activities: Vec<String>,

    /// Print per-activity counts instead of individual fragments
    #[arg(long)]
    pub summary: bool,

    /// Longest window, in residues, tried when no reference fragment is
    /// contained in a peptide
    #[arg(long, default_value_t = DEFAULT_MAX_WINDOW, value_parser = clap::value_parser!(u16).range(2..=64).map(usize::from))]
    pub max_window: usize,
}

/// Execute analyze subcommand
///
/// # Errors
///
/// Returns an error if no queries are given, a query file cannot be parsed,
/// or the reference data cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AnalyzeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let queries = collect_queries(&args)?;
    if queries.is_empty() {
        anyhow::bail!("No query peptides given; pass files, '-' for stdin, or --sequence");
    }
    validate_query_batch(&queries)?;

    let index = args.reference.load()?;

    if verbose {
        eprintln!(
            "Loaded {} reference entries, {} query peptides",
            index.len(),
            queries.len()
        );
    }

    if index.is_empty() {
        eprintln!("Warning: Reference data is empty, no fragments can be found.");
    }

    let config = MatchingConfig::with_max_window(args.max_window);
    let engine = MatchingEngine::with_config(&index, config);
    let records = filter_by_activities(engine.analyze_batch(&queries), &args.activities);

    let mut out = std::io::stdout().lock();

    if args.summary {
        let summary = ActivitySummary::from_records(&records);
        match format {
            OutputFormat::Text => print_text_summary(&mut out, &summary)?,
            OutputFormat::Json => {
                writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
            }
            OutputFormat::Tsv | OutputFormat::Csv => {
                print_delimited_summary(&mut out, &summary, format)?;
            }
        }
        return Ok(());
    }

    if records.is_empty() {
        eprintln!("No bioactive fragments found.");
    }

    match format {
        OutputFormat::Text => print_text_results(&mut out, &records)?,
        OutputFormat::Json => print_json_results(&mut out, &records, &index, &config)?,
        OutputFormat::Tsv | OutputFormat::Csv => write_records_delimited(&mut out, &records, format)?,
    }

    Ok(())
}

fn collect_queries(args: &AnalyzeArgs) -> anyhow::Result<Vec<String>> {
    let mut queries = args.sequences.clone();

    for input in &args.inputs {
        let parsed = if input == Path::new("-") {
            parse_query_reader(std::io::stdin().lock())?
        } else {
            parse_query_file(input, args.input_format)
                .map_err(|e| anyhow::anyhow!("{}: {e}", input.display()))?
        };
        queries.extend(parsed);
    }

    Ok(queries)
}

fn print_text_results<W: Write>(out: &mut W, records: &[AnnotationRecord]) -> anyhow::Result<()> {
    let mut current: Option<&str> = None;

    for record in records {
        if current != Some(record.original_peptide.as_str()) {
            current = Some(record.original_peptide.as_str());
            writeln!(out, "\n{}", record.original_peptide)?;
        }

        let position = record
            .position
            .map(|p| format!(" {p}"))
            .unwrap_or_default();
        let id = if record.biopep_id.is_empty() {
            "-"
        } else {
            record.biopep_id.as_str()
        };
        writeln!(
            out,
            "  {:<12} {:<10} {}{}",
            record.active_fragment, id, record.activity, position
        )?;
    }

    Ok(())
}

fn print_json_results<W: Write>(
    out: &mut W,
    records: &[AnnotationRecord],
    index: &ReferenceIndex,
    config: &MatchingConfig,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "references": {
            "entries": index.len(),
            "fingerprint": index.fingerprint(),
        },
        "configuration": config,
        "records": records,
    });

    writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

/// Write records as CSV or TSV with a header row
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_records_delimited<W: Write>(
    out: W,
    records: &[AnnotationRecord],
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter().unwrap_or(b','))
        .from_writer(out);

    writer.write_record([
        "originalPeptide",
        "activeFragment",
        "activity",
        "biopepId",
        "position",
    ])?;
    for record in records {
        let position = record.position.map(|p| p.to_string()).unwrap_or_default();
        writer.write_record([
            record.original_peptide.as_str(),
            record.active_fragment.as_str(),
            record.activity.as_str(),
            record.biopep_id.as_str(),
            position.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_text_summary<W: Write>(out: &mut W, summary: &ActivitySummary) -> anyhow::Result<()> {
    writeln!(out, "Activity Summary")?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "  Peptides with fragments: {}", summary.unique_peptides)?;
    writeln!(out, "  Fragments found:         {}", summary.total_fragments)?;
    writeln!(out, "  Distinct activities:     {}", summary.unique_activities)?;

    if !summary.activity_counts.is_empty() {
        writeln!(out)?;
        for entry in &summary.activity_counts {
            writeln!(out, "  {:>6}  {}", entry.count, entry.activity)?;
        }
    }
    Ok(())
}

fn print_delimited_summary<W: Write>(
    out: W,
    summary: &ActivitySummary,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter().unwrap_or(b','))
        .from_writer(out);

    writer.write_record(["activity", "count"])?;
    for entry in &summary.activity_counts {
        let count = entry.count.to_string();
        writer.write_record([entry.activity.as_str(), count.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::annotation::FragmentPosition;
    use crate::core::entry::ReferenceEntry;

    fn sample_records() -> Vec<AnnotationRecord> {
        let pg = ReferenceEntry::new("8221", "ACE inhibitor", "PG");
        let fw = ReferenceEntry::new("3090", "antioxidant, radical scavenging", "FW");
        vec![
            AnnotationRecord::contained("FFMPGF", &pg),
            AnnotationRecord::enumerated("DFPFW", "FW", &fw, FragmentPosition::from_window(3, 2)),
        ]
    }

    #[test]
    fn test_write_records_csv_quotes_commas() {
        let mut buf = Vec::new();
        write_records_delimited(&mut buf, &sample_records(), OutputFormat::Csv).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "originalPeptide,activeFragment,activity,biopepId,position");
        assert_eq!(lines[1], "FFMPGF,PG,ACE inhibitor,8221,");
        assert_eq!(lines[2], "DFPFW,FW,\"antioxidant, radical scavenging\",3090,[4-5]");
    }

    #[test]
    fn test_write_records_tsv() {
        let mut buf = Vec::new();
        write_records_delimited(&mut buf, &sample_records(), OutputFormat::Tsv).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("FFMPGF\tPG\tACE inhibitor"));
    }

    #[test]
    fn test_print_text_results_groups_by_peptide() {
        let mut buf = Vec::new();
        print_text_results(&mut buf, &sample_records()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\nFFMPGF\n"));
        assert!(text.contains("[4-5]"));
    }
}
