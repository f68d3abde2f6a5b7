use clap::Args;

use crate::cli::{OutputFormat, ReferenceArgs};
use crate::core::entry::ReferenceEntry;

#[derive(Args)]
pub struct ReferencesArgs {
    #[command(flatten)]
    pub reference: ReferenceArgs,

    /// Only list entries with this activity (repeatable)
    #[arg(short, long = "activity", value_name = "ACTIVITY")]
    pub activities: Vec<String>,

    /// Only list entries the matcher skips (empty or non-letter sequences)
    #[arg(long)]
    pub malformed: bool,
}

/// Truncate string for display
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

fn select<'a>(entries: &'a [ReferenceEntry], args: &ReferencesArgs) -> Vec<&'a ReferenceEntry> {
    entries
        .iter()
        .filter(|e| args.activities.is_empty() || args.activities.contains(&e.activity))
        .filter(|e| !args.malformed || !e.is_matchable())
        .collect()
}

/// Execute references subcommand
///
/// # Errors
///
/// Returns an error if the reference data cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ReferencesArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let source = args.reference.source();
    let index = args.reference.load()?;
    let selected = select(index.entries(), &args);

    if verbose {
        eprintln!(
            "Loaded {} reference entries ({} matchable)",
            index.len(),
            index.matchable().count()
        );
    }

    match format {
        OutputFormat::Text => {
            println!("Reference Entries ({} of {})", selected.len(), index.len());
            println!("Source:      {}", source.describe());
            println!("Fingerprint: {}", index.fingerprint());
            println!("Longest:     {} residues\n", index.longest_fragment());

            let id_width = selected
                .iter()
                .map(|e| e.id.chars().count())
                .max()
                .unwrap_or(2)
                .max(2);
            let seq_width = selected
                .iter()
                .map(|e| e.residue_count().min(30))
                .max()
                .unwrap_or(8)
                .max(8);

            println!(
                "{:<id_w$} {:<seq_w$} {:<9} Activity",
                "ID",
                "Sequence",
                "Matchable",
                id_w = id_width,
                seq_w = seq_width
            );
            println!("{}", "-".repeat(id_width + seq_width + 30));

            for e in &selected {
                println!(
                    "{:<id_w$} {:<seq_w$} {:<9} {}",
                    e.id,
                    truncate(&e.sequence, seq_width),
                    if e.is_matchable() { "yes" } else { "no" },
                    e.activity,
                    id_w = id_width,
                    seq_w = seq_width
                );
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "source": source.describe(),
                "count": index.len(),
                "fingerprint": index.fingerprint(),
                "entries": selected,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv | OutputFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(format.delimiter().unwrap_or(b','))
                .from_writer(std::io::stdout().lock());
            writer.write_record(["id", "activity", "sequence", "matchable"])?;
            for e in &selected {
                writer.write_record([
                    e.id.as_str(),
                    e.activity.as_str(),
                    e.sequence.as_str(),
                    if e.is_matchable() { "true" } else { "false" },
                ])?;
            }
            writer.flush()?;
        }
    }

    Ok(())
}
