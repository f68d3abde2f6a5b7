use std::collections::HashMap;

use clap::Args;

use crate::catalog::store::ReferenceIndex;
use crate::cli::{OutputFormat, ReferenceArgs};
use crate::matching::report::list_activities;

#[derive(Args)]
pub struct ActivitiesArgs {
    #[command(flatten)]
    pub reference: ReferenceArgs,
}

/// Number of reference entries carrying each activity, in catalog order
fn entries_per_activity(index: &ReferenceIndex) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in index.iter().filter(|e| e.has_activity()) {
        *counts.entry(entry.activity.as_str()).or_default() += 1;
    }

    list_activities(index)
        .into_iter()
        .map(|activity| {
            let count = counts.get(activity.as_str()).copied().unwrap_or(0);
            (activity, count)
        })
        .collect()
}

/// Execute activities subcommand
///
/// # Errors
///
/// Returns an error if the reference data cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ActivitiesArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let index = args.reference.load()?;

    if verbose {
        eprintln!("Loaded {} reference entries", index.len());
    }

    let rows = entries_per_activity(&index);

    match format {
        OutputFormat::Text => {
            let width = rows
                .iter()
                .map(|(a, _)| a.chars().count())
                .max()
                .unwrap_or(8)
                .max(8);

            println!("Activities ({})\n", rows.len());
            println!("{:<width$} {:>8}", "Activity", "Entries");
            println!("{}", "-".repeat(width + 9));
            for (activity, count) in &rows {
                println!("{activity:<width$} {count:>8}");
            }
        }
        OutputFormat::Json => {
            let activities: Vec<&str> = rows.iter().map(|(a, _)| a.as_str()).collect();
            println!("{}", serde_json::to_string_pretty(&activities)?);
        }
        OutputFormat::Tsv | OutputFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(format.delimiter().unwrap_or(b','))
                .from_writer(std::io::stdout().lock());
            writer.write_record(["activity", "entries"])?;
            for (activity, count) in &rows {
                let count = count.to_string();
                writer.write_record([activity.as_str(), count.as_str()])?;
            }
            writer.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::ReferenceEntry;

    #[test]
    fn test_entries_per_activity_keeps_catalog_order() {
        let index = ReferenceIndex::from_entries(vec![
            ReferenceEntry::new("1", "antioxidant", "FW"),
            ReferenceEntry::new("2", "ACE inhibitor", "PG"),
            ReferenceEntry::new("3", "", "GF"),
            ReferenceEntry::new("4", "antioxidant", "WF"),
        ]);

        let rows = entries_per_activity(&index);
        assert_eq!(
            rows,
            vec![
                ("antioxidant".to_string(), 2),
                ("ACE inhibitor".to_string(), 1),
            ]
        );
    }
}
