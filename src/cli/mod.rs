//! Command-line interface for biopep-annotator.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **analyze**: Find known bioactive fragments in query peptides
//! - **activities**: List the activity catalog of the reference data
//! - **references**: List the loaded reference entries
//! - **serve**: Start the HTTP JSON service
//!
//! ## Usage
//!
//! ```text
//! # Annotate peptides given on the command line
//! biopep-annotator analyze -s FFMPGF -s DFPFW --references biopep.fasta
//!
//! # Annotate the first column of a CSV file, keep two activities, write CSV
//! biopep-annotator analyze peptides.csv -a "ACE inhibitor" -a antioxidant --format csv
//!
//! # Pipe peptides, one per line
//! cat peptides.txt | biopep-annotator analyze - --demo
//!
//! # Start the service
//! biopep-annotator serve --port 5000 --references biopep.fasta
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::catalog::source::{
    load_reference_index, DemoSource, FileSource, LoadError, ReferenceSource,
};
use crate::catalog::store::ReferenceIndex;

pub mod activities;
pub mod analyze;
pub mod references;

#[derive(Parser)]
#[command(name = "biopep-annotator")]
#[command(version)]
#[command(about = "Annotate peptide sequences with known bioactive fragments")]
#[command(
    long_about = "biopep-annotator scans peptide sequences for bioactive fragments listed in a BIOPEP-style reference file.\n\nFor each peptide it reports:\n- Every reference fragment contained verbatim in the peptide\n- Otherwise, every 2-9 residue window that equals a reference fragment, with its position"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find bioactive fragments in peptide sequences
    Analyze(analyze::AnalyzeArgs),

    /// List the activities present in the reference data
    Activities(activities::ActivitiesArgs),

    /// List reference entries
    References(references::ReferencesArgs),

    /// Start the web server
    Serve(ServeArgs),
}

/// Where reference data comes from
#[derive(clap::Args, Debug, Clone)]
pub struct ReferenceArgs {
    /// BIOPEP reference file (headered records, optionally gzipped)
    #[arg(short, long, default_value = "biopep.fasta")]
    pub references: PathBuf,

    /// Use the embedded demo reference set instead of a file
    #[arg(long, conflicts_with = "references")]
    pub demo: bool,
}

impl ReferenceArgs {
    /// The reference backend selected on the command line
    #[must_use]
    pub fn source(&self) -> Box<dyn ReferenceSource> {
        if self.demo {
            Box::new(DemoSource)
        } else {
            Box::new(FileSource::new(self.references.clone()))
        }
    }

    /// Load the reference index, failing if the source is unavailable
    ///
    /// # Errors
    ///
    /// Returns `LoadError::SourceUnavailable` if the reference file cannot be read.
    pub fn load(&self) -> Result<ReferenceIndex, LoadError> {
        load_reference_index(self.source().as_ref())
    }
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    #[command(flatten)]
    pub reference: ReferenceArgs,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
    Csv,
}

impl OutputFormat {
    /// Field delimiter for tabular formats
    #[must_use]
    pub fn delimiter(self) -> Option<u8> {
        match self {
            Self::Tsv => Some(b'\t'),
            Self::Csv => Some(b','),
            Self::Text | Self::Json => None,
        }
    }
}
