//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use partsdb_build::{BuildSettings, IndexVariant};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(name = "partsdb")]
#[command(about = "Build full-text parts databases from the component inventory cache", long_about = None)]
pub(crate) struct Cli {
    /// Settings file (defaults to ~/.config/partsdb/settings.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Build parts index databases
    Generate(GenerateArgs),

    /// Show part counts and metadata of a built index
    Stats {
        /// Path to the index database
        db: PathBuf,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Variants to build (basic, all, current, empty)
    #[arg(long, value_delimiter = ',', default_value = "all")]
    pub variant: Vec<IndexVariant>,

    #[command(flatten)]
    pub overrides: BuildOverrides,
}

/// Per-run overrides of the settings file.
#[derive(Args, Clone, Default)]
pub(crate) struct BuildOverrides {
    /// Component inventory cache to read from
    #[arg(long)]
    pub source_db: Option<PathBuf>,

    /// Directory to write index files to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Components per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Drop price breaks cheaper than this (the first break is always kept)
    #[arg(long)]
    pub price_cutoff: Option<Decimal>,

    /// Exclude parts out of stock for at least this many days (0 disables)
    #[arg(long)]
    pub obsolete_days: Option<u32>,
}

impl BuildOverrides {
    pub fn apply(&self, mut settings: BuildSettings) -> BuildSettings {
        if let Some(p) = &self.source_db {
            settings.source_db = p.clone();
        }
        if let Some(p) = &self.output_dir {
            settings.output_dir = p.clone();
        }
        if let Some(n) = self.batch_size {
            settings.batch_size = n;
        }
        if let Some(cutoff) = self.price_cutoff {
            settings.price_cutoff = cutoff;
        }
        if let Some(days) = self.obsolete_days {
            settings.obsolete_parts_threshold_days = days;
        }
        settings
    }
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings and where they come from
    Show,

    /// Print the settings file path
    Path,

    /// Write the settings file, applying the given overrides
    Save(BuildOverrides),
}

#[cfg(test)]
#[path = "tests/cli_types_tests.rs"]
mod tests;
