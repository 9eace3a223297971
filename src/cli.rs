use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Ingest retail CSV datasets into SQLite", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the destination database and its retail tables
    Init(InitArgs),
    /// Ingest all retail CSV datasets from a data directory
    Ingest(IngestArgs),
    /// Look up a competitor price for a product identifier
    Price(PriceArgs),
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Path to the SQLite database file (created if absent)
    #[arg(short, long)]
    pub db: PathBuf,
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Path to the SQLite database file
    #[arg(short, long)]
    pub db: PathBuf,
    /// Directory holding the dataset CSV files
    #[arg(short = 'i', long = "data-dir")]
    pub data_dir: PathBuf,
    /// How rows land in existing tables: replace contents or append
    #[arg(long = "mode", value_enum, default_value = "replace")]
    pub mode: WriteMode,
    /// Emit the run report as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum WriteMode {
    Replace,
    Append,
}

impl Default for WriteMode {
    fn default() -> Self {
        WriteMode::Replace
    }
}

#[derive(Debug, Args)]
pub struct PriceArgs {
    /// Product identifier to look up
    pub product_id: String,
    /// Competitor page URL; may carry a `{product_id}` placeholder.
    /// Requires --selector; without it the simulated source is used
    #[arg(long)]
    pub url: Option<String>,
    /// CSS selector locating the price element on the page
    #[arg(long)]
    pub selector: Option<String>,
    /// Failure probability of the simulated source
    #[arg(long = "failure-probability", default_value_t = 0.2)]
    pub failure_probability: f64,
}
