//! CLI argument definitions for the juris importer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use juris_model::SheetModel;

#[derive(Parser)]
#[command(
    name = "juris",
    version,
    about = "Importer for legal proceeding spreadsheets",
    long_about = "Validate and import spreadsheets of legal proceedings and witnesses.\n\n\
                  Detects sheet structure, normalizes rows into canonical records,\n\
                  validates CNJ numbers, and publishes dataset versions atomically."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a spreadsheet and report issues without importing.
    Validate(ValidateArgs),

    /// Run the full pipeline and publish a new dataset version.
    Import(ImportArgs),

    /// List dataset versions in a store.
    Versions(VersionsArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// CSV file, or directory of CSV files treated as one workbook.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Write the full validation result as JSON to this path.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// CSV file, or directory of CSV files treated as one workbook.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Version store directory (created on first use).
    #[arg(long = "store", value_name = "DIR")]
    pub store: PathBuf,

    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Rows per staged chunk.
    #[arg(long = "chunk-size", value_name = "N", default_value_t = 500)]
    pub chunk_size: usize,
}

#[derive(Parser)]
pub struct VersionsArgs {
    /// Version store directory.
    #[arg(long = "store", value_name = "DIR")]
    pub store: PathBuf,
}

/// Pipeline options shared by `validate` and `import`.
#[derive(Parser)]
pub struct PipelineArgs {
    /// Keep witness CNJ lists as single rows instead of one row per CNJ.
    #[arg(long = "no-explode-lists")]
    pub no_explode_lists: bool,

    /// Keep CNJ values as entered instead of stripping formatting.
    #[arg(long = "no-standardize-cnj")]
    pub no_standardize_cnj: bool,

    /// Fill empty defendant names with this value (flagged as autofilled).
    #[arg(long = "default-reu", value_name = "NAME")]
    pub default_reu: Option<String>,

    /// Compute correction suggestions for invalid values.
    #[arg(long = "corrections")]
    pub corrections: bool,

    /// Apply the suggested corrections before validating.
    ///
    /// Implies --corrections. Suggestions are deterministic; applying them
    /// re-runs validation on the corrected batch.
    #[arg(long = "apply-corrections")]
    pub apply_corrections: bool,

    /// Treat ambiguous sheets as this model instead of failing.
    #[arg(long = "model", value_enum, value_name = "MODEL")]
    pub model: Option<ModelArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModelArg {
    Processo,
    Testemunha,
}

impl ModelArg {
    pub fn to_model(self) -> SheetModel {
        match self {
            Self::Processo => SheetModel::Processo,
            Self::Testemunha => SheetModel::Testemunha,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
