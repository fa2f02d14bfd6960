//! CLI argument definitions for the ChainsDirectory toolkit.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "chd",
    version,
    about = "ChainsDirectory toolkit - import transforms and schema documentation",
    long_about = "Generate spreadsheet import transforms and XSD schema documentation.\n\n\
                  Maps workbook columns onto the retail store directory fields,\n\
                  compiles the mapping into an XSLT 2.0 stylesheet and renders\n\
                  schema documentation tables as HTML or XLSX."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

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
    /// Compile a mapping plan into an import transform.
    Generate(GenerateArgs),

    /// Show the records a transform would emit for a workbook.
    Preview(PreviewArgs),

    /// Render field documentation from an XSD schema.
    Document(DocumentArgs),

    /// List the target field catalog.
    Fields,
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Source workbook (XLSX or CSV).
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,

    /// Mapping plan file (TOML).
    #[arg(long = "mapping", value_name = "PLAN")]
    pub mapping: PathBuf,

    /// Order number embedded in the output file name.
    #[arg(long = "order", value_name = "NUMBER")]
    pub order: String,

    /// Output directory (default: next to the workbook).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct PreviewArgs {
    /// Source workbook (XLSX or CSV).
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,

    /// Mapping plan file (TOML).
    #[arg(long = "mapping", value_name = "PLAN")]
    pub mapping: PathBuf,

    /// Number of data rows to preview.
    #[arg(long = "rows", value_name = "N", default_value_t = 10)]
    pub rows: usize,
}

#[derive(Parser)]
pub struct DocumentArgs {
    /// XSD schema file.
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Supplementary documentation file with field descriptions.
    #[arg(long = "doc", value_name = "FILE")]
    pub doc: Option<PathBuf>,

    /// Which artifacts to write.
    #[arg(long = "format", value_enum, default_value = "both")]
    pub format: DocFormatArg,

    /// Output directory (default: next to the schema).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DocFormatArg {
    Xlsx,
    Html,
    /// Bare-table HTML for pasting into word processors.
    Word,
    Both,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
