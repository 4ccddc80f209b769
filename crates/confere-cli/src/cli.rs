//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "confere",
    version,
    about = "Conferência de vendas - reconcile a sales ledger against settlement reports",
    long_about = "Reconcile a merchant's sales ledger (extrato) against payment-processor\n\
                  settlement reports (PagSeguro, Rede, ...).\n\n\
                  Each ledger row is marked Conferido (matched) or Erro (unmatched) and the\n\
                  result is written as a color-annotated spreadsheet for review."
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

    /// Allow row-level ledger values in trace logs (redacted by default).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile a ledger spreadsheet against settlement reports.
    Reconcile(ReconcileArgs),

    /// List the canonical fields and their recognized column aliases.
    Fields,
}

#[derive(Parser)]
pub struct ReconcileArgs {
    /// Path to the sales ledger (extrato), .xlsx or .csv.
    #[arg(value_name = "EXTRATO")]
    pub extrato: PathBuf,

    /// Settlement report to reconcile against (repeat for several).
    #[arg(long = "against", value_name = "FILE", required = true)]
    pub against: Vec<PathBuf>,

    /// Comma-separated canonical fields whose equality defines a match.
    #[arg(long = "key", value_name = "FIELDS", default_value = "data,valor,loja")]
    pub key: String,

    /// Also mark settlement rows against the ledger.
    #[arg(long = "bidirectional")]
    pub bidirectional: bool,

    /// In bidirectional mode, count only ledger rows already marked
    /// Conferido when matching settlement rows (implies --bidirectional).
    ///
    /// This is a stricter policy that can under-report settlement-side
    /// matches; leave it off unless reviewers asked for it.
    #[arg(long = "confirmed-only")]
    pub confirmed_only: bool,

    /// Output file path (default: extrato_conferido.xlsx next to EXTRATO).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format to generate.
    #[arg(long = "format", value_enum, default_value = "xlsx")]
    pub format: OutputFormatArg,

    /// Which cells receive the green/red status fill.
    #[arg(long = "fill", value_enum, default_value = "row")]
    pub fill: ColorFillArg,

    /// Worksheet to read from Excel inputs (default: first sheet).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// CSV delimiter for inputs (default: auto-detect between ';' and ',').
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Reconcile and summarize without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Xlsx,
    Csv,
    Both,
}

/// Status fill placement choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ColorFillArg {
    /// Paint the entire row.
    Row,
    /// Paint only the key columns and the status column.
    KeyColumns,
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
