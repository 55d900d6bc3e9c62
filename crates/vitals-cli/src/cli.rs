//! CLI argument definitions for the consolidation tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "vitals",
    version,
    about = "Consolidate yearly vital-statistics extracts into clean datasets",
    long_about = "Consolidate per-year CSV extracts ({year}_{tipo}.csv) into one clean\n\
                  dataset per record type, plus a long-format quality-control report.\n\n\
                  Reruns fully overwrite previous outputs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub run: RunArgs,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

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

    /// TOML run configuration (years, record types, output names).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the configured record types.
    Tipos,
}

#[derive(Args)]
pub struct RunArgs {
    /// Directory holding the raw `{year}_{tipo}.csv` files.
    #[arg(long = "raw-dir", value_name = "DIR", default_value = "data/raw/csv")]
    pub raw_dir: PathBuf,

    /// Directory receiving the consolidated datasets and the quality report.
    #[arg(
        long = "processed-dir",
        value_name = "DIR",
        default_value = "data/processed"
    )]
    pub processed_dir: PathBuf,

    /// Record type to process (repeatable; default: the configured selection).
    #[arg(long = "tipo", value_name = "NAME")]
    pub tipos: Vec<String>,

    /// Process record types on separate threads.
    #[arg(long = "parallel")]
    pub parallel: bool,
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
