//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Attest - Score the factuality of LLM responses.
#[derive(Debug, Parser)]
#[command(name = "attest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.attest/config.toml)
    #[arg(short, long, global = true, env = "ATTEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract atomic facts from a response
    Extract(ExtractArgs),

    /// Remove near-duplicate lines
    Dedup(DedupArgs),

    /// Run the full evaluation pipeline on a response
    Evaluate(EvaluateArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Response text source shared by extract and evaluate.
#[derive(Debug, clap::Args)]
pub struct InputArgs {
    /// Response text (reads --file or stdin when omitted)
    pub text: Option<String>,

    /// Read the response from a file
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Context the response was produced for
    #[arg(long)]
    pub context: Option<String>,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Split on sentences even when an LLM is configured
    #[arg(long)]
    pub basic: bool,
}

/// Arguments for the dedup command.
#[derive(Debug, Parser)]
pub struct DedupArgs {
    /// File with one fact per line (reads stdin when omitted)
    pub file: Option<PathBuf>,

    /// Similarity threshold (0.0-1.0); defaults to the configured value
    #[arg(short, long)]
    pub threshold: Option<f64>,
}

/// Arguments for the evaluate command.
#[derive(Debug, Parser)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// JSON object file mapping knowledge keys to content
    #[arg(short, long)]
    pub knowledge_base: PathBuf,

    /// Clamp the reported score to [0, 1]
    #[arg(long)]
    pub clamp: bool,

    /// Run the containment stages regardless of configuration
    #[arg(long)]
    pub containment: bool,

    /// Print run metrics after the result
    #[arg(long)]
    pub metrics: bool,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Print the default configuration file path instead
    #[arg(long)]
    pub path: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
