use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "oxlint-sarif",
    version,
    about = "Convert oxlint JSON diagnostics into SARIF 2.1.0"
)]
pub struct Cli {
    /// Report file to read; stdin when omitted
    pub input: Option<PathBuf>,

    /// Write the SARIF log here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print indent width; 0 emits compact JSON
    #[arg(long, default_value_t = 2)]
    pub indent: usize,

    /// Version recorded for the oxlint driver in the SARIF log
    #[arg(long)]
    pub tool_version: Option<String>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
