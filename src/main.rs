mod cli;
mod error;
mod parse;
mod report;
mod types;

use std::io::{IsTerminal, Read, Write};
use std::path::Path;

use clap::Parser;
use tracing::debug;

use crate::error::{ConvertError, Result};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}

fn run() -> Result<i32> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let raw = read_input(cli.input.as_deref())?;
    debug!(bytes = raw.len(), "input loaded");

    let rendered = report::convert(&raw, cli.tool_version.as_deref(), cli.indent)?;
    write_output(cli.output.as_deref(), &rendered)?;

    Ok(exit_code::SUCCESS)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).map_err(|source| ConvertError::ReadInput {
                path: path.display().to_string(),
                source,
            })
        }
        None => {
            let mut stdin = std::io::stdin();
            if stdin.is_terminal() {
                return Err(ConvertError::NoInput);
            }
            let mut raw = String::new();
            stdin.read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

fn write_output(path: Option<&Path>, rendered: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, rendered).map_err(|source| ConvertError::WriteOutput {
            path: path.display().to_string(),
            source,
        }),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    match run() {
        Ok(code) => {
            if code != exit_code::SUCCESS {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(exit_code::FAILURE);
        }
    }
}
