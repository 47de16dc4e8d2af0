use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use filehash::cli::{self, Cli, OutputOptions};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so digests on stdout stay pipeable
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let color = stdout.is_terminal();
    colored::control::set_override(color);

    let mut out = stdout.lock();
    let ok = cli::run(&cli, &mut out, OutputOptions { color })?;
    out.flush()?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
