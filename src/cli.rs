//! # filehash command line
//!
//! Argument definitions and the handlers behind each subcommand. Handlers
//! write to any `io::Write` so the binary passes stdout and tests pass a
//! buffer.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::hash::path_utils;
use crate::hash::{
    BenchmarkEngine, HashComputer, HashError, ScanEngine, VerifyEngine, DEFAULT_BUFFER_SIZE,
};

/// Marker path for reading the input from stdin
pub const STDIN_PATH: &str = "-";

/// filehash - SHA-256 fingerprints for files and directories.
#[derive(Parser, Debug)]
#[command(name = "filehash", version, about)]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read chunk size in bytes.
    #[arg(long, global = true, default_value_t = DEFAULT_BUFFER_SIZE, value_parser = parse_buffer_size)]
    pub buffer_size: usize,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Hash a file, stdin ("-") or every file in a directory.
    Hash(HashArgs),
    /// Hash a literal string.
    Text(TextArgs),
    /// Check a file against an expected digest.
    Verify(VerifyArgs),
    /// Measure hashing throughput on generated data.
    Bench(BenchArgs),
}

/// Arguments for the hash subcommand.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// File or directory to hash, or "-" for stdin.
    pub path: PathBuf,

    /// Descend into subdirectories.
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// Emit JSON instead of the text listing.
    #[arg(long)]
    pub json: bool,

    /// Show a progress bar for files over 1GB.
    #[arg(long)]
    pub progress: bool,

    /// Hash directory entries one at a time.
    #[arg(long)]
    pub sequential: bool,
}

/// Arguments for the text subcommand.
#[derive(Args, Debug)]
pub struct TextArgs {
    /// Text whose UTF-8 bytes are hashed.
    pub text: String,

    #[arg(long)]
    pub json: bool,
}

/// Arguments for the verify subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// File to check.
    pub path: PathBuf,

    /// Expected SHA-256 digest (64 hex characters).
    pub digest: String,

    #[arg(long)]
    pub json: bool,
}

/// Arguments for the bench subcommand.
#[derive(Args, Debug)]
pub struct BenchArgs {
    /// Amount of generated data in MB.
    #[arg(long, default_value_t = 100)]
    pub size_mb: usize,

    #[arg(long)]
    pub json: bool,
}

fn parse_buffer_size(value: &str) -> Result<usize, String> {
    let size: usize = value
        .parse()
        .map_err(|e| format!("invalid buffer size '{}': {}", value, e))?;
    if size == 0 {
        return Err("buffer size must be greater than zero".to_string());
    }
    Ok(size)
}

/// Output settings shared by every handler
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub color: bool,
}

/// Dispatch a parsed command line
///
/// Returns `Ok(false)` when the command ran but found a problem the user
/// should see in the exit code (read errors, digest mismatch).
pub fn run<W: Write>(cli: &Cli, out: &mut W, options: OutputOptions) -> Result<bool> {
    let computer = HashComputer::with_buffer_size(cli.buffer_size);

    match &cli.command {
        Commands::Hash(args) => run_hash(args, &computer, out),
        Commands::Text(args) => run_text(args, &computer, out),
        Commands::Verify(args) => run_verify(args, &computer, out, options),
        Commands::Bench(args) => run_bench(args, out),
    }
}

pub fn run_hash<W: Write>(args: &HashArgs, computer: &HashComputer, out: &mut W) -> Result<bool> {
    let path = args.path.as_path();

    if path == Path::new(STDIN_PATH) {
        let stdin = io::stdin();
        let result = computer.compute_hash_reader(&mut stdin.lock(), path)?;
        if args.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
        } else {
            writeln!(out, "File: <stdin>")?;
            writeln!(out, "SHA-256: {}", result.hash)?;
        }
        return Ok(true);
    }

    if !path.exists() {
        return Err(HashError::FileNotFound { path: path.to_path_buf() }.into());
    }

    let absolute = path_utils::absolute_path(path)
        .with_context(|| format!("resolving {}", path.display()))?;

    if path.is_file() {
        info!(path = %absolute.display(), "hashing file");
        let result = computer.compute_hash_with_progress(path, args.progress);

        if args.json {
            let result = result?;
            writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
            return Ok(true);
        }

        writeln!(out, "File: {}", absolute.display())?;
        return match result {
            Ok(result) => {
                writeln!(out, "SHA-256: {}", result.hash)?;
                Ok(true)
            }
            Err(e) => {
                warn!(path = %absolute.display(), error = %e, "failed to hash file");
                writeln!(out, "SHA-256: {}", crate::hash::READ_ERROR)?;
                Ok(false)
            }
        };
    }

    if path.is_dir() {
        info!(path = %absolute.display(), recursive = args.recursive, "hashing directory");
        let engine = ScanEngine::new()
            .with_computer(computer.clone())
            .with_recursive(args.recursive)
            .with_parallel(!args.sequential);
        let report = engine.scan_directory(path)?;

        if args.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        } else {
            writeln!(out, "Directory: {}", absolute.display())?;
            write!(out, "{}", report.render(1))?;
        }
        return Ok(report.failed_count() == 0);
    }

    Err(HashError::NotAFileOrDirectory { path: path.to_path_buf() }.into())
}

pub fn run_text<W: Write>(args: &TextArgs, computer: &HashComputer, out: &mut W) -> Result<bool> {
    let result = computer.compute_hash_text(&args.text);
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        writeln!(out, "{}", result.hash)?;
    }
    Ok(true)
}

pub fn run_verify<W: Write>(
    args: &VerifyArgs,
    computer: &HashComputer,
    out: &mut W,
    options: OutputOptions,
) -> Result<bool> {
    let engine = VerifyEngine::with_computer(computer.clone());
    let outcome = engine.verify(&args.path, &args.digest)?;

    if args.json {
        #[derive(serde::Serialize)]
        struct JsonOutcome<'a> {
            #[serde(flatten)]
            outcome: &'a crate::hash::VerifyOutcome,
            matched: bool,
        }
        let json = JsonOutcome {
            outcome: &outcome,
            matched: outcome.is_match(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
    } else {
        write!(out, "{}", outcome.render(options.color))?;
    }
    Ok(outcome.is_match())
}

pub fn run_bench<W: Write>(args: &BenchArgs, out: &mut W) -> Result<bool> {
    let result = BenchmarkEngine::new().run_benchmark(args.size_mb)?;
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        let size = humansize::format_size(result.size_bytes, humansize::BINARY);
        writeln!(
            out,
            "{}: hashed {} at {:.2} MB/s",
            result.algorithm, size, result.throughput_mbps
        )?;
    }
    Ok(true)
}
