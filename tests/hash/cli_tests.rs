// Tests for the command line handlers

use std::fs;

use clap::Parser;
use filehash::cli::{self, Cli, OutputOptions};
use filehash::hash::path_utils::absolute_path;
use tempfile::TempDir;

const NO_COLOR: OutputOptions = OutputOptions { color: false };

fn run(args: &[&str]) -> (anyhow::Result<bool>, String) {
    let mut argv = vec!["filehash"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    let mut out = Vec::new();
    let result = cli::run(&cli, &mut out, NO_COLOR);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_hash_single_file_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hello.txt");
    fs::write(&path, b"hello world").unwrap();

    let (result, output) = run(&["hash", path.to_str().unwrap()]);
    assert!(result.unwrap());
    assert_eq!(
        output,
        format!(
            "File: {}\nSHA-256: b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9\n",
            absolute_path(&path).unwrap().display()
        )
    );
}

#[test]
fn test_hash_directory_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("file1.txt"), b"Hello").unwrap();
    fs::create_dir(dir.path().join("subdir")).unwrap();
    fs::write(dir.path().join("subdir").join("nested.txt"), b"Nested file").unwrap();

    let (result, flat) = run(&["hash", dir.path().to_str().unwrap()]);
    assert!(result.unwrap());
    assert!(flat.starts_with("Directory: "));
    assert!(flat.contains("  .txt\n    file1.txt — 185f8db3"));
    assert!(!flat.contains("subdir/"));

    let (result, deep) = run(&["hash", "-R", dir.path().to_str().unwrap()]);
    assert!(result.unwrap());
    assert!(deep.contains("  subdir/\n    .txt\n      nested.txt — 6b5c8a22"));
}

#[test]
fn test_hash_json_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("abc.txt");
    fs::write(&path, b"abc").unwrap();

    let (result, output) = run(&["hash", "--json", path.to_str().unwrap()]);
    assert!(result.unwrap());
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        json["hash"],
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(json["size"], 3);
}

#[test]
fn test_hash_missing_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");
    let (result, output) = run(&["hash", missing.to_str().unwrap()]);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Path does not exist"));
    assert!(output.is_empty());
}

#[test]
fn test_text_command() {
    let (result, output) = run(&["text", "abc"]);
    assert!(result.unwrap());
    assert_eq!(
        output,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad\n"
    );
}

#[test]
fn test_verify_command_exit_status() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("abc.txt");
    fs::write(&path, b"abc").unwrap();
    let good = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
    let bad = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    let (result, output) = run(&["verify", path.to_str().unwrap(), good]);
    assert!(result.unwrap());
    assert!(output.starts_with("OK: "));

    let (result, output) = run(&["verify", path.to_str().unwrap(), bad]);
    assert!(!result.unwrap());
    assert!(output.starts_with("MISMATCH: "));
}

#[test]
fn test_bench_command() {
    let (result, output) = run(&["bench", "--size-mb", "1"]);
    assert!(result.unwrap());
    assert!(output.starts_with("SHA-256: hashed 1 MiB at "));
}

#[test]
fn test_buffer_size_must_be_positive() {
    assert!(Cli::try_parse_from(["filehash", "--buffer-size", "0", "text", "x"]).is_err());
    let cli = Cli::try_parse_from(["filehash", "text", "x", "--buffer-size", "4096"]).unwrap();
    assert_eq!(cli.buffer_size, 4096);
}

#[test]
fn test_bench_command_rejects_oversized_run() {
    let (result, output) = run(&["bench", "--size-mb", "17592186044416"]);
    assert!(result.unwrap_err().to_string().contains("does not fit"));
    assert!(output.is_empty());
}
