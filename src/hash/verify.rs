// Verification module
// Compares a file's current digest against an expected value

use std::path::{Path, PathBuf};

use colored::Colorize;

use super::error::HashError;
use super::hash::HashComputer;
use super::sha256::Digest;

/// Outcome of checking one file against an expected digest
#[derive(Debug, Clone, serde::Serialize)]
pub struct VerifyOutcome {
    pub path: PathBuf,
    pub expected: Digest,
    pub actual: Digest,
}

impl VerifyOutcome {
    pub fn is_match(&self) -> bool {
        self.expected == self.actual
    }

    /// Short report of the verification result
    pub fn render(&self, color: bool) -> String {
        if self.is_match() {
            let status = if color { "OK".green().bold().to_string() } else { "OK".to_string() };
            format!("{}: {}\n", status, self.path.display())
        } else {
            let status = if color {
                "MISMATCH".red().bold().to_string()
            } else {
                "MISMATCH".to_string()
            };
            format!(
                "{}: {}\n  Expected: {}\n  Actual:   {}\n",
                status,
                self.path.display(),
                self.expected,
                self.actual
            )
        }
    }
}

/// Engine for verifying file integrity against a known digest
#[derive(Debug, Clone, Default)]
pub struct VerifyEngine {
    computer: HashComputer,
}

impl VerifyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_computer(computer: HashComputer) -> Self {
        Self { computer }
    }

    /// Hash `path` and compare it to `expected_hex`
    ///
    /// The expected digest is parsed before the file is opened, so a
    /// malformed digest is reported without touching the filesystem.
    pub fn verify(&self, path: &Path, expected_hex: &str) -> Result<VerifyOutcome, HashError> {
        let expected = Digest::from_hex(expected_hex)?;
        let result = self.computer.compute_hash(path)?;

        Ok(VerifyOutcome {
            path: result.file_path,
            expected,
            actual: result.hash,
        })
    }
}
