// Centralized error handling module
// Errors raised while supplying bytes to the hash engine or handling its output

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Main error type for the hashing command
/// The SHA-256 engine itself never fails; every variant comes from the
/// surrounding file, directory or argument handling
#[derive(Debug)]
pub enum HashError {
    /// File system errors with context
    FileNotFound { path: PathBuf },
    DirectoryNotFound { path: PathBuf },
    PermissionDenied { path: PathBuf, operation: String },
    IoError { path: Option<PathBuf>, operation: String, source: io::Error },
    NotAFileOrDirectory { path: PathBuf },

    /// Digest parsing errors
    InvalidDigest { value: String, reason: String },

    /// CLI errors
    InvalidArguments { message: String },
}

impl fmt::Display for HashError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HashError::FileNotFound { path } => {
                writeln!(f, "Path does not exist: {}", path.display())?;
                write!(f, "Suggestion: Check that the file path is correct and the file exists")
            }
            HashError::DirectoryNotFound { path } => {
                writeln!(f, "Directory not found: {}", path.display())?;
                write!(f, "Suggestion: Check that the directory path is correct and the directory exists")
            }
            HashError::PermissionDenied { path, operation } => {
                writeln!(f, "Permission denied while {} {}", operation, path.display())?;
                write!(f, "Suggestion: Check file permissions or run with appropriate privileges")
            }
            HashError::IoError { path, operation, source } => {
                if let Some(p) = path {
                    writeln!(f, "I/O error while {} {}: {}", operation, p.display(), source)?;
                } else {
                    writeln!(f, "I/O error while {}: {}", operation, source)?;
                }
                write!(f, "Suggestion: Check that the input is readable")
            }
            HashError::NotAFileOrDirectory { path } => {
                writeln!(f, "Path is not a file or directory: {}", path.display())?;
                write!(f, "Suggestion: Only regular files and directories can be hashed")
            }
            HashError::InvalidDigest { value, reason } => {
                writeln!(f, "Invalid SHA-256 digest '{}': {}", value, reason)?;
                write!(f, "Suggestion: Provide the digest as 64 hexadecimal characters")
            }
            HashError::InvalidArguments { message } => {
                writeln!(f, "Invalid arguments: {}", message)?;
                write!(f, "Suggestion: Run with --help to see usage information")
            }
        }
    }
}

impl std::error::Error for HashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HashError::IoError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl HashError {
    /// Create an error with context about the operation and optional path
    pub fn from_io_error(err: io::Error, operation: &str, path: Option<PathBuf>) -> Self {
        match (err.kind(), path) {
            (io::ErrorKind::NotFound, Some(p)) => {
                if operation.contains("directory") {
                    HashError::DirectoryNotFound { path: p }
                } else {
                    HashError::FileNotFound { path: p }
                }
            }
            (io::ErrorKind::PermissionDenied, Some(p)) => HashError::PermissionDenied {
                path: p,
                operation: operation.to_string(),
            },
            (_, path) => HashError::IoError {
                path,
                operation: operation.to_string(),
                source: err,
            },
        }
    }
}

impl From<io::Error> for HashError {
    fn from(err: io::Error) -> Self {
        HashError::from_io_error(err, "unknown operation", None)
    }
}
