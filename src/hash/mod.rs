// Hash library
// SHA-256 engine plus the file, directory and verification layers that feed it

pub mod sha256;
pub mod hash;
pub mod scan;
pub mod verify;
pub mod benchmark;
pub mod path_utils;
pub mod error;

// Re-export commonly used types for convenience
pub use error::HashError;
pub use sha256::{sha256, Digest, Sha256, BLOCK_SIZE, DIGEST_SIZE};
pub use hash::{HashComputer, HashResult, DEFAULT_BUFFER_SIZE};
pub use scan::{DirectoryReport, FileEntry, ScanEngine, READ_ERROR};
pub use verify::{VerifyEngine, VerifyOutcome};
pub use benchmark::{BenchmarkEngine, BenchmarkResult, generate_test_data, calculate_throughput};
