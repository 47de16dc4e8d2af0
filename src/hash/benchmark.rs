// Benchmark module
// Measures in-memory SHA-256 throughput

use std::time::{Duration, Instant};

use tracing::debug;

use super::error::HashError;
use super::sha256::Sha256;

const PATTERN: &[u8] = b"The quick brown fox jumps over the lazy dog. ";

const BYTES_PER_MB: usize = 1024 * 1024;

// Chunk size used to feed the engine, mirroring a file read loop
const FEED_CHUNK: usize = 64 * 1024;

/// Throughput measurement for one run
#[derive(Debug, Clone, serde::Serialize)]
pub struct BenchmarkResult {
    pub algorithm: String,
    pub size_mb: usize,
    pub size_bytes: usize,
    pub throughput_mbps: f64,
}

/// Generate `size` bytes of repeating pattern data
pub fn generate_test_data(size: usize) -> Vec<u8> {
    PATTERN.iter().copied().cycle().take(size).collect()
}

/// Megabytes per second for `size_mb` processed in `duration`
pub fn calculate_throughput(size_mb: usize, duration: Duration) -> f64 {
    let secs = duration.as_secs_f64();
    if secs == 0.0 {
        return f64::INFINITY;
    }
    size_mb as f64 / secs
}

/// Runs timed hashes over generated data
#[derive(Debug, Clone, Default)]
pub struct BenchmarkEngine;

impl BenchmarkEngine {
    pub fn new() -> Self {
        Self
    }

    /// Hash `size_mb` megabytes of generated data and report throughput
    pub fn run_benchmark(&self, size_mb: usize) -> Result<BenchmarkResult, HashError> {
        if size_mb == 0 {
            return Err(HashError::InvalidArguments {
                message: "benchmark size must be at least 1 MB".to_string(),
            });
        }

        let size_bytes = size_mb
            .checked_mul(BYTES_PER_MB)
            .ok_or_else(|| HashError::InvalidArguments {
                message: format!("benchmark size of {} MB does not fit in memory", size_mb),
            })?;

        let data = generate_test_data(size_bytes);

        let start = Instant::now();
        let mut hasher = Sha256::new();
        for chunk in data.chunks(FEED_CHUNK) {
            hasher.update(chunk);
        }
        let digest = hasher.finalize();
        let elapsed = start.elapsed();

        debug!(size_mb, ?elapsed, %digest, "benchmark run complete");

        Ok(BenchmarkResult {
            algorithm: "SHA-256".to_string(),
            size_mb,
            size_bytes,
            throughput_mbps: calculate_throughput(size_mb, elapsed),
        })
    }
}
