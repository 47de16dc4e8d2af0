// Hash computation module
// Feeds files, readers and text through the SHA-256 engine

use std::fs::File;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use memmap2::Mmap;
use tracing::debug;

use super::error::HashError;
use super::sha256::{Digest, Sha256};

/// Result of a hash computation
#[derive(Debug, Clone, serde::Serialize)]
pub struct HashResult {
    pub hash: Digest,
    pub file_path: PathBuf,
    pub size: u64,
}

/// Default read chunk size (1MB)
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

// Constants for memory mapping
const MMAP_THRESHOLD: u64 = 2 * 1024 * 1024 * 1024; // 2GB

// Constants for progress bar
const PROGRESS_BAR_THRESHOLD: u64 = 1024 * 1024 * 1024; // 1GB
const PROGRESS_UPDATE_INTERVAL_MS: u64 = 100; // 10 times per second

/// Hash computer with streaming I/O
#[derive(Debug, Clone)]
pub struct HashComputer {
    buffer_size: usize,
}

impl HashComputer {
    /// Create a new HashComputer with default buffer size (1MB)
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Create a new HashComputer with custom buffer size
    /// A zero size falls back to the default
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        let buffer_size = if buffer_size == 0 {
            DEFAULT_BUFFER_SIZE
        } else {
            buffer_size
        };
        Self { buffer_size }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Compute hash from text string
    pub fn compute_hash_text(&self, text: &str) -> HashResult {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());

        HashResult {
            hash: hasher.finalize(),
            file_path: PathBuf::from("<text>"),
            size: text.len() as u64,
        }
    }

    /// Compute hash of everything readable from `reader`
    ///
    /// `label` is recorded as the result path, e.g. "-" for stdin.
    pub fn compute_hash_reader<R: Read>(
        &self,
        reader: &mut R,
        label: &Path,
    ) -> Result<HashResult, HashError> {
        let mut hasher = Sha256::new();
        let size = self.hash_with_buffered_io(&mut hasher, reader, label, None)?;

        Ok(HashResult {
            hash: hasher.finalize(),
            file_path: label.to_path_buf(),
            size,
        })
    }

    /// Compute hash for a single file using streaming I/O or memory mapping
    ///
    /// For files smaller than 2GB, uses memory mapping to avoid kernel-to-userspace copy overhead.
    /// Empty files and files larger than 2GB are read in `buffer_size` chunks.
    ///
    /// # Safety
    ///
    /// Memory mapping assumes the file will not be modified by other processes during hashing.
    /// If the file is modified concurrently, the hash result may be inconsistent.
    pub fn compute_hash(&self, path: &Path) -> Result<HashResult, HashError> {
        self.compute_hash_with_progress(path, false)
    }

    /// Compute hash for a single file with optional progress bar
    ///
    /// If show_progress is true and the file is larger than 1GB and stdout is a TTY,
    /// displays a progress bar that updates 10 times per second.
    pub fn compute_hash_with_progress(
        &self,
        path: &Path,
        show_progress: bool,
    ) -> Result<HashResult, HashError> {
        let mut file = File::open(path)
            .map_err(|e| HashError::from_io_error(e, "opening", Some(path.to_path_buf())))?;

        let file_size = file
            .metadata()
            .map_err(|e| HashError::from_io_error(e, "reading metadata of", Some(path.to_path_buf())))?
            .len();

        let should_show_progress = show_progress
            && file_size > PROGRESS_BAR_THRESHOLD
            && std::io::stdout().is_terminal();

        let mut hasher = Sha256::new();
        let mut mapped = false;

        if file_size > 0 && file_size < MMAP_THRESHOLD {
            // Fall back to buffered reading if mmap fails
            match unsafe { Mmap::map(&file) } {
                Ok(mmap) => {
                    hasher.update(&mmap[..]);
                    mapped = true;
                }
                Err(e) => debug!(path = %path.display(), error = %e, "mmap failed, using buffered reads"),
            }
        }

        if !mapped {
            let progress = if should_show_progress {
                Some(progress_bar(path, file_size))
            } else {
                None
            };
            self.hash_with_buffered_io(&mut hasher, &mut file, path, progress.as_ref())?;
        }

        let size = hasher.len();
        let digest = hasher.finalize();
        debug!(path = %path.display(), size, mapped, %digest, "hashed file");

        Ok(HashResult {
            hash: digest,
            file_path: path.to_path_buf(),
            size,
        })
    }

    /// Helper method to stream a reader through the hasher
    /// Returns the number of bytes read
    fn hash_with_buffered_io<R: Read + ?Sized>(
        &self,
        hasher: &mut Sha256,
        reader: &mut R,
        path: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<u64, HashError> {
        let mut buffer = vec![0u8; self.buffer_size];
        let mut bytes_processed = 0u64;
        let mut last_update = Instant::now();
        let update_interval = Duration::from_millis(PROGRESS_UPDATE_INTERVAL_MS);

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    if let Some(pb) = progress {
                        pb.finish_and_clear();
                    }
                    return Err(HashError::from_io_error(e, "reading", Some(path.to_path_buf())));
                }
            };
            hasher.update(&buffer[..bytes_read]);
            bytes_processed += bytes_read as u64;

            if let Some(pb) = progress {
                let now = Instant::now();
                if now.duration_since(last_update) >= update_interval {
                    pb.set_position(bytes_processed);
                    last_update = now;
                }
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(bytes_processed)
    }
}

impl Default for HashComputer {
    fn default() -> Self {
        Self::new()
    }
}

fn progress_bar(path: &Path, file_size: u64) -> ProgressBar {
    let pb = ProgressBar::new(file_size);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{msg}\n[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(format!("Hashing: {}", path.display()));
    pb
}
