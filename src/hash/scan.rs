// Directory scanning module
// Builds a per-directory report of file digests grouped by extension

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use super::error::HashError;
use super::hash::HashComputer;
use super::path_utils;
use super::sha256::Digest;

/// Marker printed in place of a digest when a file could not be read
pub const READ_ERROR: &str = "<READ ERROR>";

/// One hashed (or failed) file in a directory report
#[derive(Debug, Clone, serde::Serialize)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub digest: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Hash report for one directory and, when recursive, its subdirectories
#[derive(Debug, Clone, serde::Serialize)]
pub struct DirectoryReport {
    pub path: PathBuf,
    pub groups: BTreeMap<String, Vec<FileEntry>>,
    pub subdirs: Vec<DirectoryReport>,
}

impl DirectoryReport {
    /// Number of files in this report and all nested reports
    pub fn file_count(&self) -> usize {
        let own: usize = self.groups.values().map(Vec::len).sum();
        own + self.subdirs.iter().map(DirectoryReport::file_count).sum::<usize>()
    }

    /// Number of files that could not be hashed, including nested reports
    pub fn failed_count(&self) -> usize {
        let own = self
            .groups
            .values()
            .flatten()
            .filter(|entry| entry.digest.is_none())
            .count();
        own + self.subdirs.iter().map(DirectoryReport::failed_count).sum::<usize>()
    }

    /// Find the entry for `path` anywhere in the report
    pub fn find(&self, path: &Path) -> Option<&FileEntry> {
        self.groups
            .values()
            .flatten()
            .find(|entry| entry.path == path)
            .or_else(|| self.subdirs.iter().find_map(|sub| sub.find(path)))
    }

    /// Render the indented text listing, starting at `indent` levels
    pub fn render(&self, indent: usize) -> String {
        let mut out = String::new();
        self.render_into(&mut out, indent);
        out
    }

    fn render_into(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        let inner = "  ".repeat(indent + 1);

        for (ext, files) in &self.groups {
            let _ = writeln!(out, "{}{}", pad, ext);
            for file in files {
                match &file.digest {
                    Some(digest) => {
                        let _ = writeln!(out, "{}{} — {}", inner, file.name, digest);
                    }
                    None => {
                        let _ = writeln!(out, "{}{} — {}", inner, file.name, READ_ERROR);
                    }
                }
            }
        }

        for sub in &self.subdirs {
            let _ = writeln!(out, "{}{}/", pad, path_utils::file_name(&sub.path));
            sub.render_into(out, indent + 1);
        }
    }
}

/// Engine for hashing every file in a directory
#[derive(Debug, Clone)]
pub struct ScanEngine {
    computer: HashComputer,
    recursive: bool,
    parallel: bool,
}

impl ScanEngine {
    /// Create a new ScanEngine with default settings
    pub fn new() -> Self {
        Self {
            computer: HashComputer::new(),
            recursive: false,
            parallel: true,
        }
    }

    /// Use a specific HashComputer (buffer size)
    pub fn with_computer(mut self, computer: HashComputer) -> Self {
        self.computer = computer;
        self
    }

    /// Descend into subdirectories
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Hash the files of each directory on the rayon pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Hash the files of `dir`, grouped by extension
    ///
    /// The top-level directory must be readable; unreadable subdirectories
    /// and entries are logged and skipped.
    pub fn scan_directory(&self, dir: &Path) -> Result<DirectoryReport, HashError> {
        let entries = fs::read_dir(dir)
            .map_err(|e| HashError::from_io_error(e, "reading directory", Some(dir.to_path_buf())))?;

        let mut files = Vec::new();
        let mut subdirs = Vec::new();

        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "cannot read directory entry");
                    continue;
                }
            };

            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cannot read file type");
                    continue;
                }
            };

            if file_type.is_dir() {
                subdirs.push(path);
            } else if file_type.is_file() {
                files.push(path);
            } else if file_type.is_symlink() {
                // Links to files are hashed; links to directories are never
                // descended into, which rules out link cycles
                match fs::metadata(&path) {
                    Ok(target) if target.is_file() => files.push(path),
                    Ok(target) if target.is_dir() => {
                        debug!(path = %path.display(), "skipping symlinked directory");
                    }
                    Ok(_) => {}
                    Err(e) => warn!(path = %path.display(), error = %e, "cannot resolve symlink"),
                }
            }
        }

        files.sort();
        subdirs.sort();
        debug!(dir = %dir.display(), files = files.len(), subdirs = subdirs.len(), "scanning directory");

        let hashed: Vec<FileEntry> = if self.parallel {
            files.par_iter().map(|path| self.hash_entry(path)).collect()
        } else {
            files.iter().map(|path| self.hash_entry(path)).collect()
        };

        let mut groups: BTreeMap<String, Vec<FileEntry>> = BTreeMap::new();
        for entry in hashed {
            groups
                .entry(path_utils::extension_key(&entry.path))
                .or_default()
                .push(entry);
        }

        let subdirs = if self.recursive {
            subdirs
                .iter()
                .filter_map(|sub| match self.scan_directory(sub) {
                    Ok(report) => Some(report),
                    Err(e) => {
                        warn!(dir = %sub.display(), error = %e, "skipping unreadable directory");
                        None
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        Ok(DirectoryReport {
            path: dir.to_path_buf(),
            groups,
            subdirs,
        })
    }

    fn hash_entry(&self, path: &Path) -> FileEntry {
        let name = path_utils::file_name(path);
        match self.computer.compute_hash(path) {
            Ok(result) => FileEntry {
                name,
                path: path.to_path_buf(),
                digest: Some(result.hash),
                error: None,
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to hash file");
                FileEntry {
                    name,
                    path: path.to_path_buf(),
                    digest: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self::new()
    }
}
