// Path utilities for report output
// Absolute display paths and extension grouping keys

use std::io;
use std::path::{Component, Path, PathBuf};

/// Group key used for files without an extension
pub const NO_EXTENSION: &str = "<no_ext>";

/// Resolve a path that may be relative or absolute
/// If relative, resolves against the provided base directory
pub fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Absolute form of `path` without resolving symlinks
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(clean_path(&resolve_path(path, &cwd)))
}

/// Clean a path by removing redundant components like "." and ".."
/// This provides a normalized form without requiring the path to exist
pub fn clean_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => continue,
            Component::ParentDir => {
                // Only pop a normal component, never a root or another ".."
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                    continue;
                }
                components.push(component);
            }
            _ => components.push(component),
        }
    }

    let result: PathBuf = components.into_iter().collect();
    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

/// Extension group for a file, including the leading dot (".txt")
/// Files without an extension map to `<no_ext>`
pub fn extension_key(path: &Path) -> String {
    match path.extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy()),
        None => NO_EXTENSION.to_string(),
    }
}

/// Final path component as a displayable string
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
