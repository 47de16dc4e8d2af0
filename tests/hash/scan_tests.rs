// Tests for scan module
// Directory reports grouped by extension

use std::fs;

use filehash::hash::{sha256, ScanEngine, READ_ERROR};
use tempfile::TempDir;

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("file1.txt"), b"Hello").unwrap();
    fs::write(dir.path().join("file2.txt"), b"World").unwrap();
    fs::write(dir.path().join("Makefile"), b"all:").unwrap();
    fs::write(dir.path().join("data.bin"), [0u8, 1, 2]).unwrap();
    fs::create_dir(dir.path().join("subdir")).unwrap();
    fs::write(dir.path().join("subdir").join("nested.txt"), b"Nested file").unwrap();
    dir
}

#[test]
fn test_scan_groups_by_extension() {
    let dir = fixture();
    let report = ScanEngine::new().scan_directory(dir.path()).unwrap();

    let keys: Vec<&str> = report.groups.keys().map(String::as_str).collect();
    assert_eq!(keys, vec![".bin", ".txt", "<no_ext>"]);

    let txt = &report.groups[".txt"];
    assert_eq!(txt.len(), 2);
    assert_eq!(txt[0].name, "file1.txt");
    assert_eq!(txt[1].name, "file2.txt");
    assert_eq!(
        txt[0].digest.unwrap().to_hex(),
        "185f8db32271fe25f561a6fc938b2e264306ec304eda518007d1764826381969"
    );
    assert_eq!(
        txt[1].digest.unwrap().to_hex(),
        "78ae647dc5544d227130a0682a51e30bc7777fbb6d8a8f17007463a3ecd1d524"
    );
    assert_eq!(report.groups["<no_ext>"][0].name, "Makefile");
}

#[test]
fn test_scan_non_recursive_skips_subdirs() {
    let dir = fixture();
    let report = ScanEngine::new().scan_directory(dir.path()).unwrap();

    assert!(report.subdirs.is_empty());
    assert_eq!(report.file_count(), 4);
    assert!(report.find(&dir.path().join("subdir").join("nested.txt")).is_none());
}

#[test]
fn test_scan_recursive() {
    let dir = fixture();
    let report = ScanEngine::new()
        .with_recursive(true)
        .scan_directory(dir.path())
        .unwrap();

    assert_eq!(report.subdirs.len(), 1);
    assert_eq!(report.file_count(), 5);
    assert_eq!(report.failed_count(), 0);

    let nested = report
        .find(&dir.path().join("subdir").join("nested.txt"))
        .unwrap();
    assert_eq!(
        nested.digest.unwrap().to_hex(),
        "6b5c8a22ec39c76fb504f5b377d43ed67008ef3407df29b111b5dcbb15a8c986"
    );
}

#[test]
fn test_parallel_and_sequential_agree() {
    let dir = fixture();
    for i in 0..20 {
        fs::write(dir.path().join(format!("extra{}.dat", i)), vec![i as u8; i * 10]).unwrap();
    }

    let parallel = ScanEngine::new()
        .with_recursive(true)
        .scan_directory(dir.path())
        .unwrap();
    let sequential = ScanEngine::new()
        .with_recursive(true)
        .with_parallel(false)
        .scan_directory(dir.path())
        .unwrap();

    assert_eq!(parallel.render(1), sequential.render(1));
    let extra = parallel.find(&dir.path().join("extra7.dat")).unwrap();
    assert_eq!(extra.digest.unwrap(), sha256(&[7u8; 70]));
}

#[test]
fn test_render_layout() {
    let dir = fixture();
    let report = ScanEngine::new()
        .with_recursive(true)
        .scan_directory(dir.path())
        .unwrap();
    let text = report.render(1);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "  .bin");
    assert!(lines[1].starts_with("    data.bin — "));
    assert_eq!(lines[2], "  .txt");
    assert_eq!(
        lines[3],
        "    file1.txt — 185f8db32271fe25f561a6fc938b2e264306ec304eda518007d1764826381969"
    );
    assert_eq!(lines[5], "  <no_ext>");
    assert_eq!(lines[7], "  subdir/");
    assert_eq!(lines[8], "    .txt");
    assert_eq!(
        lines[9],
        "      nested.txt — 6b5c8a22ec39c76fb504f5b377d43ed67008ef3407df29b111b5dcbb15a8c986"
    );
    assert_eq!(lines.len(), 10);
}

#[test]
fn test_empty_directory() {
    let dir = TempDir::new().unwrap();
    let report = ScanEngine::new().scan_directory(dir.path()).unwrap();
    assert_eq!(report.file_count(), 0);
    assert_eq!(report.render(1), "");
}

#[test]
fn test_missing_directory_error() {
    let dir = TempDir::new().unwrap();
    let result = ScanEngine::new().scan_directory(&dir.path().join("nope"));
    assert!(matches!(
        result,
        Err(filehash::hash::HashError::DirectoryNotFound { .. })
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_reported_as_read_error() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let locked = dir.path().join("locked.txt");
    fs::write(&locked, b"secret").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits
    if fs::File::open(&locked).is_ok() {
        return;
    }

    let report = ScanEngine::new().scan_directory(dir.path()).unwrap();
    assert_eq!(report.failed_count(), 1);
    let entry = report.find(&locked).unwrap();
    assert!(entry.digest.is_none());
    assert!(entry.error.as_deref().unwrap().contains("Permission denied"));
    assert!(report.render(1).contains(&format!("locked.txt — {}", READ_ERROR)));
}

#[cfg(unix)]
#[test]
fn test_recursive_scan_does_not_follow_directory_links() {
    use std::os::unix::fs::symlink;

    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("one.txt"), b"Hello").unwrap();
    symlink(".", dir.path().join("self")).unwrap();
    symlink(".", dir.path().join("again")).unwrap();

    let report = ScanEngine::new()
        .with_recursive(true)
        .scan_directory(dir.path())
        .unwrap();

    assert_eq!(report.file_count(), 1);
    assert!(report.subdirs.is_empty());
}

#[cfg(unix)]
#[test]
fn test_symlinked_file_is_hashed() {
    use std::os::unix::fs::symlink;

    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("target.txt"), b"Hello").unwrap();
    symlink(dir.path().join("target.txt"), dir.path().join("link.txt")).unwrap();

    let report = ScanEngine::new().scan_directory(dir.path()).unwrap();
    assert_eq!(report.file_count(), 2);
    let link = report.find(&dir.path().join("link.txt")).unwrap();
    assert_eq!(
        link.digest.unwrap().to_hex(),
        "185f8db32271fe25f561a6fc938b2e264306ec304eda518007d1764826381969"
    );
}
