use mediadupe::duplicates::{DuplicateFinder, FinderConfig};
use mediadupe::scanner::{FileEntry, FingerprintMode, HashError};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"content a");
    write(dir.path(), "b.txt", b"content b");
    write(dir.path(), "c.txt", b"content c");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.fingerprinted_files, 3);
}

#[test]
fn test_scan_example_two_identical_files() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a/x.txt", b"0123456789");
    let b = write(dir.path(), "b/x.txt", b"0123456789");

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths(), vec![a, b]);
}

#[test]
fn test_one_byte_difference_in_small_file_separates() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.bin", &[7u8; 1000]);
    let mut other = vec![7u8; 1000];
    other[999] = 8;
    write(dir.path(), "b.bin", &other);

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert!(groups.is_empty());
}

#[test]
fn test_multiple_groups_partition_files() {
    let dir = tempdir().unwrap();
    for i in 0..3 {
        write(dir.path(), &format!("red/{i}.mov"), b"red");
        write(dir.path(), &format!("blue/{i}.mov"), b"blue");
    }
    write(dir.path(), "lonely.mov", b"lonely");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(summary.duplicate_files, 4);
    assert_eq!(summary.reclaimable_space, 2 * 4 + 2 * 3);

    let mut seen = HashSet::new();
    for group in &groups {
        for path in group.paths() {
            assert!(seen.insert(path), "path appears in two groups");
        }
    }
    assert_eq!(seen.len(), 6);
}

#[test]
fn test_empty_files_group_together() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/empty", b"");
    write(dir.path(), "b/empty2", b"");

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}

#[test]
fn test_name_mode_ignores_content() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "2023/IMG_0001.JPG", b"first");
    let b = write(dir.path(), "2024/IMG_0001.JPG", b"second, different");
    write(dir.path(), "2024/IMG_0002.JPG", b"first");

    let finder =
        DuplicateFinder::new(FinderConfig::default().with_mode(FingerprintMode::Name));
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths(), vec![a, b]);
    assert_eq!(groups[0].fingerprint.to_string(), "IMG_0001.JPG");
}

#[test]
fn test_repeated_scans_agree() {
    let dir = tempdir().unwrap();
    for name in ["q", "c", "x", "a", "m"] {
        write(dir.path(), &format!("{name}/dup.mov"), b"same");
    }

    let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(3));
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first, second);
    assert!(first[0].paths()[0].ends_with("a/dup.mov"));
}

#[test]
fn test_vanished_files_are_skipped_not_fatal() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a", b"same");
    let b = write(dir.path(), "b", b"same");
    let gone = dir.path().join("gone");

    let files = vec![
        FileEntry::new(a.clone(), 4),
        FileEntry::new(gone, 4),
        FileEntry::new(b.clone(), 4),
    ];
    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_from_files(files)
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths(), vec![a, b]);
    assert_eq!(summary.fingerprinted_files, 2);
    assert!(matches!(summary.skipped_files[0], HashError::NotFound(_)));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"same");
    write(dir.path(), "b", b"same");
    let locked = write(dir.path(), "c", b"same");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read it anyway; nothing to check then.
    if fs::File::open(&locked).is_ok() {
        return;
    }

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(summary.skipped_files.len(), 1);
    assert!(matches!(
        summary.skipped_files[0],
        HashError::PermissionDenied(_)
    ));
}
