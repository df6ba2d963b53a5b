#![cfg(unix)]

use mediadupe::duplicates::DuplicateFinder;
use std::fs;
use std::os::unix::fs::symlink;
use tempfile::tempdir;

#[test]
fn test_symlink_to_file_groups_with_target() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("a.mov");
    let link = dir.path().join("b.mov");
    fs::write(&target, b"frames").unwrap();
    symlink(&target, &link).unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths(), vec![target, link]);
}

#[test]
fn test_directory_links_are_not_descended() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("real")).unwrap();
    fs::write(dir.path().join("real/clip.mov"), b"frames").unwrap();
    symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(summary.total_files, 1);
    assert!(groups.is_empty());
}

#[test]
fn test_self_referencing_link_does_not_hang() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("loop")).unwrap();
    symlink(dir.path(), dir.path().join("loop/up")).unwrap();
    fs::write(dir.path().join("loop/x"), b"x").unwrap();

    let (_, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_dangling_link_is_ignored() {
    let dir = tempdir().unwrap();
    symlink(dir.path().join("missing"), dir.path().join("dangling")).unwrap();
    fs::write(dir.path().join("x"), b"x").unwrap();

    let (_, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(summary.total_files, 1);
    assert!(summary.skipped_files.is_empty());
}
