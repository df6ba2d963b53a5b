use mediadupe::duplicates::{select_removals, DuplicateFinder};
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
fn test_copy_outside_prefix_makes_all_inside_removable() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/x.txt", b"0123456789");
    let b = write(dir.path(), "b/x.txt", b"0123456789");

    let scan = DuplicateFinder::with_defaults()
        .find_removals(dir.path(), &dir.path().join("b"))
        .unwrap();

    assert_eq!(scan.removals, vec![b]);
}

#[test]
fn test_group_entirely_under_prefix_keeps_first() {
    let dir = tempdir().unwrap();
    let x = write(dir.path(), "a/x.txt", b"0123456789");
    let y = write(dir.path(), "a/y.txt", b"0123456789");

    let scan = DuplicateFinder::with_defaults()
        .find_removals(dir.path(), &dir.path().join("a"))
        .unwrap();

    assert_eq!(scan.removals, vec![y]);
    assert_eq!(scan.plans[0].keep, vec![x]);
}

#[test]
fn test_prefix_matching_nothing_removes_nothing() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/x.txt", b"same");
    write(dir.path(), "b/x.txt", b"same");

    let scan = DuplicateFinder::with_defaults()
        .find_removals(dir.path(), &dir.path().join("zzz"))
        .unwrap();

    assert_eq!(scan.groups.len(), 1);
    assert!(scan.removals.is_empty());
}

#[test]
fn test_every_inside_copy_removed_when_outside_copy_exists() {
    let dir = tempdir().unwrap();
    let keep = write(dir.path(), "archive/clip.mov", b"frames");
    let in1 = write(dir.path(), "inbox/1/clip.mov", b"frames");
    let in2 = write(dir.path(), "inbox/2/clip.mov", b"frames");
    write(dir.path(), "inbox/unique.mov", b"only once");

    let scan = DuplicateFinder::with_defaults()
        .find_removals(dir.path(), &dir.path().join("inbox"))
        .unwrap();

    assert_eq!(scan.removals, vec![in1, in2]);
    assert_eq!(scan.plans[0].keep, vec![keep]);
}

#[test]
fn test_removals_follow_group_order() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/1", b"first");
    write(dir.path(), "a/2", b"second");
    let d1 = write(dir.path(), "d/1", b"first");
    let d2 = write(dir.path(), "d/2", b"second");

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    let removals = select_removals(&groups, &dir.path().join("d"));

    assert_eq!(removals, vec![d1, d2]);
}

#[test]
fn test_selection_does_not_touch_files() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a/x", b"same");
    let b = write(dir.path(), "b/x", b"same");

    DuplicateFinder::with_defaults()
        .find_removals(dir.path(), &dir.path().join("b"))
        .unwrap();

    assert!(a.exists());
    assert!(b.exists());
}
