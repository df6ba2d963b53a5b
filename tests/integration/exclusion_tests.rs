use mediadupe::duplicates::{DuplicateFinder, FinderConfig};
use mediadupe::scanner::{PrefixSet, WalkerConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn finder_excluding(prefixes: Vec<PathBuf>) -> DuplicateFinder {
    let walker = WalkerConfig::new(PrefixSet::from_paths(prefixes));
    DuplicateFinder::new(FinderConfig::default().with_walker_config(walker))
}

#[test]
fn test_excluded_files_never_grouped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "keep/a.mov", b"same");
    write(dir.path(), "keep/b.mov", b"same");
    write(dir.path(), "cache/c.mov", b"same");

    let finder = finder_excluding(vec![dir.path().join("cache")]);
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    assert!(groups[0]
        .paths()
        .iter()
        .all(|p| !p.starts_with(dir.path().join("cache"))));
}

#[test]
fn test_exclusion_is_a_string_prefix() {
    let dir = tempdir().unwrap();
    write(dir.path(), "b/x", b"same");
    write(dir.path(), "bb/x", b"same");
    write(dir.path(), "c/x", b"same");

    // "<root>/b" also covers "<root>/bb"
    let finder = finder_excluding(vec![dir.path().join("b")]);
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 1);
    assert!(groups.is_empty());
}

#[test]
fn test_several_exclusions() {
    let dir = tempdir().unwrap();
    write(dir.path(), "one/x", b"same");
    write(dir.path(), "two/x", b"same");
    write(dir.path(), "three/x", b"same");

    let finder = finder_excluding(vec![dir.path().join("one"), dir.path().join("two/x")]);
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 1);
    assert!(groups.is_empty());
}

#[test]
fn test_excluding_root_yields_nothing() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"same");
    write(dir.path(), "b", b"same");

    let finder = finder_excluding(vec![dir.path().to_path_buf()]);
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
}

#[test]
fn test_tilde_prefix_expands_to_home() {
    let Some(home) = mediadupe::scanner::path_utils::home_dir() else {
        return;
    };
    let set = PrefixSet::new(["~/Videos"]);
    assert!(set.matches(&home.join("Videos/clip.mov")));
    assert!(!set.matches(Path::new("/definitely/elsewhere/clip.mov")));
}
