use clap::Parser;
use mediadupe::cli::Cli;
use mediadupe::error::{exit_code_for, ExitCode};
use mediadupe::run_app_with;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

struct Fixture {
    dir: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let config = dir.path().join("mediadupe.toml");
        fs::write(&config, "").unwrap();
        fs::create_dir(dir.path().join("media")).unwrap();
        Self { dir, config }
    }

    fn media(&self) -> PathBuf {
        self.dir.path().join("media")
    }

    fn write(&self, rel: &str, content: &[u8]) -> PathBuf {
        let path = self.media().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn run(&self, args: &[&str], stdin: &str) -> (anyhow::Result<ExitCode>, String) {
        let mut argv = vec![
            "mediadupe".to_string(),
            "-q".to_string(),
            "--no-color".to_string(),
            "--config".to_string(),
            self.config.display().to_string(),
        ];
        argv.extend(args.iter().map(|s| s.to_string()));
        let cli = Cli::try_parse_from(argv).unwrap();

        let mut input = Cursor::new(stdin.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = run_app_with(cli, &mut input, &mut out, false);
        (result, String::from_utf8(out).unwrap())
    }
}

fn s(path: &Path) -> String {
    path.display().to_string()
}

#[test]
fn test_find_reports_groups_and_total() {
    let fx = Fixture::new();
    let a = fx.write("a/x.txt", b"0123456789");
    let b = fx.write("b/x.txt", b"0123456789");
    fx.write("c/unique.txt", b"unique");

    let (result, out) = fx.run(&["find", "--search-dir", &s(&fx.media())], "");

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(out.starts_with("\nDuplicates:\n"));
    let a_pos = out.find(&format!("  {}\n", s(&a))).unwrap();
    let b_pos = out.find(&format!("  {}\n", s(&b))).unwrap();
    assert!(a_pos < b_pos);
    assert!(out.ends_with("\nTotal: 1\n"));
}

#[test]
fn test_find_without_duplicates_exits_2() {
    let fx = Fixture::new();
    fx.write("a", b"one");
    fx.write("b", b"two");

    let (result, out) = fx.run(&["find", "--search-dir", &s(&fx.media())], "");

    assert_eq!(result.unwrap(), ExitCode::NoDuplicates);
    assert!(out.ends_with("Total: 0\n"));
}

#[test]
fn test_find_json() {
    let fx = Fixture::new();
    fx.write("a/clip.mov", b"x");
    fx.write("b/clip.mov", b"y");

    let (result, out) = fx.run(
        &[
            "find",
            "--search-dir",
            &s(&fx.media()),
            "--by-name",
            "--output",
            "json",
        ],
        "",
    );

    assert_eq!(result.unwrap(), ExitCode::Success);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["groups"][0]["fingerprint"], "clip.mov");
    assert_eq!(parsed["groups"][0]["files"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["summary"]["total_files"], 2);
}

#[test]
fn test_find_exclude_prefix_from_cli_and_config() {
    let fx = Fixture::new();
    fx.write("keep/x", b"same");
    fx.write("skip1/x", b"same");
    fx.write("skip2/x", b"same");
    fs::write(
        &fx.config,
        format!("exclude_prefixes = [{:?}]\n", s(&fx.media().join("skip1"))),
    )
    .unwrap();

    let (result, _) = fx.run(
        &[
            "find",
            "--search-dir",
            &s(&fx.media()),
            "--exclude-prefix",
            &s(&fx.media().join("skip2")),
        ],
        "",
    );

    assert_eq!(result.unwrap(), ExitCode::NoDuplicates);
}

#[test]
fn test_missing_search_dir_is_error() {
    let fx = Fixture::new();
    let missing = fx.dir.path().join("nope");

    let (result, _) = fx.run(&["find", "--search-dir", &s(&missing)], "");

    let err = result.unwrap_err();
    assert_eq!(exit_code_for(&err), ExitCode::GeneralError);
    assert!(format!("{err:#}").contains("Path not found"));
}

#[test]
fn test_zero_io_threads_is_error() {
    let fx = Fixture::new();
    let (result, _) = fx.run(
        &["find", "--search-dir", &s(&fx.media()), "--io-threads", "0"],
        "",
    );
    assert!(result.is_err());
}

#[test]
fn test_remove_nothing_to_do() {
    let fx = Fixture::new();
    fx.write("a", b"one");

    let (result, out) = fx.run(
        &[
            "remove",
            "--search-dir",
            &s(&fx.media()),
            "--remove-prefix",
            &s(&fx.media()),
        ],
        "",
    );

    assert_eq!(result.unwrap(), ExitCode::NoDuplicates);
    assert_eq!(out, "No duplicates found to remove.\n");
}

#[test]
fn test_remove_dry_run_touches_nothing() {
    let fx = Fixture::new();
    let keep = fx.write("archive/x", b"same");
    let dup = fx.write("inbox/x", b"same");

    let (result, out) = fx.run(
        &[
            "remove",
            "--search-dir",
            &s(&fx.media()),
            "--remove-prefix",
            &s(&fx.media().join("inbox")),
            "--dry-run",
        ],
        "",
    );

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(out.contains("Duplicates that would be moved to Trash:\n"));
    assert!(out.contains(&format!("{}\n", s(&dup))));
    assert!(!out.contains(&s(&keep)));
    assert!(out.contains("Total: 1\n"));
    assert!(keep.exists());
    assert!(dup.exists());
}

#[test]
fn test_remove_declined_prompt_aborts() {
    let fx = Fixture::new();
    let keep = fx.write("archive/x", b"same");
    let dup = fx.write("inbox/x", b"same");

    let (result, out) = fx.run(
        &[
            "remove",
            "--search-dir",
            &s(&fx.media()),
            "--remove-prefix",
            &s(&fx.media().join("inbox")),
        ],
        "n\n",
    );

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(out.contains("Are you sure you want to move these files to Trash? [y/N]: "));
    assert!(out.ends_with("Aborted.\n"));
    assert!(keep.exists());
    assert!(dup.exists());
}

#[test]
fn test_remove_json_needs_yes_or_dry_run() {
    let fx = Fixture::new();
    fx.write("a/x", b"same");
    fx.write("b/x", b"same");

    let (result, _) = fx.run(
        &[
            "remove",
            "--search-dir",
            &s(&fx.media()),
            "--remove-prefix",
            &s(&fx.media().join("b")),
            "--output",
            "json",
        ],
        "",
    );
    assert!(result.is_err());

    let (result, out) = fx.run(
        &[
            "remove",
            "--search-dir",
            &s(&fx.media()),
            "--remove-prefix",
            &s(&fx.media().join("b")),
            "--output",
            "json",
            "--dry-run",
        ],
        "",
    );
    assert_eq!(result.unwrap(), ExitCode::Success);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["dry_run"], true);
    assert_eq!(parsed["removals"].as_array().unwrap().len(), 1);
}
