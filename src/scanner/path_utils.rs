//! Path expansion and literal prefix matching.
//!
//! Exclusion and removal prefixes are plain string prefixes, not glob
//! patterns and not path components: the prefix `/media/b` matches both
//! `/media/b/clip.mov` and `/media/backup/clip.mov`. Callers that want
//! component semantics write the trailing separator themselves
//! (`/media/b/`).
//!
//! Both sides of every comparison are first turned into absolute paths,
//! with a leading `~` replaced by the user's home directory.
//!
//! # Example
//!
//! ```
//! use mediadupe::scanner::path_utils::{has_prefix, PrefixSet};
//! use std::path::Path;
//!
//! let set = PrefixSet::new(["/media/cache", "/media/tmp/"]);
//! assert!(set.matches(Path::new("/media/cache/a.mov")));
//! assert!(set.matches(Path::new("/media/cached.mov")));
//! assert!(!set.matches(Path::new("/media/tmp")));
//!
//! assert!(has_prefix(Path::new("/media/b/x"), Path::new("/media/b")));
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

/// Return the current user's home directory, if the platform exposes one.
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Replace a leading `~` (alone or followed by a separator) with the home directory.
///
/// `~user` forms are left untouched, as is everything when no home
/// directory can be determined.
///
/// # Example
///
/// ```
/// use mediadupe::scanner::path_utils::expand_home;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_home("/srv/media"), PathBuf::from("/srv/media"));
/// assert_eq!(expand_home("~someone/x"), PathBuf::from("~someone/x"));
/// ```
#[must_use]
pub fn expand_home(input: &str) -> PathBuf {
    expand_home_with(input, home_dir().as_deref())
}

fn expand_home_with(input: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(input);
    };

    if input == "~" {
        return home.to_path_buf();
    }

    let rest = input.strip_prefix("~/").or_else(|| {
        if cfg!(windows) {
            input.strip_prefix("~\\")
        } else {
            None
        }
    });

    match rest {
        Some(rest) => home.join(rest),
        None => PathBuf::from(input),
    }
}

/// Make a path absolute against the current working directory without touching the filesystem.
///
/// Symlinks are not resolved and trailing separators are kept, so the
/// literal prefix semantics of the input survive.
#[must_use]
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::path::absolute(path).unwrap_or_else(|e| {
        log::debug!("Could not absolutize {}: {}", path.display(), e);
        path.to_path_buf()
    })
}

/// Expand `~` and absolutize a user-supplied path or prefix.
#[must_use]
pub fn normalize_input(input: &str) -> PathBuf {
    absolutize(&expand_home(input))
}

/// Literal prefix test on the raw OS string of both paths.
#[must_use]
pub fn has_prefix(path: &Path, prefix: &Path) -> bool {
    path.as_os_str()
        .as_encoded_bytes()
        .starts_with(prefix.as_os_str().as_encoded_bytes())
}

/// A set of literal path prefixes.
///
/// A path matches the set if any member is a prefix of it. An empty set
/// matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixSet {
    prefixes: Vec<OsString>,
}

impl PrefixSet {
    /// Build a set from user-supplied prefix strings, expanding `~` and
    /// making each one absolute.
    ///
    /// Empty strings are dropped since they would match every path.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = prefixes
            .into_iter()
            .filter(|p| !p.as_ref().is_empty())
            .map(|p| normalize_input(p.as_ref()).into_os_string())
            .collect();
        Self { prefixes }
    }

    /// Build a set from prefixes that are already expanded and absolute.
    #[must_use]
    pub fn from_paths(prefixes: Vec<PathBuf>) -> Self {
        Self {
            prefixes: prefixes.into_iter().map(PathBuf::into_os_string).collect(),
        }
    }

    /// Check whether `path` starts with any prefix in the set.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        let bytes = path.as_os_str().as_encoded_bytes();
        self.prefixes
            .iter()
            .any(|p| bytes.starts_with(p.as_encoded_bytes()))
    }

    /// Number of prefixes in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether the set holds no prefixes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
