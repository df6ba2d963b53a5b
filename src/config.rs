//! Layered configuration.
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`--config <PATH>`, or `config.toml` in the platform
//!    config directory)
//! 3. Environment variables prefixed with `MEDIADUPE_`
//! 4. Command-line flags, applied by the caller
//!
//! ```toml
//! exclude_prefixes = ["~/Videos/raw", "/mnt/backup/.snapshots"]
//! by_name = false
//! io_threads = 4
//! block_size = 131072
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::scanner::{BLOCK_SIZE, MAX_BLOCK_SIZE};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "MEDIADUPE_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefixes skipped by every scan, merged with `--exclude-prefix`.
    pub exclude_prefixes: Vec<String>,
    /// Compare by file name instead of content.
    pub by_name: bool,
    /// Fingerprinting threads.
    pub io_threads: usize,
    /// Sampled block size for large files, in bytes.
    pub block_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude_prefixes: Vec::new(),
            by_name: false,
            io_threads: 4,
            block_size: BLOCK_SIZE,
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// A source could not be parsed or had the wrong shape.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// `io_threads` was zero.
    #[error("io_threads must be at least 1")]
    ZeroIoThreads,

    /// `block_size` was zero.
    #[error("block_size must be at least 1")]
    ZeroBlockSize,

    /// `block_size` was too large to double.
    #[error("block_size must be at most {max}, got {0}", max = MAX_BLOCK_SIZE)]
    BlockSizeTooLarge(u64),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Invalid(Box::new(e))
    }
}

impl Config {
    /// Load defaults, the config file, and the environment.
    ///
    /// An explicit `path` must exist; the default location may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit file is missing, a source is
    /// malformed, or a value is out of range.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) if !p.exists() => return Err(ConfigError::NotFound(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        if let Some(ref f) = file {
            log::debug!("Reading configuration from {}", f.display());
        }

        Self::from_figment(Self::figment(file.as_deref(), Env::prefixed(ENV_PREFIX)))
    }

    /// Build the provider stack without extracting it.
    #[must_use]
    pub fn figment(file: Option<&Path>, env: Env) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(env)
    }

    /// Extract and validate a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed input or out-of-range values.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroIoThreads`], [`ConfigError::ZeroBlockSize`],
    /// or [`ConfigError::BlockSizeTooLarge`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.io_threads == 0 {
            return Err(ConfigError::ZeroIoThreads);
        }
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if self.block_size > MAX_BLOCK_SIZE {
            return Err(ConfigError::BlockSizeTooLarge(self.block_size));
        }
        Ok(())
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "mediadupe").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
