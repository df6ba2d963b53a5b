use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use mediadupe::config::{Config, ConfigError};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert!(config.exclude_prefixes.is_empty());
    assert!(!config.by_name);
    assert_eq!(config.io_threads, 4);
    assert_eq!(config.block_size, 131_072);
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
exclude_prefixes = ["~/Videos/raw", "/mnt/backup/.snapshots"]
by_name = true
io_threads = 8
block_size = 65536
"#,
    )
    .unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let config: Config = figment.extract().unwrap();

    assert_eq!(
        config.exclude_prefixes,
        vec!["~/Videos/raw", "/mnt/backup/.snapshots"]
    );
    assert!(config.by_name);
    assert_eq!(config.io_threads, 8);
    assert_eq!(config.block_size, 65_536);
}

#[test]
fn test_config_env_list() {
    std::env::set_var("MEDIADUPE_ITEST_EXCLUDE_PREFIXES", r#"["/a", "/b"]"#);
    let figment = Config::figment(None, Env::prefixed("MEDIADUPE_ITEST_"));
    let result = Config::from_figment(figment);
    std::env::remove_var("MEDIADUPE_ITEST_EXCLUDE_PREFIXES");

    assert_eq!(result.unwrap().exclude_prefixes, vec!["/a", "/b"]);
}

#[test]
fn test_config_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "invalid = = toml").unwrap();

    let result = Config::load(Some(&config_path));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_config_zero_threads_rejected() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = 0\n").unwrap();

    let result = Config::from_figment(Config::figment(
        Some(&config_path),
        Env::prefixed("MEDIADUPE_ITEST_ZERO_"),
    ));
    assert!(matches!(result, Err(ConfigError::ZeroIoThreads)));
}
