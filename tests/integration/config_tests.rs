use dupsweep::config::Config;
use dupsweep::hashing::StrategyPreference;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

// Environment variables are process-wide.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_config_load_defaults() {
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
exclude = ["node_modules", "target"]
follow_symlinks = true
hash_strategy = "builtin"
hash_concurrency = 8
poll_interval_ms = 25
use_trash = true
"#,
    )
    .unwrap();

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract()
        .unwrap();

    assert_eq!(config.exclude, vec!["node_modules", "target"]);
    assert!(config.follow_symlinks);
    assert_eq!(config.hash_strategy, StrategyPreference::Builtin);
    assert_eq!(config.hash_concurrency, 8);
    assert_eq!(config.poll_interval_ms, 25);
    assert!(config.use_trash);
    assert_eq!(config.retry_attempts, 3);
}

#[test]
fn test_env_overrides_file() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "hash_concurrency = 8\nretry_attempts = 5\n").unwrap();

    std::env::set_var("DUPSWEEP_HASH_CONCURRENCY", "16");
    let config = Config::load(Some(&config_path));
    std::env::remove_var("DUPSWEEP_HASH_CONCURRENCY");

    assert_eq!(config.hash_concurrency, 16);
    assert_eq!(config.retry_attempts, 5);
}

#[test]
fn test_env_only() {
    let _guard = ENV_MUTEX.lock().unwrap();
    std::env::set_var("DUPSWEEP_HASH_STRATEGY", "command");
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("DUPSWEEP_"))
        .extract()
        .unwrap();
    std::env::remove_var("DUPSWEEP_HASH_STRATEGY");

    assert_eq!(config.hash_strategy, StrategyPreference::Command);
}

#[test]
fn test_invalid_file_falls_back_to_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "hash_concurrency = \"lots\"").unwrap();

    let strict: Result<Config, _> = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract();
    assert!(strict.is_err());

    assert_eq!(Config::load(Some(&config_path)), Config::default());
}

#[test]
fn test_missing_explicit_file_uses_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let temp_dir = tempdir().unwrap();
    let config = Config::load(Some(&temp_dir.path().join("absent.toml")));
    assert_eq!(config, Config::default());
}
