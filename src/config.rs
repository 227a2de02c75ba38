//! Layered application configuration.
//!
//! Settings are merged with `figment`, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config <PATH>`, or `config.toml` in the platform
//!    config directory)
//! 3. `DUPSWEEP_*` environment variables
//!
//! Command-line flags are applied on top by [`crate::cli::Cli::into_options`].
//!
//! ```toml
//! exclude = ["node_modules", "target"]
//! hash_strategy = "builtin"
//! hash_concurrency = 8
//! use_trash = true
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::hashing::StrategyPreference;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "DUPSWEEP_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Basenames to skip during traversal.
    pub exclude: Vec<String>,

    /// Follow symbolic links.
    pub follow_symlinks: bool,

    /// Include dot entries below the roots.
    pub include_dotfiles: bool,

    /// Preferred hash strategy.
    pub hash_strategy: StrategyPreference,

    /// Hashing workers; 0 picks the strategy's default.
    pub hash_concurrency: usize,

    /// Attempts per file before giving up.
    pub retry_attempts: u32,

    /// Milliseconds between grouping drains.
    pub poll_interval_ms: u64,

    /// Capacity of each channel between pipeline stages.
    pub channel_capacity: usize,

    /// Move deleted files to the system trash instead of unlinking them.
    pub use_trash: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            follow_symlinks: false,
            include_dotfiles: false,
            hash_strategy: StrategyPreference::Auto,
            hash_concurrency: 0,
            retry_attempts: 3,
            poll_interval_ms: 100,
            channel_capacity: 1024,
            use_trash: false,
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults if it is invalid.
    ///
    /// `explicit` overrides the platform config file location.
    #[must_use]
    pub fn load(explicit: Option<&Path>) -> Self {
        match Self::figment(explicit).extract() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// The provider stack used by [`Config::load`].
    #[must_use]
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let file = explicit.map(Path::to_path_buf).or_else(Self::config_path);
        if let Some(path) = file {
            if path.exists() {
                log::debug!("Reading configuration from {}", path.display());
                figment = figment.merge(Toml::file(path));
            } else if explicit.is_some() {
                log::warn!("Config file {} does not exist", path.display());
            }
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// The default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "dupsweep", "dupsweep")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
