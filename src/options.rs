//! Options for one deduplication run.

use std::path::PathBuf;
use std::time::Duration;

use crate::actions::RemovalMode;
use crate::config::Config;
use crate::hashing::StrategyPreference;
use crate::scanner::ScanConfig;

/// Knobs that change performance, not results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuning {
    /// Which hash strategy to prefer
    pub hash_strategy: StrategyPreference,
    /// Hashing workers; `None` picks the strategy's default
    pub hash_concurrency: Option<usize>,
    /// Attempts per file
    pub retry_attempts: u32,
    /// Time between grouping drains
    pub poll_interval: Duration,
    /// Capacity of each inter-stage channel
    pub channel_capacity: usize,
    /// How files are removed
    pub removal: RemovalMode,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for Tuning {
    fn from(config: &Config) -> Self {
        Self {
            hash_strategy: config.hash_strategy,
            hash_concurrency: (config.hash_concurrency > 0).then_some(config.hash_concurrency),
            retry_attempts: config.retry_attempts.max(1),
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
            channel_capacity: config.channel_capacity.max(1),
            removal: if config.use_trash {
                RemovalMode::Trash
            } else {
                RemovalMode::Permanent
            },
        }
    }
}

/// Everything one run needs to know.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupOptions {
    /// Directories to traverse
    pub directories: Vec<PathBuf>,
    /// Directories whose duplicates are removed without asking; also traversed
    pub auto_delete: Vec<PathBuf>,
    /// Basenames to skip
    pub exclude: Vec<String>,
    /// Follow symbolic links
    pub follow_symlinks: bool,
    /// Include dot entries below the roots
    pub include_dotfiles: bool,
    /// Ask before removing files outside the auto-delete directories
    pub interactive: bool,
    /// Actually remove files; otherwise only report
    pub really_delete: bool,
    /// Performance settings
    pub tuning: Tuning,
}

impl DedupOptions {
    /// Options traversing `directories` with every policy off (a dry listing).
    #[must_use]
    pub fn new<I, P>(directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            directories: directories.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Whether the automatic deletion phase runs.
    #[must_use]
    pub fn auto_delete_enabled(&self) -> bool {
        !self.auto_delete.is_empty()
    }

    /// Traversal roots: the directories followed by the auto-delete directories.
    #[must_use]
    pub fn roots(&self) -> Vec<PathBuf> {
        self.directories
            .iter()
            .chain(&self.auto_delete)
            .cloned()
            .collect()
    }

    /// Traversal policy for the scanner.
    #[must_use]
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::new(
            self.exclude.iter().map(String::as_str),
            self.follow_symlinks,
            self.include_dotfiles,
        )
    }
}
