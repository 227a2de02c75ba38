//! Command-line interface definitions for dupsweep.
//!
//! This module defines all CLI arguments using the clap derive API. Without
//! `--reallyDelete` every run is a dry run: groups are listed and the files
//! that would go are reported, but nothing is removed.
//!
//! # Example
//!
//! ```bash
//! # List duplicate groups under two trees
//! dupsweep ~/Photos ~/Backup/Photos
//!
//! # Remove every copy inside ~/Backup that has a twin elsewhere
//! dupsweep ~/Photos --auto-delete ~/Backup --reallyDelete
//!
//! # Ask about each extra copy
//! dupsweep -i ~/Downloads --exclude node_modules --reallyDelete
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::actions::RemovalMode;
use crate::config::Config;
use crate::hashing::StrategyPreference;
use crate::options::{DedupOptions, Tuning};

/// Find byte-identical files and prune the extra copies.
///
/// Files are compared by size first and then by SHA-256 of their content.
/// At least one copy of every file is always kept.
#[derive(Debug, Parser)]
#[command(name = "dupsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan for duplicates
    #[arg(value_name = "DIR", required_unless_present = "auto_delete")]
    pub directories: Vec<PathBuf>,

    /// Ask before deleting each duplicate outside the auto-delete directories
    #[arg(short, long)]
    pub interactive: bool,

    /// Include files and directories whose name starts with '.'
    #[arg(long)]
    pub dotfiles: bool,

    /// Follow symbolic links during the scan
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Actually delete files (without this flag nothing is removed)
    #[arg(long = "reallyDelete", alias = "really-delete")]
    pub really_delete: bool,

    /// Delete duplicates inside this directory without asking (repeatable)
    ///
    /// The directory is scanned as well.
    #[arg(long = "auto-delete", value_name = "DIR")]
    pub auto_delete: Vec<PathBuf>,

    /// Skip files and directories with this exact name (repeatable)
    #[arg(short = 'x', long, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// How to compute digests
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub hash_strategy: Option<StrategyPreference>,

    /// Number of hashing workers
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Move deleted files to the system trash instead of unlinking them
    #[arg(long)]
    pub trash: bool,

    /// Read settings from this TOML file
    #[arg(long, value_name = "PATH", env = "DUPSWEEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

impl Cli {
    /// Merge these flags over the loaded configuration.
    ///
    /// Switches are enabled if either source enables them; exclusion names
    /// from both are combined; explicit tuning flags win.
    #[must_use]
    pub fn into_options(self, config: &Config) -> DedupOptions {
        let mut tuning = Tuning::from(config);
        if let Some(strategy) = self.hash_strategy {
            tuning.hash_strategy = strategy;
        }
        if let Some(n) = self.concurrency {
            tuning.hash_concurrency = Some(n.max(1));
        }
        if self.trash {
            tuning.removal = RemovalMode::Trash;
        }

        let mut exclude = config.exclude.clone();
        for name in self.exclude {
            if !exclude.contains(&name) {
                exclude.push(name);
            }
        }

        DedupOptions {
            directories: self.directories,
            auto_delete: self.auto_delete,
            exclude,
            follow_symlinks: self.follow_symlinks || config.follow_symlinks,
            include_dotfiles: self.dotfiles || config.include_dotfiles,
            interactive: self.interactive,
            really_delete: self.really_delete,
            tuning,
        }
    }
}
