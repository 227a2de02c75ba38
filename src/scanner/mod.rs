//! Candidate discovery: directory traversal and size admission.
//!
//! This module provides functionality for:
//! - Walking several roots with a shared visited-directory set
//! - Applying the exclusion, dotfile and symlink policy
//! - Streaming out only files whose size is shared with another file
//!
//! # Architecture
//!
//! - [`walker`]: multi-root traversal yielding [`FileRecord`]s
//! - [`candidates`]: size admission on top of the walker
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::paths::verify_all;
//! use dupsweep::scanner::{scan, ScanConfig};
//!
//! let roots = verify_all(&["/home/user/Downloads"]);
//! for path in scan(roots, ScanConfig::default()) {
//!     println!("candidate: {}", path.display());
//! }
//! ```

pub mod candidates;
pub mod walker;

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

pub use candidates::{scan, Candidates, SizeFilter};
pub use walker::Walker;

/// A regular file seen during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path to the file as reached from its root
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Inode number (0 on platforms without inodes)
    pub inode: u64,
}

impl FileRecord {
    /// Create a new FileRecord.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, inode: u64) -> Self {
        Self { path, size, inode }
    }
}

/// Traversal policy.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Basenames to skip wherever they appear (files and directories).
    pub exclude: HashSet<OsString>,

    /// Follow symbolic links. When off, symlinks are neither recorded nor
    /// descended into.
    pub follow_symlinks: bool,

    /// Include files and directories whose name starts with `.`.
    pub include_dotfiles: bool,
}

impl ScanConfig {
    /// Create a configuration from the exclusion list and the two flags.
    #[must_use]
    pub fn new<I, S>(exclude: I, follow_symlinks: bool, include_dotfiles: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            exclude: exclude.into_iter().map(Into::into).collect(),
            follow_symlinks,
            include_dotfiles,
        }
    }

    /// Whether a basename is on the exclusion list.
    #[must_use]
    pub fn is_excluded(&self, name: &OsStr) -> bool {
        self.exclude.contains(name)
    }
}

/// Counters from one traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Directories read
    pub directories: usize,
    /// Regular files recorded
    pub files: usize,
    /// Files handed on for hashing
    pub candidates: usize,
    /// Files dropped because no other file has their size
    pub unique_sizes: usize,
    /// Entries skipped by the exclusion or dotfile policy
    pub skipped: usize,
    /// Traversal errors (unreadable directories, symlink loops, ...)
    pub errors: usize,
}
