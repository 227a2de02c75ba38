//! Content hashing for candidate files.
//!
//! This module provides functionality for:
//! - Choosing a hash strategy once per run (external command or in-process SHA-256)
//! - Computing a digest for a single file
//! - Retrying transient failures with bounded backoff
//! - Running the hashing stage on a fixed worker pool
//!
//! # Architecture
//!
//! - [`strategy`]: the closed set of digest strategies and their probing
//! - [`retry`]: the retry budget and backoff schedule
//! - [`pool`]: bounded work queue with long-lived worker threads
//! - [`engine`]: the pipeline stage tying the three together

pub mod engine;
pub mod pool;
pub mod retry;
pub mod strategy;

use std::path::PathBuf;

pub use engine::{HashStats, HashingEngine};
pub use pool::{PoolError, WorkerPool};
pub use retry::{with_retry, RetryPolicy};
pub use strategy::{HashCommand, HashStrategy, StrategyPreference};

/// A successfully hashed candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRecord {
    /// Path to the file
    pub path: PathBuf,
    /// Lowercase hexadecimal SHA-256 digest (64 chars)
    pub digest: String,
}

impl HashRecord {
    /// Create a new HashRecord.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, digest: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            digest: digest.into(),
        }
    }
}

/// Errors that can occur while hashing one file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file cannot be read (permission denied) or is gone.
    #[error("File unavailable: {path}")]
    Unavailable {
        /// Path that could not be read
        path: PathBuf,
    },

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The hash command could not be started.
    #[error("failed to run hash command for {path}: {source}")]
    Spawn {
        /// Path being hashed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The hash command exited unsuccessfully.
    #[error("hash command failed for {path} ({status}): {stderr}")]
    CommandFailed {
        /// Path being hashed
        path: PathBuf,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// The hash command printed something that does not start with a digest.
    #[error("unexpected hash command output for {path}: {output:?}")]
    MalformedOutput {
        /// Path being hashed
        path: PathBuf,
        /// The offending output
        output: String,
    },
}

impl HashError {
    /// Permanent failures are dropped without retrying.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Classify an I/O error from opening or reading `path`.
    #[must_use]
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::PermissionDenied | std::io::ErrorKind::NotFound => {
                Self::Unavailable { path }
            }
            _ => Self::Io { path, source },
        }
    }
}
