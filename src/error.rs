//! Run-level errors and exit codes.

use thiserror::Error;

/// Exit codes for the dupsweep application.
///
/// - 0: Success (pipeline ran to completion)
/// - 0: Aborted (user quit during interactive confirmation, not a failure)
/// - 1: General error (unexpected failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: the pipeline ran to completion.
    Success,
    /// Aborted: the user asked to stop during interactive confirmation.
    Aborted,
    /// General error: an unexpected error occurred.
    GeneralError,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Success | Self::Aborted => 0,
            Self::GeneralError => 1,
        }
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::Aborted => "DS100",
        }
    }
}

/// Errors that end a pipeline run.
///
/// `Aborted` is the stable marker for a user-requested stop. Callers must
/// match on it (or downcast to it through `anyhow`) rather than inspect the
/// message text.
#[derive(Error, Debug)]
pub enum DedupError {
    /// The user asked to stop during interactive confirmation.
    #[error("operation aborted by user")]
    Aborted,

    /// A pipeline stage could not be started.
    #[error("failed to start {stage} stage: {source}")]
    StageSpawn {
        /// Name of the stage
        stage: &'static str,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A pipeline stage panicked.
    #[error("{0} stage panicked")]
    StagePanicked(&'static str),

    /// The hashing worker pool failed.
    #[error(transparent)]
    Pool(#[from] crate::hashing::PoolError),

    /// Writing console output or reading a prompt answer failed.
    #[error("console I/O failed: {0}")]
    Console(#[from] std::io::Error),
}

impl DedupError {
    /// Whether this error is the user-abort marker.
    #[must_use]
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

/// Whether an application-level error wraps [`DedupError::Aborted`].
#[must_use]
pub fn is_abort(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DedupError>()
        .is_some_and(DedupError::is_abort)
}
