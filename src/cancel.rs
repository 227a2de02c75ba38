//! Cooperative cancellation shared across pipeline stages.
//!
//! The only trigger is an explicit abort during interactive confirmation.
//! The driver raises the token; the scanner, the hashing feeder and the
//! hashing workers check it between units of work and wind down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag observed by every stage of one pipeline run.
///
/// Cloning yields a handle to the same flag. Each run creates its own
/// token, so concurrent runs (as in tests) never see each other's aborts.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token with cancellation not yet requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
