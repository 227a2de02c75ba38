//! The hashing stage of the pipeline.
//!
//! Reads candidate paths from a channel, digests them on a [`WorkerPool`],
//! and sends a [`HashRecord`] downstream for every file that hashed
//! successfully. Files that cannot be read are dropped; other failures are
//! retried per the [`RetryPolicy`] and logged once the budget is spent.
//! Output order follows completion, not input order.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use super::{with_retry, HashRecord, HashStrategy, RetryPolicy, WorkerPool};
use crate::cancel::CancelToken;
use crate::error::DedupError;

/// Counters from one hashing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashStats {
    /// Files hashed and sent downstream
    pub hashed: usize,
    /// Files dropped because they were unreadable or gone
    pub unavailable: usize,
    /// Files dropped after exhausting retries
    pub failed: usize,
}

#[derive(Default)]
struct Counters {
    hashed: AtomicUsize,
    unavailable: AtomicUsize,
    failed: AtomicUsize,
}

impl Counters {
    fn snapshot(&self) -> HashStats {
        HashStats {
            hashed: self.hashed.load(Ordering::Relaxed),
            unavailable: self.unavailable.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Concurrent file hasher.
#[derive(Debug, Clone)]
pub struct HashingEngine {
    strategy: HashStrategy,
    concurrency: usize,
    retry: RetryPolicy,
    cancel: CancelToken,
}

impl HashingEngine {
    /// Create an engine with the strategy's default concurrency.
    #[must_use]
    pub fn new(strategy: HashStrategy) -> Self {
        let concurrency = strategy.default_concurrency();
        Self {
            strategy,
            concurrency,
            retry: RetryPolicy::default(),
            cancel: CancelToken::new(),
        }
    }

    /// Override the number of worker threads.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Stop hashing new files once the token is cancelled.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Hash every path received on `input` and send results on `output`.
    ///
    /// Returns when `input` is closed and every queued path has been
    /// processed, or early once cancelled. `output` is dropped on return,
    /// which closes the channel for the next stage.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::Pool`] if the worker pool cannot be started
    /// or a worker panics.
    pub fn run(
        &self,
        input: Receiver<PathBuf>,
        output: Sender<HashRecord>,
    ) -> Result<HashStats, DedupError> {
        log::info!(
            "Hashing with {} strategy on {} workers",
            self.strategy.name(),
            self.concurrency
        );

        let counters = Arc::new(Counters::default());
        let pool = {
            let strategy = self.strategy.clone();
            let retry = self.retry;
            let cancel = self.cancel.clone();
            let counters = Arc::clone(&counters);
            let output = output.clone();

            WorkerPool::spawn("hasher", self.concurrency, self.concurrency, move |path: PathBuf| {
                if cancel.is_cancelled() {
                    return;
                }
                match with_retry(&retry, || strategy.digest(&path)) {
                    Ok(digest) => {
                        counters.hashed.fetch_add(1, Ordering::Relaxed);
                        if output.send(HashRecord { path, digest }).is_err() {
                            log::debug!("Hasher: downstream closed, stopping");
                            cancel.cancel();
                        }
                    }
                    Err(e) if e.is_permanent() => {
                        log::debug!("Skipping: {}", e);
                        counters.unavailable.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        log::error!("Giving up on {}: {}", path.display(), e);
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })?
        };
        drop(output);

        for path in input {
            if self.cancel.is_cancelled() {
                log::debug!("Hasher: cancellation requested, stopping");
                break;
            }
            pool.submit(path)?;
        }
        pool.shutdown()?;

        let stats = counters.snapshot();
        log::info!(
            "Hashing complete: {} hashed, {} unavailable, {} failed",
            stats.hashed,
            stats.unavailable,
            stats.failed
        );
        Ok(stats)
    }
}
