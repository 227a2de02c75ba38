//! Fixed-size worker pool over a bounded queue.
//!
//! Workers are long-lived named threads pulling from one shared
//! [`crossbeam_channel`] queue. [`WorkerPool::submit`] blocks only while the
//! queue is full, which keeps a fast producer from running ahead of the
//! workers by more than the queue capacity.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Sender};

/// Errors from the worker pool.
#[derive(thiserror::Error, Debug)]
pub enum PoolError {
    /// A worker thread could not be started.
    #[error("failed to spawn worker {name}: {source}")]
    Spawn {
        /// Thread name
        name: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Work was submitted after every worker had exited.
    #[error("worker pool {0} is closed")]
    Closed(String),

    /// One or more workers panicked.
    #[error("{count} worker(s) in pool {name} panicked")]
    WorkerPanicked {
        /// Pool name
        name: String,
        /// Number of workers that panicked
        count: usize,
    },
}

/// A bounded queue drained by a fixed set of worker threads.
pub struct WorkerPool<T: Send + 'static> {
    name: String,
    sender: Option<Sender<T>>,
    workers: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Start `workers` threads that run `handler` on each submitted item.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Spawn`] if a thread cannot be created. Workers
    /// already started are shut down first.
    pub fn spawn<F>(
        name: &str,
        workers: usize,
        queue_capacity: usize,
        handler: F,
    ) -> Result<Self, PoolError>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let workers = workers.max(1);
        let (sender, receiver) = bounded::<T>(queue_capacity.max(1));
        let handler = Arc::new(handler);

        let mut pool = Self {
            name: name.to_string(),
            sender: Some(sender),
            workers: Vec::with_capacity(workers),
        };

        for index in 0..workers {
            let receiver = receiver.clone();
            let handler = Arc::clone(&handler);
            let thread_name = format!("{name}-{index}");

            let handle = thread::Builder::new()
                .name(thread_name.clone())
                .spawn(move || {
                    for item in receiver {
                        handler(item);
                    }
                })
                .map_err(|source| PoolError::Spawn {
                    name: thread_name,
                    source,
                });

            match handle {
                Ok(handle) => pool.workers.push(handle),
                Err(e) => {
                    // Dropping the pool closes the queue and joins what started.
                    drop(pool);
                    return Err(e);
                }
            }
        }

        log::debug!("Started pool {} with {} workers", name, workers);
        Ok(pool)
    }

    /// Queue one item, blocking while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Closed`] if the pool has been shut down or every
    /// worker is gone.
    pub fn submit(&self, item: T) -> Result<(), PoolError> {
        match &self.sender {
            Some(sender) => sender
                .send(item)
                .map_err(|_| PoolError::Closed(self.name.clone())),
            None => Err(PoolError::Closed(self.name.clone())),
        }
    }

    /// Number of worker threads.
    #[must_use]
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Close the queue, let workers finish what is queued, and join them.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::WorkerPanicked`] if any worker panicked.
    pub fn shutdown(mut self) -> Result<(), PoolError> {
        let panicked = self.join_all();
        if panicked > 0 {
            return Err(PoolError::WorkerPanicked {
                name: self.name.clone(),
                count: panicked,
            });
        }
        Ok(())
    }

    fn join_all(&mut self) -> usize {
        self.sender.take();
        self.workers
            .drain(..)
            .map(JoinHandle::join)
            .filter(Result::is_err)
            .count()
    }
}

impl<T: Send + 'static> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        let panicked = self.join_all();
        if panicked > 0 {
            log::error!("{} worker(s) in pool {} panicked", panicked, self.name);
        }
    }
}
