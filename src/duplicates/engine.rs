//! The grouping stage of the pipeline.
//!
//! Records are folded into a [`LazyGroupBy`] as they arrive. Once per poll
//! interval every ready group is sent downstream; a final drain runs when
//! the hashing stage closes its channel, so every duplicate set is emitted
//! with its complete membership before the output ends.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use super::{DuplicateGroup, LazyGroupBy};
use crate::hashing::HashRecord;

/// Default time between drains.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Counters from one grouping run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Hash records received
    pub records: usize,
    /// Distinct digests seen
    pub digests: usize,
    /// Digests shared by two or more files
    pub duplicate_groups: usize,
    /// Groups sent downstream, counting re-emissions
    pub emissions: usize,
}

/// Streaming grouper with a fixed poll interval.
#[derive(Debug, Clone)]
pub struct GroupingEngine {
    poll_interval: Duration,
}

impl Default for GroupingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl GroupingEngine {
    /// Create an engine that drains every `poll_interval`.
    #[must_use]
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Group records from `input` and send ready groups on `output`.
    ///
    /// Returns once `input` is closed and the final drain is done, or as
    /// soon as `output` has no receiver.
    pub fn run(&self, input: Receiver<HashRecord>, output: Sender<DuplicateGroup>) -> GroupingStats {
        let mut groups = LazyGroupBy::new();
        let mut stats = GroupingStats::default();
        let mut next_tick = Instant::now() + self.poll_interval;

        loop {
            match input.recv_deadline(next_tick) {
                Ok(record) => {
                    log::trace!("{}  {}", record.digest, record.path.display());
                    stats.records += 1;
                    groups.insert(record);
                    if Instant::now() < next_tick {
                        continue;
                    }
                    // A steady stream never times out; drain on schedule anyway.
                    if !Self::drain(&mut groups, &output, &mut stats) {
                        log::debug!("Grouper: downstream closed, stopping");
                        break;
                    }
                    next_tick = Instant::now() + self.poll_interval;
                }
                Err(RecvTimeoutError::Timeout) => {
                    if !Self::drain(&mut groups, &output, &mut stats) {
                        log::debug!("Grouper: downstream closed, stopping");
                        break;
                    }
                    next_tick = Instant::now() + self.poll_interval;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    Self::drain(&mut groups, &output, &mut stats);
                    break;
                }
            }
        }

        stats.digests = groups.digests();
        stats.duplicate_groups = groups.duplicate_digests();
        log::info!(
            "Grouping complete: {} records, {} digests, {} duplicate groups",
            stats.records,
            stats.digests,
            stats.duplicate_groups
        );
        stats
    }

    /// Send every ready group. Returns false if the receiver is gone.
    fn drain(
        groups: &mut LazyGroupBy,
        output: &Sender<DuplicateGroup>,
        stats: &mut GroupingStats,
    ) -> bool {
        while let Some(group) = groups.next_ready() {
            if output.send(group).is_err() {
                return false;
            }
            stats.emissions += 1;
        }
        true
    }
}
