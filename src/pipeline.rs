//! The deduplication pipeline.
//!
//! ```text
//! scanner ──paths──▶ hashing pool ──(path, digest)──▶ grouper ──groups──▶ resolver
//! ```
//!
//! Every arrow is a bounded channel, so a slow stage (usually the resolver
//! waiting on a prompt) throttles the ones before it. The first three stages
//! run on scoped threads; the resolver runs on the calling thread.
//!
//! An abort from the prompt cancels the shared [`CancelToken`] and drops the
//! group receiver. Each upstream stage then finds its output closed and
//! winds down, and [`run_pipeline`] returns [`DedupError::Aborted`] once all
//! of them have been joined.

use std::io::Write;
use std::thread;

use crossbeam_channel::bounded;

use crate::actions::{Prompt, ResolutionSummary, ResolveConfig, Resolver};
use crate::cancel::CancelToken;
use crate::duplicates::{GroupingEngine, GroupingStats};
use crate::error::DedupError;
use crate::hashing::{HashStats, HashStrategy, HashingEngine, RetryPolicy};
use crate::options::DedupOptions;
use crate::paths::verify_all;
use crate::scanner::{scan, ScanStats};

/// Statistics from a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Traversal and size admission
    pub scan: ScanStats,
    /// Hashing
    pub hashing: HashStats,
    /// Grouping
    pub grouping: GroupingStats,
    /// Resolution
    pub resolution: ResolutionSummary,
}

/// Run the whole pipeline for `options`.
///
/// Groups and deletion lines go to `out`; interactive questions go to
/// `prompt`.
///
/// # Errors
///
/// - [`DedupError::Aborted`] if the prompt asked to stop
/// - [`DedupError::StageSpawn`] / [`DedupError::StagePanicked`] if a stage
///   thread failed
/// - [`DedupError::Pool`] if the hashing pool failed
/// - [`DedupError::Console`] if writing output failed
pub fn run_pipeline<P, W>(
    options: &DedupOptions,
    prompt: P,
    out: W,
) -> Result<RunSummary, DedupError>
where
    P: Prompt,
    W: Write,
{
    let roots = verify_all(&options.roots());
    let auto_delete = verify_all(&options.auto_delete);
    if roots.is_empty() {
        log::warn!("No usable directories to scan");
    }
    if options.auto_delete_enabled() && auto_delete.is_empty() {
        log::warn!("None of the auto-delete directories could be used");
    }

    let tuning = &options.tuning;
    let cancel = CancelToken::new();

    let strategy = HashStrategy::select(tuning.hash_strategy);
    let mut hasher = HashingEngine::new(strategy)
        .with_retry(RetryPolicy::with_attempts(tuning.retry_attempts))
        .with_cancel(cancel.clone());
    if let Some(n) = tuning.hash_concurrency {
        hasher = hasher.with_concurrency(n);
    }
    let grouper = GroupingEngine::new(tuning.poll_interval);

    let mut resolver = Resolver::new(
        ResolveConfig {
            auto_delete,
            interactive: options.interactive,
            really_delete: options.really_delete,
            removal: tuning.removal,
        },
        prompt,
        out,
    );

    let capacity = tuning.channel_capacity.max(1);
    let (path_tx, path_rx) = bounded(capacity);
    let (hash_tx, hash_rx) = bounded(capacity);
    let (group_tx, group_rx) = bounded(capacity);

    let candidates = scan(roots, options.scan_config()).with_cancel(cancel.clone());

    let (scan_stats, hash_stats, group_stats) = thread::scope(|s| {
        let scanner = thread::Builder::new()
            .name("scanner".into())
            .spawn_scoped(s, move || {
                let mut candidates = candidates;
                for path in candidates.by_ref() {
                    if path_tx.send(path).is_err() {
                        log::debug!("Scanner: hashing stage closed, stopping");
                        break;
                    }
                }
                candidates.stats()
            })
            .map_err(|source| DedupError::StageSpawn {
                stage: "scanner",
                source,
            })?;

        let hashing = thread::Builder::new()
            .name("hash-feeder".into())
            .spawn_scoped(s, move || hasher.run(path_rx, hash_tx))
            .map_err(|source| DedupError::StageSpawn {
                stage: "hashing",
                source,
            })?;

        let grouping = thread::Builder::new()
            .name("grouper".into())
            .spawn_scoped(s, move || grouper.run(hash_rx, group_tx))
            .map_err(|source| DedupError::StageSpawn {
                stage: "grouping",
                source,
            })?;

        let mut outcome = Ok(());
        for group in group_rx.iter() {
            if let Err(e) = resolver.resolve(&group) {
                outcome = Err(e);
                break;
            }
        }
        if outcome.is_err() {
            cancel.cancel();
        }
        drop(group_rx);

        let scanned = scanner.join();
        let hashed = hashing.join();
        let grouped = grouping.join();
        outcome?;

        Ok::<_, DedupError>((
            scanned.map_err(|_| DedupError::StagePanicked("scanner"))?,
            hashed.map_err(|_| DedupError::StagePanicked("hashing"))??,
            grouped.map_err(|_| DedupError::StagePanicked("grouping"))?,
        ))
    })?;

    let resolution = resolver.finish()?;
    let summary = RunSummary {
        scan: scan_stats,
        hashing: hash_stats,
        grouping: group_stats,
        resolution,
    };
    log::info!(
        "Run complete: {} files scanned, {} hashed, {} duplicate groups, {} files {} ({} bytes freed)",
        summary.scan.files,
        summary.hashing.hashed,
        summary.grouping.duplicate_groups,
        summary.resolution.deleted,
        if summary.resolution.dry_run {
            "would be deleted"
        } else {
            "deleted"
        },
        summary.resolution.freed
    );
    Ok(summary)
}
