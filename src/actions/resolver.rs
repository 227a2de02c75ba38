//! Resolution of duplicate groups.
//!
//! # Overview
//!
//! For each group the [`Resolver`] prints the members, then removes extra
//! copies in two phases:
//!
//! 1. **Automatic**: members inside an auto-delete directory are removed
//!    without asking, in group order.
//! 2. **Interactive**: the members left over are offered one by one to a
//!    [`Prompt`].
//!
//! A member may only go while more than one copy would remain afterwards,
//! so every group keeps at least one survivor whatever the prompt answers.
//!
//! # Dry run
//!
//! Without `really_delete` every decision is made and counted exactly as in
//! a real run; only the removal itself is skipped. Paths that would have
//! been removed are remembered, so a re-emitted group does not count them
//! as survivors.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use yansi::Paint;

use super::delete::{remove, RemovalMode};
use super::prompt::{Decision, Prompt};
use crate::duplicates::DuplicateGroup;
use crate::error::DedupError;
use crate::paths::VerifiedDirectory;

/// Deletion policy for one run.
#[derive(Debug, Clone, Default)]
pub struct ResolveConfig {
    /// Directories whose duplicate members are removed without asking
    pub auto_delete: Vec<VerifiedDirectory>,
    /// Ask about members that were not auto-deleted
    pub interactive: bool,
    /// Actually remove files (otherwise dry run)
    pub really_delete: bool,
    /// How files are removed
    pub removal: RemovalMode,
}

impl ResolveConfig {
    /// Whether the automatic phase runs.
    #[must_use]
    pub fn auto_delete_enabled(&self) -> bool {
        !self.auto_delete.is_empty()
    }
}

/// Totals from one resolution run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    /// Group emissions handled
    pub groups: usize,
    /// Files removed (or that would have been, in a dry run)
    pub deleted: usize,
    /// Removals that failed
    pub failed: usize,
    /// Bytes removed from disk (zero in a dry run)
    pub freed: u64,
    /// Files the user chose to keep
    pub declined: usize,
    /// Whether this was a dry run
    pub dry_run: bool,
}

/// Consumes duplicate groups and removes extra copies.
pub struct Resolver<P, W> {
    config: ResolveConfig,
    prompt: P,
    out: W,
    removed: HashSet<PathBuf>,
    declined: HashSet<PathBuf>,
    total_deleted: usize,
    failed: usize,
    freed: u64,
    groups: usize,
}

impl<P: Prompt, W: Write> Resolver<P, W> {
    /// Create a resolver writing its report to `out`.
    pub fn new(config: ResolveConfig, prompt: P, out: W) -> Self {
        Self {
            config,
            prompt,
            out,
            removed: HashSet::new(),
            declined: HashSet::new(),
            total_deleted: 0,
            failed: 0,
            freed: 0,
            groups: 0,
        }
    }

    /// Files removed so far across all groups.
    #[must_use]
    pub fn total_deleted(&self) -> usize {
        self.total_deleted
    }

    /// Display one group and apply the deletion policy to it.
    ///
    /// Returns the number of files removed from this group.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::Aborted`] when the prompt asks to stop, and
    /// [`DedupError::Console`] if output or the prompt fails.
    pub fn resolve(&mut self, group: &DuplicateGroup) -> Result<usize, DedupError> {
        self.groups += 1;
        self.show(group)?;

        let members: Vec<&Path> = group
            .iter()
            .filter(|p| !self.removed.contains(*p))
            .filter(|p| {
                let present = p.symlink_metadata().is_ok();
                if !present {
                    log::debug!("{} no longer exists, not counted", p.display());
                }
                present
            })
            .collect();

        let remaining = members.len();
        if remaining < 2 {
            log::debug!("Group {} has fewer than two live members", group.digest);
            return Ok(0);
        }

        let mut deleted = 0;
        let mut carried: Vec<&Path> = Vec::new();

        if self.config.auto_delete_enabled() {
            for (i, path) in members.iter().enumerate() {
                if remaining - deleted <= 1 {
                    carried.extend_from_slice(&members[i..]);
                    break;
                }
                if self.in_auto_delete_dir(path) {
                    if self.delete(path)? {
                        deleted += 1;
                    }
                } else {
                    carried.push(*path);
                }
            }
        } else {
            carried = members;
        }

        if self.config.interactive {
            for path in carried {
                if self.declined.contains(path) {
                    log::trace!("Already kept: {}", path.display());
                    continue;
                }
                if remaining - deleted <= 1 {
                    log::debug!("Keeping last copy: {}", path.display());
                    continue;
                }
                match self.prompt.ask(path)? {
                    Decision::Delete => {
                        if self.delete(path)? {
                            deleted += 1;
                        }
                    }
                    Decision::Keep => {
                        self.declined.insert(path.to_path_buf());
                    }
                    Decision::Abort => return Err(DedupError::Aborted),
                }
            }
        }

        Ok(deleted)
    }

    /// Write the final count and return the run totals.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::Console`] if the summary cannot be written.
    pub fn finish(mut self) -> Result<ResolutionSummary, DedupError> {
        if self.config.really_delete {
            writeln!(self.out, "Number of files deleted: {}", self.total_deleted)?;
        } else {
            writeln!(
                self.out,
                "Number of files that would have been deleted with --reallyDelete: {}",
                self.total_deleted
            )?;
        }
        self.out.flush()?;

        Ok(ResolutionSummary {
            groups: self.groups,
            deleted: self.total_deleted,
            failed: self.failed,
            freed: self.freed,
            declined: self.declined.len(),
            dry_run: !self.config.really_delete,
        })
    }

    fn show(&mut self, group: &DuplicateGroup) -> Result<(), DedupError> {
        let short = group.digest.get(..12).unwrap_or(&group.digest);
        let header = format!("{} identical files ({short})", group.len());
        writeln!(self.out, "{}", header.bold().cyan())?;
        for path in group.iter() {
            writeln!(self.out, "  {}", path.display())?;
        }
        Ok(())
    }

    fn in_auto_delete_dir(&self, path: &Path) -> bool {
        self.config.auto_delete.iter().any(|dir| dir.contains(path))
    }

    /// Remove (or pretend to remove) one file. Returns whether it counts.
    fn delete(&mut self, path: &Path) -> Result<bool, DedupError> {
        if !self.config.really_delete {
            writeln!(self.out, "Would have deleted {}", path.display())?;
        } else {
            writeln!(self.out, "Deleting {}", path.display())?;
            match remove(path, self.config.removal) {
                Ok(removed) => {
                    log::debug!(
                        "{:?} removal of {} freed {} bytes",
                        removed.mode,
                        removed.path.display(),
                        removed.size
                    );
                    self.freed += removed.size;
                }
                Err(e) => {
                    log::warn!("Could not delete {}: {}", e.path().display(), e);
                    self.failed += 1;
                    return Ok(false);
                }
            }
        }
        self.removed.insert(path.to_path_buf());
        self.total_deleted += 1;
        Ok(true)
    }
}
