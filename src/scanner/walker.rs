//! Multi-root directory walker.
//!
//! # Overview
//!
//! [`Walker`] walks each verified root in turn using [`walkdir`], sharing
//! one visited-directory set across all roots. A directory is read at most
//! once even when it is reachable from several roots or, with symlink
//! following on, through a link cycle. Directory entries are sorted by
//! name so a given tree always produces the same order.
//!
//! The walker applies the traversal policy from [`ScanConfig`]:
//! - excluded basenames are skipped (directories are not entered)
//! - dot entries below a root are skipped unless dotfiles are included
//! - unfollowed symlinks are ignored
//!
//! Errors never stop the walk; they are logged and counted.

use std::collections::{HashSet, VecDeque};
use std::fs;

use walkdir::{DirEntry, WalkDir};

use super::{FileRecord, ScanConfig, ScanStats};
use crate::cancel::CancelToken;
use crate::paths::{path_key, VerifiedDirectory};

/// What to do with one directory entry.
enum Visit {
    /// A directory that should be read.
    Descend,
    /// Ignore the entry; `prune` also stops walkdir entering it.
    Skip { prune: bool },
    /// A regular file to hand on.
    Record(FileRecord),
}

/// Directory walker over several roots.
#[derive(Debug)]
pub struct Walker {
    config: ScanConfig,
    roots: VecDeque<VerifiedDirectory>,
    current: Option<walkdir::IntoIter>,
    visited: HashSet<String>,
    seen_files: HashSet<String>,
    stats: ScanStats,
    cancel: Option<CancelToken>,
}

impl Walker {
    /// Create a walker for the given roots.
    #[must_use]
    pub fn new(roots: Vec<VerifiedDirectory>, config: ScanConfig) -> Self {
        Self {
            config,
            roots: roots.into(),
            current: None,
            visited: HashSet::new(),
            seen_files: HashSet::new(),
            stats: ScanStats::default(),
            cancel: None,
        }
    }

    /// Stop yielding records once the token is cancelled.
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Counters collected so far.
    #[must_use]
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    fn open_root(&self, root: &VerifiedDirectory) -> walkdir::IntoIter {
        log::debug!("Walking {}", root.path().display());
        WalkDir::new(root.path())
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
    }

    fn classify(&mut self, entry: &DirEntry) -> Visit {
        let name = entry.file_name();

        if self.config.is_excluded(name) {
            log::trace!("Excluded: {}", entry.path().display());
            self.stats.skipped += 1;
            return Visit::Skip { prune: true };
        }

        if entry.depth() > 0
            && !self.config.include_dotfiles
            && name.to_string_lossy().starts_with('.')
        {
            log::trace!("Skipping dot entry: {}", entry.path().display());
            self.stats.skipped += 1;
            return Visit::Skip { prune: true };
        }

        let file_type = entry.file_type();

        // With follow_links on, walkdir reports the target's type instead.
        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return Visit::Skip { prune: false };
        }

        if file_type.is_dir() {
            let key = fs::canonicalize(entry.path())
                .map(|p| path_key(&p))
                .unwrap_or_else(|_| path_key(entry.path()));
            if !self.visited.insert(key) {
                log::debug!("Already visited: {}", entry.path().display());
                return Visit::Skip { prune: true };
            }
            self.stats.directories += 1;
            return Visit::Descend;
        }

        if !file_type.is_file() {
            return Visit::Skip { prune: false };
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                log::warn!("Cannot stat {}: {}", entry.path().display(), e);
                self.stats.errors += 1;
                return Visit::Skip { prune: false };
            }
        };

        // Keyed by the real file so a followed link and its target are one candidate.
        let path = entry.path().to_path_buf();
        let key = fs::canonicalize(&path)
            .map(|p| path_key(&p))
            .unwrap_or_else(|_| path_key(&path));
        if !self.seen_files.insert(key) {
            log::debug!("Already recorded through another path: {}", path.display());
            return Visit::Skip { prune: false };
        }

        self.stats.files += 1;
        Visit::Record(FileRecord::new(path, metadata.len(), inode_of(&metadata)))
    }
}

impl Iterator for Walker {
    type Item = FileRecord;

    fn next(&mut self) -> Option<FileRecord> {
        loop {
            if self.is_cancelled() {
                log::debug!("Walker: cancellation requested, stopping");
                return None;
            }

            let Some(iter) = self.current.as_mut() else {
                let root = self.roots.pop_front()?;
                self.current = Some(self.open_root(&root));
                continue;
            };

            let entry = match iter.next() {
                None => {
                    self.current = None;
                    continue;
                }
                Some(Err(e)) => {
                    if e.loop_ancestor().is_some() {
                        log::debug!("Symlink loop: {}", e);
                    } else {
                        log::warn!("Walker error: {}", e);
                    }
                    self.stats.errors += 1;
                    continue;
                }
                Some(Ok(entry)) => entry,
            };

            match self.classify(&entry) {
                Visit::Record(record) => return Some(record),
                Visit::Descend => {}
                Visit::Skip { prune } => {
                    if prune && entry.file_type().is_dir() {
                        if let Some(iter) = self.current.as_mut() {
                            iter.skip_current_dir();
                        }
                    }
                }
            }
        }
    }
}

#[cfg(unix)]
fn inode_of(metadata: &fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.ino()
}

#[cfg(not(unix))]
fn inode_of(_metadata: &fs::Metadata) -> u64 {
    0
}
