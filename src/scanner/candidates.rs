//! Size admission: only files that share their size with another file
//! are worth hashing.
//!
//! # Overview
//!
//! Admission streams. The first file of a given size is held back; when a
//! second file of that size shows up both are released, and every later
//! file of that size is released straight away. Whatever is still held
//! back when the walk ends has a globally unique size and is dropped
//! without ever being read.
//!
//! # Example
//!
//! ```
//! use dupsweep::scanner::{FileRecord, SizeFilter};
//! use std::collections::VecDeque;
//! use std::path::PathBuf;
//!
//! let mut filter = SizeFilter::new();
//! let mut ready = VecDeque::new();
//!
//! filter.admit(FileRecord::new(PathBuf::from("/a"), 10, 1), &mut ready);
//! assert!(ready.is_empty());
//!
//! filter.admit(FileRecord::new(PathBuf::from("/b"), 10, 2), &mut ready);
//! assert_eq!(ready.len(), 2);
//! ```

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use super::{FileRecord, ScanConfig, ScanStats, Walker};
use crate::cancel::CancelToken;
use crate::paths::VerifiedDirectory;

enum SizeSlot {
    /// Only one file of this size so far.
    Pending(FileRecord),
    /// Two or more files of this size; all have been released.
    Shared,
}

/// Streaming size-based admission filter.
#[derive(Default)]
pub struct SizeFilter {
    slots: HashMap<u64, SizeSlot>,
    inodes: HashMap<u64, PathBuf>,
    released: usize,
}

impl SizeFilter {
    /// Create an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a record; any paths that become candidates are pushed onto `ready`.
    pub fn admit(&mut self, record: FileRecord, ready: &mut VecDeque<PathBuf>) {
        let size = record.size;
        match self.slots.insert(size, SizeSlot::Shared) {
            None => {
                self.slots.insert(size, SizeSlot::Pending(record));
            }
            Some(SizeSlot::Pending(first)) => {
                self.release(first, ready);
                self.release(record, ready);
            }
            Some(SizeSlot::Shared) => self.release(record, ready),
        }
    }

    /// Number of records whose size is, so far, unique.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, SizeSlot::Pending(_)))
            .count()
    }

    /// Number of paths released as candidates.
    #[must_use]
    pub fn released(&self) -> usize {
        self.released
    }

    fn release(&mut self, record: FileRecord, ready: &mut VecDeque<PathBuf>) {
        if record.inode != 0 {
            if let Some(other) = self.inodes.get(&record.inode) {
                log::debug!(
                    "{} and {} share inode {}; treating them as separate files",
                    other.display(),
                    record.path.display(),
                    record.inode
                );
            } else {
                self.inodes.insert(record.inode, record.path.clone());
            }
        }
        self.released += 1;
        ready.push_back(record.path);
    }
}

/// Lazy, finite sequence of candidate paths.
///
/// Created by [`scan`]. Hashing can start on the first candidates while
/// the walk is still running.
pub struct Candidates {
    walker: Walker,
    filter: SizeFilter,
    ready: VecDeque<PathBuf>,
    finished: bool,
}

impl Candidates {
    /// Stop the underlying walk once the token is cancelled.
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.walker = self.walker.with_cancel(token);
        self
    }

    /// Counters for the traversal and admission so far.
    #[must_use]
    pub fn stats(&self) -> ScanStats {
        ScanStats {
            candidates: self.filter.released(),
            unique_sizes: self.filter.pending(),
            ..self.walker.stats().clone()
        }
    }
}

impl Iterator for Candidates {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            if let Some(path) = self.ready.pop_front() {
                return Some(path);
            }
            if self.finished {
                return None;
            }
            match self.walker.next() {
                Some(record) => self.filter.admit(record, &mut self.ready),
                None => {
                    self.finished = true;
                    let stats = self.stats();
                    log::info!(
                        "Scan complete: {} files in {} directories, {} candidates, {} unique sizes dropped",
                        stats.files,
                        stats.directories,
                        stats.candidates,
                        stats.unique_sizes
                    );
                }
            }
        }
    }
}

/// Walk `roots` and yield every file whose size is shared with another file.
#[must_use]
pub fn scan(roots: Vec<VerifiedDirectory>, config: ScanConfig) -> Candidates {
    Candidates {
        walker: Walker::new(roots, config),
        filter: SizeFilter::new(),
        ready: VecDeque::new(),
        finished: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::verify_directory;
    use std::fs;
    use tempfile::TempDir;

    fn record(path: &str, size: u64) -> FileRecord {
        FileRecord::new(PathBuf::from(path), size, 0)
    }

    #[test]
    fn test_size_filter_holds_back_first_of_size() {
        let mut filter = SizeFilter::new();
        let mut ready = VecDeque::new();

        filter.admit(record("/a", 3), &mut ready);
        filter.admit(record("/b", 4), &mut ready);

        assert!(ready.is_empty());
        assert_eq!(filter.pending(), 2);
    }

    #[test]
    fn test_size_filter_releases_pairs_then_followers() {
        let mut filter = SizeFilter::new();
        let mut ready = VecDeque::new();

        filter.admit(record("/a", 3), &mut ready);
        filter.admit(record("/b", 3), &mut ready);
        assert_eq!(ready, vec![PathBuf::from("/a"), PathBuf::from("/b")]);

        filter.admit(record("/c", 3), &mut ready);
        assert_eq!(ready.len(), 3);
        assert_eq!(filter.released(), 3);
        assert_eq!(filter.pending(), 0);
    }

    #[test]
    fn test_scan_drops_unique_sizes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bar"), "123").unwrap();
        fs::write(dir.path().join("baz"), "123").unwrap();
        fs::write(dir.path().join("foo"), "123").unwrap();
        fs::create_dir(dir.path().join("tmp")).unwrap();
        fs::write(dir.path().join("tmp/zoo"), "1234").unwrap();

        let root = verify_directory(dir.path()).unwrap();
        let mut candidates = scan(vec![root], ScanConfig::default());
        let paths: Vec<_> = candidates.by_ref().collect();

        assert_eq!(
            paths,
            vec![
                dir.path().join("bar"),
                dir.path().join("baz"),
                dir.path().join("foo"),
            ]
        );
        let stats = candidates.stats();
        assert_eq!(stats.files, 4);
        assert_eq!(stats.candidates, 3);
        assert_eq!(stats.unique_sizes, 1);
    }

    #[test]
    fn test_scan_same_size_different_content_is_still_a_candidate() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a"), "abc").unwrap();
        fs::write(dir.path().join("b"), "xyz").unwrap();

        let root = verify_directory(dir.path()).unwrap();
        assert_eq!(scan(vec![root], ScanConfig::default()).count(), 2);
    }

    #[test]
    fn test_scan_empty_root_set() {
        assert_eq!(scan(Vec::new(), ScanConfig::default()).count(), 0);
    }

    #[test]
    fn test_scan_stops_when_cancelled() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a"), "same").unwrap();
        fs::write(dir.path().join("b"), "same").unwrap();

        let token = CancelToken::new();
        token.cancel();
        let root = verify_directory(dir.path()).unwrap();
        let candidates = scan(vec![root], ScanConfig::default()).with_cancel(token);
        assert_eq!(candidates.count(), 0);
    }
}
