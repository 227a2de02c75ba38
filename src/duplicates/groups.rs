//! Duplicate groups and the lazy-maximal group-by.
//!
//! # Overview
//!
//! [`LazyGroupBy`] keeps one state per digest in first-seen order. A state
//! becomes ready once it holds two or more paths and has grown since it was
//! last read. [`LazyGroupBy::next_ready`] scans the states round-robin from
//! a cursor so that a digest that keeps growing cannot starve the others.
//!
//! A group that grows after being read becomes ready again; each emission
//! carries the full membership known at that moment.
//!
//! # Example
//!
//! ```
//! use dupsweep::duplicates::LazyGroupBy;
//! use dupsweep::hashing::HashRecord;
//!
//! let mut groups = LazyGroupBy::new();
//! groups.insert(HashRecord::new("/a", "abcd"));
//! assert!(groups.next_ready().is_none());
//!
//! groups.insert(HashRecord::new("/b", "abcd"));
//! let group = groups.next_ready().unwrap();
//! assert_eq!(group.len(), 2);
//! assert!(groups.next_ready().is_none());
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::hashing::HashRecord;

/// Paths known to share one digest at the time of emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// SHA-256 digest shared by all paths (hex)
    pub digest: String,
    /// Paths in the order they were hashed
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(digest: impl Into<String>, paths: Vec<PathBuf>) -> Self {
        Self {
            digest: digest.into(),
            paths,
        }
    }

    /// Number of paths in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate over the member paths.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

#[derive(Debug)]
struct GroupState {
    digest: String,
    paths: Vec<PathBuf>,
    dirty: bool,
    has_duplicates: bool,
}

/// Streaming group-by over digests.
#[derive(Debug, Default)]
pub struct LazyGroupBy {
    index: HashMap<String, usize>,
    states: Vec<GroupState>,
    cursor: usize,
}

impl LazyGroupBy {
    /// Create an empty group-by.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one hashed file.
    pub fn insert(&mut self, record: HashRecord) {
        let HashRecord { path, digest } = record;
        match self.index.get(&digest) {
            Some(&i) => {
                let state = &mut self.states[i];
                state.paths.push(path);
                state.dirty = true;
                state.has_duplicates = true;
            }
            None => {
                self.index.insert(digest.clone(), self.states.len());
                self.states.push(GroupState {
                    digest,
                    paths: vec![path],
                    dirty: false,
                    has_duplicates: false,
                });
            }
        }
    }

    /// Take the next group that has grown since it was last read.
    pub fn next_ready(&mut self) -> Option<DuplicateGroup> {
        let len = self.states.len();
        for offset in 0..len {
            let i = (self.cursor + offset) % len;
            let state = &mut self.states[i];
            if state.dirty && state.has_duplicates {
                state.dirty = false;
                self.cursor = (i + 1) % len;
                return Some(DuplicateGroup::new(state.digest.clone(), state.paths.clone()));
            }
        }
        None
    }

    /// Take every ready group, in round-robin order.
    pub fn drain_ready(&mut self) -> Vec<DuplicateGroup> {
        std::iter::from_fn(|| self.next_ready()).collect()
    }

    /// Number of distinct digests seen.
    #[must_use]
    pub fn digests(&self) -> usize {
        self.states.len()
    }

    /// Number of digests shared by two or more paths.
    #[must_use]
    pub fn duplicate_digests(&self) -> usize {
        self.states.iter().filter(|s| s.has_duplicates).count()
    }
}
