//! Duplicate grouping.
//!
//! This module provides functionality for:
//! - Folding `(path, digest)` records into per-digest groups
//! - Emitting groups as soon as they have two or more members
//! - Re-emitting groups that grow after they were first emitted
//!
//! # Architecture
//!
//! - [`groups`]: [`DuplicateGroup`] and the [`LazyGroupBy`] state machine
//! - [`engine`]: the pipeline stage that polls and drains

pub mod engine;
pub mod groups;

pub use engine::{GroupingEngine, GroupingStats, DEFAULT_POLL_INTERVAL};
pub use groups::{DuplicateGroup, LazyGroupBy};
