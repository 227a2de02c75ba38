//! Acting on duplicate groups.
//!
//! This module provides functionality for:
//! - Displaying each duplicate group
//! - Removing copies inside auto-delete directories
//! - Asking about the rest in interactive mode
//! - Never removing the last copy of any content
//!
//! # Architecture
//!
//! - [`resolver`]: per-group policy and the survivor invariant
//! - [`prompt`]: the interactive yes/no/quit question
//! - [`delete`]: permanent or trash removal of a single file
//!
//! ```no_run
//! use dupsweep::actions::{ConsolePrompt, ResolveConfig, Resolver};
//! use dupsweep::duplicates::DuplicateGroup;
//!
//! let config = ResolveConfig { interactive: true, ..ResolveConfig::default() };
//! let mut resolver = Resolver::new(config, ConsolePrompt::stdio(), std::io::stdout());
//! let group = DuplicateGroup::new("abcd", vec!["/a".into(), "/b".into()]);
//! resolver.resolve(&group)?;
//! resolver.finish()?;
//! # Ok::<(), dupsweep::error::DedupError>(())
//! ```

pub mod delete;
pub mod prompt;
pub mod resolver;

pub use delete::{DeleteError, RemovalMode};
pub use prompt::{ConsolePrompt, Decision, Prompt};
pub use resolver::{ResolutionSummary, ResolveConfig, Resolver};
