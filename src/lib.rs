//! dupsweep - find byte-identical files and prune the extra copies.
//!
//! The work is a four-stage pipeline connected by bounded channels:
//!
//! 1. [`scanner`]: walk the roots and keep only files whose size is shared
//! 2. [`hashing`]: SHA-256 every candidate on a worker pool, with retries
//! 3. [`duplicates`]: group paths by digest as results stream in
//! 4. [`actions`]: show each group and delete extra copies per policy,
//!    never the last one
//!
//! [`pipeline::run_pipeline`] wires them together.

pub mod actions;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod hashing;
pub mod logging;
pub mod options;
pub mod paths;
pub mod pipeline;
pub mod scanner;

use std::io::{self, IsTerminal};

use cli::Cli;
use config::Config;
use error::ExitCode;

/// Run the application for parsed command-line arguments.
///
/// Logging must already be initialized.
///
/// # Errors
///
/// Returns [`error::DedupError::Aborted`] (wrapped) when the user quits at a
/// prompt, and any other pipeline failure.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    if cli.no_color || !io::stdout().is_terminal() {
        yansi::disable();
    }

    let config = Config::load(cli.config.as_deref());
    let options = cli.into_options(&config);
    log::debug!("Options: {:?}", options);

    let stdout = io::stdout();
    pipeline::run_pipeline(&options, actions::ConsolePrompt::stdio(), stdout.lock())?;

    Ok(ExitCode::Success)
}
