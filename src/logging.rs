//! Diagnostic logging on stderr.
//!
//! Groups, deletion lines and the final count are program output and go to
//! stdout through the resolver. Everything here is diagnostics: stage start
//! and end at info, per-file decisions at debug and trace, recoverable
//! failures at warn.
//!
//! `RUST_LOG` wins over `-q`/`-v` when it is set.

use std::io::Write;

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Install the global logger. Call once, before the pipeline starts.
///
/// # Panics
///
/// Panics if a logger is already installed.
pub fn init_logging(verbose: u8, quiet: bool) {
    let level = level_for(verbose, quiet);
    let env = Env::default().default_filter_or(level.as_str());

    let mut builder = Builder::from_env(env);
    let detailed = cfg!(debug_assertions);
    let with_module = detailed && verbose > 0;

    builder.format(move |buf, record| {
        let style = buf.default_level_style(record.level());
        if detailed {
            let timestamp = buf.timestamp_seconds();
            write!(buf, "{timestamp} ")?;
        }
        write!(buf, "{style}{:<5}{style:#} ", record.level())?;
        if with_module {
            write!(buf, "[{}] ", record.module_path().unwrap_or("?"))?;
        }
        writeln!(buf, "{}", record.args())
    });
    builder.init();

    log::debug!("Logging at {} (RUST_LOG overrides)", level);
}

fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}
