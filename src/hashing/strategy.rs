//! Digest strategies.
//!
//! # Overview
//!
//! Two ways to compute a digest, chosen once per run:
//! - [`HashStrategy::Command`]: spawn `sha256sum` (or `shasum -a 256`) per file
//! - [`HashStrategy::Builtin`]: stream the file through SHA-256 in-process
//!
//! Both produce the same lowercase hex SHA-256 digest, so results are
//! comparable whichever strategy a run ended up with.

use std::env;
use std::ffi::OsString;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::HashError;

/// Read size for in-process hashing.
pub const CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// Default worker count when spawning one subprocess per file.
pub const COMMAND_CONCURRENCY: usize = 100;

/// Which strategy the caller wants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyPreference {
    /// Use the external command when present, otherwise hash in-process
    #[default]
    Auto,
    /// Require the external command, falling back with a warning if missing
    Command,
    /// Always hash in-process
    Builtin,
}

/// An external program that prints a SHA-256 digest for a file argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashCommand {
    /// Program to run
    pub program: PathBuf,
    /// Arguments placed before the file path
    pub args: Vec<OsString>,
}

impl HashCommand {
    /// Find a usable SHA-256 command on `PATH`.
    #[must_use]
    pub fn probe() -> Option<Self> {
        if let Some(program) = find_on_path("sha256sum") {
            return Some(Self {
                program,
                args: Vec::new(),
            });
        }
        find_on_path("shasum").map(|program| Self {
            program,
            args: vec!["-a".into(), "256".into()],
        })
    }

    fn digest(&self, path: &Path) -> Result<String, HashError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            // Unreadable files are recognised from the C-locale stderr text.
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| HashError::Spawn {
                path: path.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.contains("Permission denied") || stderr.contains("No such file") {
                return Err(HashError::Unavailable {
                    path: path.to_path_buf(),
                });
            }
            return Err(HashError::CommandFailed {
                path: path.to_path_buf(),
                status: output.status.to_string(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_digest(&stdout).ok_or_else(|| HashError::MalformedOutput {
            path: path.to_path_buf(),
            output: stdout.into_owned(),
        })
    }
}

/// The strategy a run hashes with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashStrategy {
    /// One subprocess per file.
    Command(HashCommand),
    /// Stream the file through SHA-256 in-process.
    Builtin,
}

impl HashStrategy {
    /// Pick a strategy for this run from the caller's preference and what
    /// the host provides.
    #[must_use]
    pub fn select(preference: StrategyPreference) -> Self {
        match preference {
            StrategyPreference::Builtin => Self::Builtin,
            StrategyPreference::Auto => HashCommand::probe().map_or(Self::Builtin, Self::Command),
            StrategyPreference::Command => match HashCommand::probe() {
                Some(command) => Self::Command(command),
                None => {
                    log::warn!("No sha256sum or shasum on PATH, hashing in-process");
                    Self::Builtin
                }
            },
        }
    }

    /// Worker count suited to this strategy.
    #[must_use]
    pub fn default_concurrency(&self) -> usize {
        match self {
            Self::Command(_) => COMMAND_CONCURRENCY,
            Self::Builtin => num_cpus::get().max(1),
        }
    }

    /// Compute the digest of one file (single attempt).
    ///
    /// # Errors
    ///
    /// Returns a [`HashError`]; [`HashError::is_permanent`] tells whether a
    /// retry could help.
    pub fn digest(&self, path: &Path) -> Result<String, HashError> {
        match self {
            Self::Command(command) => command.digest(path),
            Self::Builtin => digest_file(path),
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::Builtin => "builtin",
        }
    }
}

/// Hash a file in-process, reading it in [`CHUNK_SIZE`] chunks.
///
/// # Errors
///
/// Returns [`HashError::Unavailable`] for unreadable or missing files and
/// [`HashError::Io`] for anything else.
pub fn digest_file(path: &Path) -> Result<String, HashError> {
    let mut file = File::open(path).map_err(|e| HashError::from_io(path.to_path_buf(), e))?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(HashError::from_io(path.to_path_buf(), e)),
        };
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Extract the leading digest from hash command output.
///
/// coreutils prefixes the line with `\` when the file name had to be
/// escaped; that marker is accepted.
#[must_use]
pub fn parse_digest(output: &str) -> Option<String> {
    static DIGEST: OnceLock<Option<Regex>> = OnceLock::new();
    let re = DIGEST
        .get_or_init(|| Regex::new(r"^\\?([0-9a-fA-F]{64})(\s|$)").ok())
        .as_ref()?;
    re.captures(output)
        .map(|caps| caps[1].to_ascii_lowercase())
}

fn find_on_path(name: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
