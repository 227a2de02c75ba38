//! Directory verification and path comparison helpers.
//!
//! The pipeline only ever walks [`VerifiedDirectory`] values. Raw inputs
//! from the command line go through [`verify_directory`]; anything that
//! fails verification is dropped with a warning by [`verify_all`] rather
//! than ending the run.
//!
//! # Unicode
//!
//! macOS stores names in NFD while Linux and Windows usually hand back NFC,
//! so the same visual name can have two byte representations. Comparison
//! keys ([`path_key`]) are NFC-normalized. The paths themselves are never
//! rewritten, since the on-disk name must be used verbatim to open a file.
//!
//! ```
//! use dupsweep::paths::path_key;
//! use std::path::Path;
//!
//! let nfc = Path::new("caf\u{e9}.txt");
//! let nfd = Path::new("cafe\u{0301}.txt");
//! assert_eq!(path_key(nfc), path_key(nfd));
//! ```

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Reasons a raw path cannot be used as a traversal root.
#[derive(Error, Debug)]
pub enum PathError {
    /// The path is not valid Unicode.
    #[error("Not a valid UTF-8 path: {0}")]
    NotUnicode(PathBuf),

    /// Nothing exists at the path.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The directory cannot be listed (missing read or execute permission).
    #[error("Directory not readable: {0}")]
    NotReadable(PathBuf),

    /// The path exists but is a regular file, a symlink, or something else.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Any other I/O failure while inspecting the path.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// A path known to reference an existing, readable, non-symlink directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedDirectory {
    path: PathBuf,
    canonical: PathBuf,
}

impl VerifiedDirectory {
    /// The path as the user supplied it.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The fully resolved path, used for containment tests.
    #[must_use]
    pub fn canonical(&self) -> &Path {
        &self.canonical
    }

    /// Whether `file` lies inside this directory or any subdirectory.
    ///
    /// The file's parent is canonicalized so symlinked ancestors resolve,
    /// but a symlinked file itself is not followed. Files that cannot be
    /// resolved are never considered contained.
    #[must_use]
    pub fn contains(&self, file: &Path) -> bool {
        match resolve_parent(file) {
            Some(resolved) => is_within(&resolved, &self.canonical),
            None => false,
        }
    }
}

/// Verify that `raw` names an existing, listable directory.
///
/// # Errors
///
/// Returns a [`PathError`] describing why the path is unusable.
pub fn verify_directory(raw: &Path) -> Result<VerifiedDirectory, PathError> {
    if raw.to_str().is_none() {
        return Err(PathError::NotUnicode(raw.to_path_buf()));
    }

    let metadata = fs::symlink_metadata(raw).map_err(|e| classify_io(raw, e))?;
    if !metadata.is_dir() {
        return Err(PathError::NotADirectory(raw.to_path_buf()));
    }

    // Listing proves read permission; stat-ing through the handle needs execute.
    fs::read_dir(raw).map_err(|e| classify_io(raw, e))?;
    let canonical = fs::canonicalize(raw).map_err(|e| classify_io(raw, e))?;

    Ok(VerifiedDirectory {
        path: raw.to_path_buf(),
        canonical,
    })
}

/// Verify every raw path, dropping the unusable ones with a warning.
#[must_use]
pub fn verify_all<P: AsRef<Path>>(raw_paths: &[P]) -> Vec<VerifiedDirectory> {
    raw_paths
        .iter()
        .filter_map(|raw| match verify_directory(raw.as_ref()) {
            Ok(dir) => Some(dir),
            Err(e) => {
                log::warn!("Skipping {}: {}", raw.as_ref().display(), e);
                None
            }
        })
        .collect()
}

/// NFC-normalized comparison key for a path.
#[must_use]
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().nfc().collect()
}

/// Whether `path` equals `dir` or lies beneath it, comparing whole
/// components in NFC form.
#[must_use]
pub fn is_within(path: &Path, dir: &Path) -> bool {
    let mut path_components = path.components();
    for dir_component in dir.components() {
        match path_components.next() {
            Some(c) if component_key(c) == component_key(dir_component) => {}
            _ => return false,
        }
    }
    true
}

fn component_key(component: Component<'_>) -> String {
    component.as_os_str().to_string_lossy().nfc().collect()
}

/// Canonicalize the parent of `file` and re-attach the file name.
fn resolve_parent(file: &Path) -> Option<PathBuf> {
    let name = file.file_name()?;
    let parent = match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|p| p.join(name))
}

fn classify_io(path: &Path, error: io::Error) -> PathError {
    match error.kind() {
        io::ErrorKind::NotFound => PathError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => PathError::NotReadable(path.to_path_buf()),
        _ => PathError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}
