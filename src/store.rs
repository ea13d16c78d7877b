//! Lock store: primitive filesystem operations on a lock path.
//!
//! Everything in this module is precondition-free — business rules (when a
//! lock may be created or removed, what counts as a failure) live in the
//! controller. The store only knows how to check, create, write, read, and
//! remove a single lock file.

use crate::controller::Metadata;
use crate::error::{LatchError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Check whether a lock path is currently present.
///
/// True iff the path can be opened for reading. Any access error — absent
/// file, permission denied, dangling symlink — reads as "not present". This
/// conflates "absent" with "inaccessible"; callers that need the
/// distinction must stat the path themselves.
pub fn exists(path: &Path) -> bool {
    File::open(path).is_ok()
}

/// Ensure the lock directory exists.
///
/// Idempotent: an already-existing directory is not an error. Any other
/// creation failure propagates.
pub fn ensure_directory(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        LatchError::UserError(format!(
            "failed to create lock directory '{}': {}",
            dir.display(),
            e
        ))
    })
}

/// Create an empty file at the lock path, creating parent directories first
/// if absent.
///
/// Opens with create + append so an existing file is left untouched rather
/// than truncated.
pub fn create_empty(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            LatchError::UserError(format!(
                "failed to create lock directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|e| {
            LatchError::UserError(format!(
                "failed to create lock file '{}': {}",
                path.display(),
                e
            ))
        })
}

/// Serialize `metadata` as YAML and (over)write it at the lock path,
/// replacing any prior content. Synced to disk before returning.
pub fn write_metadata(path: &Path, metadata: &Metadata) -> Result<()> {
    let yaml = serde_yaml::to_string(metadata)
        .map_err(|e| LatchError::UserError(format!("failed to serialize lock metadata: {}", e)))?;

    let mut file = File::create(path).map_err(|e| {
        LatchError::UserError(format!(
            "failed to open lock file '{}' for writing: {}",
            path.display(),
            e
        ))
    })?;

    file.write_all(yaml.as_bytes()).map_err(|e| {
        LatchError::UserError(format!(
            "failed to write lock file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        LatchError::UserError(format!(
            "failed to sync lock file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Parse the YAML metadata mapping out of a lock file.
pub fn read_metadata(path: &Path) -> Result<Metadata> {
    let content = fs::read_to_string(path).map_err(|e| {
        LatchError::UserError(format!(
            "failed to read lock file '{}': {}",
            path.display(),
            e
        ))
    })?;

    serde_yaml::from_str(&content).map_err(|e| {
        LatchError::UserError(format!(
            "failed to parse lock file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Delete the file at the lock path.
///
/// A nonexistent path is an error, with a message that distinguishes
/// not-found from other removal failures.
pub fn remove(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LatchError::UserError(format!("no lock file found at '{}'", path.display()))
        } else {
            LatchError::UserError(format!(
                "failed to remove lock file '{}': {}",
                path.display(),
                e
            ))
        }
    })
}
