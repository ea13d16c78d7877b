//! Lock controller for latch.
//!
//! This module implements the three-action state machine over a named
//! resource: `status` reads, `lock` creates, `unlock` removes. The
//! controller evaluates precondition flags before mutating, verifies
//! postconditions after mutating, and merges lock state into the
//! caller-supplied metadata.
//!
//! # Verification after mutation
//!
//! The store's primitives are not guaranteed atomic or durable on every
//! backing filesystem. After each mutation the controller re-checks
//! existence and reports "operation completed but postcondition false" as a
//! distinct failure (`LockCreationFailed` / `UnlockVerificationFailed`)
//! rather than trusting the mutating call's own success signal.
//!
//! # Not a mutual exclusion primitive
//!
//! The existence-check-then-create/remove sequence is a check-then-act race
//! across processes. Two racing lock attempts with `require_unlocked_first`
//! may both pass the precondition. The lock file is a cooperative marker,
//! not a concurrency primitive; callers needing true exclusion must add an
//! exclusive-create primitive at the store layer.

mod types;


pub use types::{LockAction, LockEntry, LockRequest, LockStatus, Metadata};

use crate::error::{LatchError, Result};
use crate::store;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Metadata key for the lock file path (null when unlocked).
pub const LOCK_FILE_LOCATION: &str = "lock_file_location";

/// Metadata key for the lock state (`locked` / `unlocked`).
pub const LOCK_FILE_STATUS: &str = "lock_file_status";

/// Metadata key for the action that produced the record.
pub const LOCK_ACTION: &str = "lock_action";

/// Execute a lock request and return the merged result metadata.
///
/// The lock directory is ensured to exist before every action, regardless
/// of action type. The returned map is the caller's metadata merged with
/// `lock_file_location`, `lock_file_status`, and `lock_action`.
pub fn run(request: &LockRequest) -> Result<Metadata> {
    let lock_path = request.lock_path();
    store::ensure_directory(&request.directory)?;

    let mut result = request.metadata.clone();

    match request.action {
        LockAction::Status => {
            // Read-only: precondition flags are not honored here.
            let status = current_status(&lock_path);
            annotate_state(&mut result, &lock_path, status);
        }

        LockAction::Lock => {
            if request.require_unlocked_first && store::exists(&lock_path) {
                return Err(LatchError::AlreadyLocked(format!(
                    "'{}' at {}",
                    request.resource,
                    lock_path.display()
                )));
            }

            store::create_empty(&lock_path)?;

            annotate_state(&mut result, &lock_path, LockStatus::Locked);
            // Annotated before persistence so the on-disk record carries the
            // action that created it.
            annotate_action(&mut result, request.action);
            store::write_metadata(&lock_path, &result)?;

            if !store::exists(&lock_path) {
                return Err(LatchError::LockCreationFailed(
                    lock_path.display().to_string(),
                ));
            }
        }

        LockAction::Unlock => {
            if request.require_locked_first && !store::exists(&lock_path) {
                return Err(LatchError::NotLocked(format!(
                    "'{}' (expected lock at {})",
                    request.resource,
                    lock_path.display()
                )));
            }

            store::remove(&lock_path).map_err(|e| LatchError::UnlockFailed(e.to_string()))?;

            if store::exists(&lock_path) {
                return Err(LatchError::UnlockVerificationFailed(
                    lock_path.display().to_string(),
                ));
            }

            annotate_state(&mut result, &lock_path, LockStatus::Unlocked);
        }
    }

    annotate_action(&mut result, request.action);
    Ok(result)
}

/// List all locks in a directory.
///
/// Enumerates `*.lock` files, parses each one's metadata, and returns the
/// entries sorted by resource name. Files that fail to parse are skipped.
/// Read-only: a missing directory yields an empty list.
pub fn list(directory: &Path) -> Result<Vec<LockEntry>> {
    let mut locks = Vec::new();

    if !directory.exists() {
        return Ok(locks);
    }

    let entries = fs::read_dir(directory).map_err(|e| {
        LatchError::UserError(format!(
            "failed to read lock directory '{}': {}",
            directory.display(),
            e
        ))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            LatchError::UserError(format!("failed to read lock directory entry: {}", e))
        })?;

        let path = entry.path();

        // Skip non-lock files (including the audit log)
        if path.extension().and_then(|e| e.to_str()) != Some("lock") {
            continue;
        }

        let metadata = match store::read_metadata(&path) {
            Ok(meta) => meta,
            Err(_) => continue, // Skip invalid lock files
        };

        let resource = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        locks.push(LockEntry {
            resource,
            path,
            metadata,
        });
    }

    // Sort by resource name for consistent output
    locks.sort_by(|a, b| a.resource.cmp(&b.resource));

    Ok(locks)
}

/// Derive the lock status from path existence.
fn current_status(lock_path: &Path) -> LockStatus {
    if store::exists(lock_path) {
        LockStatus::Locked
    } else {
        LockStatus::Unlocked
    }
}

/// Merge lock location and status into the result metadata.
///
/// The location is the lock path when locked and null when unlocked.
fn annotate_state(result: &mut Metadata, lock_path: &Path, status: LockStatus) {
    let location = match status {
        LockStatus::Locked => Value::String(lock_path.display().to_string()),
        LockStatus::Unlocked => Value::Null,
    };
    result.insert(LOCK_FILE_LOCATION.to_string(), location);
    result.insert(
        LOCK_FILE_STATUS.to_string(),
        Value::String(status.as_str().to_string()),
    );
}

/// Merge the performed action into the result metadata.
fn annotate_action(result: &mut Metadata, action: LockAction) {
    result.insert(
        LOCK_ACTION.to_string(),
        Value::String(action.as_str().to_string()),
    );
}
