//! Audit log for latch.
//!
//! Mutating lock actions are appended to an NDJSON file (one JSON object
//! per line) at `<lock-dir>/events.ndjson`, so an external auditor — e.g.
//! the scraper that enforces `expire` times — has a durable trail of who
//! locked what, when, and why.
//!
//! # Event Format
//!
//! Each event is a JSON object with:
//! - `ts`: RFC3339 timestamp
//! - `action`: the lock action performed (lock/unlock)
//! - `actor`: `user@HOST`
//! - `resource`: the resource name
//! - `details`: freeform object (precondition flags, metadata keys, ...)
//!
//! Appends are best-effort from the command layer: a failed append warns on
//! stderr but never fails the lock operation itself.

use crate::controller::LockAction;
use crate::error::{LatchError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The lock action that was performed.
    pub action: LockAction,

    /// The actor who performed the action (e.g. `user@HOST`).
    pub actor: String,

    /// The resource the action was performed on.
    pub resource: String,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event for an action on a resource.
    ///
    /// The timestamp is set to the current time and the actor is determined
    /// from the environment (USER@HOSTNAME).
    pub fn new(action: LockAction, resource: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor_string(),
            resource: resource.into(),
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| LatchError::UserError(format!("failed to serialize audit event: {}", e)))
    }
}

/// Get the actor string for event metadata.
pub(crate) fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Get the path to the audit log inside a lock directory.
pub fn events_file_path(lock_dir: &Path) -> PathBuf {
    lock_dir.join("events.ndjson")
}

/// Append an event to the audit log in the given lock directory.
///
/// The file is created if it doesn't exist; each append writes one JSON
/// line with a trailing newline and syncs to disk.
pub fn append_event(lock_dir: &Path, event: &Event) -> Result<()> {
    let events_file = events_file_path(lock_dir);
    let json_line = event.to_ndjson_line()?;

    if !lock_dir.exists() {
        fs::create_dir_all(lock_dir).map_err(|e| {
            LatchError::UserError(format!(
                "failed to create lock directory '{}': {}",
                lock_dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            LatchError::UserError(format!(
                "failed to open audit log '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        LatchError::UserError(format!(
            "failed to write audit event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        LatchError::UserError(format!(
            "failed to sync audit log '{}': {}",
            events_file.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn event_creation_sets_actor_and_timestamp() {
        let event = Event::new(LockAction::Lock, "web-1");

        assert_eq!(event.action, LockAction::Lock);
        assert_eq!(event.resource, "web-1");
        assert!(!event.actor.is_empty());
        let age = Utc::now().signed_duration_since(event.ts);
        assert!(age.num_minutes() < 1);
    }

    #[test]
    fn event_serializes_to_single_json_line() {
        let event = Event::new(LockAction::Unlock, "web-1")
            .with_details(json!({"require_locked_first": true}));

        let json_line = event.to_ndjson_line().unwrap();

        assert!(!json_line.contains('\n'));
        let parsed: Event = serde_json::from_str(&json_line).unwrap();
        assert_eq!(parsed.action, LockAction::Unlock);
        assert_eq!(parsed.resource, "web-1");
        assert_eq!(parsed.details["require_locked_first"], true);
    }

    #[test]
    fn action_serializes_lowercase() {
        let event = Event::new(LockAction::Lock, "web-1");
        let json_line = event.to_ndjson_line().unwrap();
        assert!(json_line.contains("\"lock\""));
    }

    #[test]
    fn append_event_creates_file_and_directory() {
        let temp_dir = TempDir::new().unwrap();
        let lock_dir = temp_dir.path().join("locks");

        let event = Event::new(LockAction::Lock, "web-1");
        append_event(&lock_dir, &event).unwrap();

        let content = fs::read_to_string(events_file_path(&lock_dir)).unwrap();
        assert!(content.ends_with('\n'));

        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        let parsed: Event = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.resource, "web-1");
    }

    #[test]
    fn append_event_appends_multiple_lines() {
        let temp_dir = TempDir::new().unwrap();
        let lock_dir = temp_dir.path().to_path_buf();

        append_event(&lock_dir, &Event::new(LockAction::Lock, "web-1")).unwrap();
        append_event(&lock_dir, &Event::new(LockAction::Unlock, "web-1")).unwrap();

        let content = fs::read_to_string(events_file_path(&lock_dir)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Event = serde_json::from_str(lines[0]).unwrap();
        let second: Event = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(first.action, LockAction::Lock);
        assert_eq!(second.action, LockAction::Unlock);
    }

    #[test]
    fn actor_string_has_user_and_host() {
        let actor = actor_string();
        assert!(actor.contains('@'));
        assert!(!actor.is_empty());
    }
}
