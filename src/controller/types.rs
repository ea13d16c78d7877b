//! Lock action, status, and request type definitions.

use crate::error::LatchError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

/// Open metadata mapping persisted inside a lock file.
///
/// A fresh map is instantiated per request; nothing is shared between
/// invocations. BTreeMap keeps the on-disk YAML key order stable.
pub type Metadata = BTreeMap<String, serde_yaml::Value>;

/// Action to perform on a lock record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockAction {
    /// Read the current lock state without mutating anything.
    #[default]
    Status,
    /// Create the lock path and persist metadata into it.
    Lock,
    /// Remove the lock path.
    Unlock,
}

impl LockAction {
    /// Get the metadata string for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            LockAction::Status => "status",
            LockAction::Lock => "lock",
            LockAction::Unlock => "unlock",
        }
    }

    /// Whether this action changes filesystem state.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, LockAction::Status)
    }
}

impl FromStr for LockAction {
    type Err = LatchError;

    /// Boundary validation: anything outside the three known actions is
    /// rejected as `InvalidAction`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" => Ok(LockAction::Status),
            "lock" => Ok(LockAction::Lock),
            "unlock" => Ok(LockAction::Unlock),
            other => Err(LatchError::InvalidAction(other.to_string())),
        }
    }
}

impl std::fmt::Display for LockAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lock state of a resource, always derivable from path existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    Locked,
    Unlocked,
}

impl LockStatus {
    /// Get the metadata string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            LockStatus::Locked => "locked",
            LockStatus::Unlocked => "unlocked",
        }
    }
}

impl std::fmt::Display for LockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single request against a named resource.
#[derive(Debug, Clone)]
pub struct LockRequest {
    /// Directory the lock file lives in.
    pub directory: PathBuf,

    /// Resource name; derives the on-disk path as `<directory>/<resource>.lock`.
    pub resource: String,

    /// Caller-supplied metadata to merge into the result (and, for lock
    /// actions, persist).
    pub metadata: Metadata,

    /// The action to perform.
    pub action: LockAction,

    /// Fail with `AlreadyLocked` if the resource is locked before a lock action.
    pub require_unlocked_first: bool,

    /// Fail with `NotLocked` if the resource is unlocked before an unlock action.
    pub require_locked_first: bool,
}

impl LockRequest {
    /// Create a status request with empty metadata and no precondition flags.
    pub fn new(directory: impl Into<PathBuf>, resource: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            resource: resource.into(),
            metadata: Metadata::new(),
            action: LockAction::default(),
            require_unlocked_first: false,
            require_locked_first: false,
        }
    }

    /// Set the action to perform.
    pub fn with_action(mut self, action: LockAction) -> Self {
        self.action = action;
        self
    }

    /// Set the caller-supplied metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Require the resource to be unlocked before a lock action.
    pub fn require_unlocked_first(mut self) -> Self {
        self.require_unlocked_first = true;
        self
    }

    /// Require the resource to be locked before an unlock action.
    pub fn require_locked_first(mut self) -> Self {
        self.require_locked_first = true;
        self
    }

    /// The on-disk path this request resolves to.
    pub fn lock_path(&self) -> PathBuf {
        self.directory.join(format!("{}.lock", self.resource))
    }
}

/// An existing lock discovered by directory listing.
#[derive(Debug, Clone)]
pub struct LockEntry {
    /// Resource name (lock filename without the `.lock` extension).
    pub resource: String,

    /// The lock file path.
    pub path: PathBuf,

    /// Parsed metadata from the lock file.
    pub metadata: Metadata,
}

impl LockEntry {
    /// Look up a string metadata value by key, if present.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

impl std::fmt::Display for LockEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.resource, self.path.display())
    }
}
