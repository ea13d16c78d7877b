//! Error types for the latch CLI.
//!
//! Uses thiserror for derive macros. Every failure kind gets its own variant
//! so callers can match on the kind and decide whether to retry, abort, or
//! alert — there is no generic catch-all failure signal.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for latch operations.
///
/// Each variant maps to a specific exit code via [`LatchError::exit_code`].
#[derive(Error, Debug)]
pub enum LatchError {
    /// Requested action is not one of status/lock/unlock.
    #[error("invalid lock action '{0}' (expected status, lock, or unlock)")]
    InvalidAction(String),

    /// `--require-unlocked` was set but the resource is already locked.
    #[error("resource is already locked: {0}")]
    AlreadyLocked(String),

    /// `--require-locked` was set but the resource is not locked.
    #[error("resource is not locked: {0}")]
    NotLocked(String),

    /// The lock write completed but the lock file is not present afterward.
    #[error("lock file not present after write: {0}")]
    LockCreationFailed(String),

    /// Removing the lock file failed (including a nonexistent lock).
    #[error("failed to remove lock: {0}")]
    UnlockFailed(String),

    /// Removal reported success but the lock file is still present.
    #[error("lock file still present after removal: {0}")]
    UnlockVerificationFailed(String),

    /// User provided invalid arguments, or a filesystem/serialization
    /// operation outside the lock state machine failed.
    #[error("{0}")]
    UserError(String),
}

impl LatchError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LatchError::InvalidAction(_) => exit_codes::USER_ERROR,
            LatchError::UserError(_) => exit_codes::USER_ERROR,
            LatchError::AlreadyLocked(_) => exit_codes::PRECONDITION_FAILURE,
            LatchError::NotLocked(_) => exit_codes::PRECONDITION_FAILURE,
            LatchError::UnlockFailed(_) => exit_codes::UNLOCK_FAILURE,
            LatchError::LockCreationFailed(_) => exit_codes::VERIFICATION_FAILURE,
            LatchError::UnlockVerificationFailed(_) => exit_codes::VERIFICATION_FAILURE,
        }
    }
}

/// Result type alias for latch operations.
pub type Result<T> = std::result::Result<T, LatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_action_has_user_error_exit_code() {
        let err = LatchError::InvalidAction("wipe".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn precondition_failures_share_an_exit_code() {
        let already = LatchError::AlreadyLocked("web-1".to_string());
        let not = LatchError::NotLocked("web-1".to_string());
        assert_eq!(already.exit_code(), exit_codes::PRECONDITION_FAILURE);
        assert_eq!(not.exit_code(), exit_codes::PRECONDITION_FAILURE);
    }

    #[test]
    fn unlock_failure_has_correct_exit_code() {
        let err = LatchError::UnlockFailed("no such file".to_string());
        assert_eq!(err.exit_code(), exit_codes::UNLOCK_FAILURE);
    }

    #[test]
    fn verification_failures_share_an_exit_code() {
        let create = LatchError::LockCreationFailed("web-1.lock".to_string());
        let unlock = LatchError::UnlockVerificationFailed("web-1.lock".to_string());
        assert_eq!(create.exit_code(), exit_codes::VERIFICATION_FAILURE);
        assert_eq!(unlock.exit_code(), exit_codes::VERIFICATION_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = LatchError::InvalidAction("wipe".to_string());
        assert_eq!(
            err.to_string(),
            "invalid lock action 'wipe' (expected status, lock, or unlock)"
        );

        let err = LatchError::AlreadyLocked("web-1 at .locks/web-1.lock".to_string());
        assert!(err.to_string().contains("already locked"));
    }
}
