//! Exit code constants for the latch CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid action, filesystem plumbing)
//! - 2: Precondition failure (already locked / not locked)
//! - 3: Unlock failure (lock file could not be removed)
//! - 4: Postcondition verification failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid action, or a propagated
/// filesystem/serialization failure.
pub const USER_ERROR: i32 = 1;

/// Precondition failure: a require-unlocked or require-locked check did not
/// hold before the action.
pub const PRECONDITION_FAILURE: i32 = 2;

/// Unlock failure: the lock file removal step errored.
pub const UNLOCK_FAILURE: i32 = 3;

/// Verification failure: a mutation reported success but the expected
/// filesystem state does not hold afterward.
pub const VERIFICATION_FAILURE: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USER_ERROR,
            PRECONDITION_FAILURE,
            UNLOCK_FAILURE,
            VERIFICATION_FAILURE,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn success_is_zero() {
        assert_eq!(SUCCESS, 0);
    }
}
