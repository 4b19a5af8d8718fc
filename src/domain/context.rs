//! Ambient transaction context.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::AccountId;
use crate::error::{AmmError, Result};

/// Seconds since an arbitrary epoch chosen by the host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Latest representable instant; a deadline that never expires.
    pub const MAX: Self = Self(u64::MAX);

    /// Wraps raw seconds.
    #[must_use]
    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Raw seconds.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}

/// Caller identity and clock supplied by the host with every mutating call.
///
/// The pool never reads ambient globals; everything it needs to authorize
/// a request or check a deadline arrives here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxContext {
    /// Account on whose behalf the call is made.
    pub caller: AccountId,
    /// Current time.
    pub now: Timestamp,
}

impl TxContext {
    /// Builds a context.
    #[must_use]
    pub const fn new(caller: AccountId, now: Timestamp) -> Self {
        Self { caller, now }
    }

    /// Rejects requests whose deadline has passed (`now > deadline`).
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DeadlineExpired`].
    pub const fn check_deadline(&self, deadline: Timestamp) -> Result<()> {
        if self.now.0 > deadline.0 {
            return Err(AmmError::DeadlineExpired);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_is_inclusive() {
        let ctx = TxContext::new(AccountId::from_index(1), Timestamp::new(100));
        assert_eq!(ctx.check_deadline(Timestamp::new(100)), Ok(()));
        assert_eq!(ctx.check_deadline(Timestamp::MAX), Ok(()));
        assert_eq!(
            ctx.check_deadline(Timestamp::new(99)),
            Err(AmmError::DeadlineExpired)
        );
    }
}
