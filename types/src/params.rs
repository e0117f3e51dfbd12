//! Policy parameters.
//!
//! Group capacity, naming bounds and failure thresholds are fixed policy, not
//! runtime configuration. They are built once at start-up and passed by
//! reference into every component that needs them.

use std::time::Duration;

/// Longest title a group may carry.
pub const MAX_TITLE_LEN: usize = 50;

/// A starter pack has room while its item count is below this value.
pub const STARTER_PACK_ROOM_THRESHOLD: u32 = 149;

/// Nominal starter-pack membership cap.
pub const STARTER_PACK_MAX_MEMBERS: u32 = 150;

/// Consecutive re-validation failures at which the identity is warned.
pub const WARNING_FAILURE_COUNT: u32 = 2;

/// Consecutive re-validation failures at which the identity is removed.
pub const REMOVAL_FAILURE_COUNT: u32 = 4;

/// Upper bound for a single external call (credential check, graph request).
pub const EXTERNAL_CALL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyParams {
    pub max_title_len: usize,
    /// Room-available threshold. Kept separate from `starter_pack_max_members`
    /// because capacity checks and the nominal maximum differ by one.
    pub starter_pack_room_threshold: u32,
    pub starter_pack_max_members: u32,
    pub warning_failure_count: u32,
    pub removal_failure_count: u32,
    pub external_call_timeout: Duration,
}

impl PolicyParams {
    /// Whether a starter pack with `item_count` members can take one more.
    pub fn starter_pack_has_room(&self, item_count: u32) -> bool {
        item_count < self.starter_pack_room_threshold
    }

    /// Attempts left before removal once `failure_count` failures are recorded.
    pub fn attempts_before_removal(&self, failure_count: u32) -> u32 {
        self.removal_failure_count.saturating_sub(failure_count)
    }
}

impl Default for PolicyParams {
    fn default() -> Self {
        Self {
            max_title_len: MAX_TITLE_LEN,
            starter_pack_room_threshold: STARTER_PACK_ROOM_THRESHOLD,
            starter_pack_max_members: STARTER_PACK_MAX_MEMBERS,
            warning_failure_count: WARNING_FAILURE_COUNT,
            removal_failure_count: REMOVAL_FAILURE_COUNT,
            external_call_timeout: EXTERNAL_CALL_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_threshold_is_149() {
        let params = PolicyParams::default();
        assert!(params.starter_pack_has_room(148));
        assert!(!params.starter_pack_has_room(149));
        assert!(!params.starter_pack_has_room(150));
    }

    #[test]
    fn attempts_before_removal_saturates() {
        let params = PolicyParams::default();
        assert_eq!(params.attempts_before_removal(2), 2);
        assert_eq!(params.attempts_before_removal(7), 0);
    }
}
