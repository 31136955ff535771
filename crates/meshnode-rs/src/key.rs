//! Key-sequence rotation bookkeeping.
//!
//! The tracker holds the current key sequence and the guard time that must
//! elapse after a switch before the engine may advance the sequence on its
//! own. Key derivation itself lives in the engine's key manager.

use log::{debug, info, warn};

const MS_PER_HOUR: u64 = 3_600_000;

/// Holds the current key sequence and enforces the key switch guard time.
#[derive(Debug, Clone)]
pub struct KeyRotationTracker {
    key_sequence: u32,
    /// Guard time in hours. Zero disables the guard.
    guard_time: u32,
    /// Time of the last key switch in ms, `None` if no switch happened yet.
    last_switch_ms: Option<u64>,
}

impl KeyRotationTracker {
    pub fn new(guard_time: u32) -> Self {
        Self {
            key_sequence: 0,
            guard_time,
            last_switch_ms: None,
        }
    }

    pub fn key_sequence(&self) -> u32 {
        self.key_sequence
    }

    /// Operator-driven switch. Always honoured and restarts the guard window.
    pub fn set_key_sequence(&mut self, key_sequence: u32, now_ms: u64) {
        info!(
            "[KEY] Key sequence set {} -> {}",
            self.key_sequence, key_sequence
        );
        self.key_sequence = key_sequence;
        self.last_switch_ms = Some(now_ms);
    }

    pub fn guard_time(&self) -> u32 {
        self.guard_time
    }

    pub fn set_guard_time(&mut self, hours: u32) {
        if hours == 0 {
            warn!("[KEY] Key switch guard time disabled");
        }
        self.guard_time = hours;
    }

    /// Returns true if an automatic switch would be honoured at `now_ms`.
    pub fn guard_elapsed(&self, now_ms: u64) -> bool {
        match self.last_switch_ms {
            _ if self.guard_time == 0 => true,
            None => true,
            Some(last) => {
                now_ms.saturating_sub(last) >= u64::from(self.guard_time) * MS_PER_HOUR
            }
        }
    }

    /// Engine-driven switch on receipt of newer key material.
    ///
    /// Applied only if `key_sequence` is newer than the current one and the
    /// guard time has elapsed. Returns whether the sequence changed.
    pub fn try_advance(&mut self, key_sequence: u32, now_ms: u64) -> bool {
        if key_sequence <= self.key_sequence {
            debug!(
                "[KEY] Ignoring key sequence {} (current {})",
                key_sequence, self.key_sequence
            );
            return false;
        }
        if !self.guard_elapsed(now_ms) {
            warn!(
                "[KEY] Key sequence {} rejected: guard time of {}h not elapsed",
                key_sequence, self.guard_time
            );
            return false;
        }
        info!(
            "[KEY] Key sequence advanced {} -> {}",
            self.key_sequence, key_sequence
        );
        self.key_sequence = key_sequence;
        self.last_switch_ms = Some(now_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_advance_is_honoured() {
        let mut tracker = KeyRotationTracker::new(624);
        assert!(tracker.try_advance(1, 0));
        assert_eq!(tracker.key_sequence(), 1);
    }

    #[test]
    fn test_advance_within_guard_is_rejected() {
        let mut tracker = KeyRotationTracker::new(1);
        tracker.set_key_sequence(5, 1_000);

        assert!(!tracker.try_advance(6, 1_000 + MS_PER_HOUR - 1));
        assert_eq!(tracker.key_sequence(), 5);

        assert!(tracker.try_advance(6, 1_000 + MS_PER_HOUR));
        assert_eq!(tracker.key_sequence(), 6);
    }

    #[test]
    fn test_stale_sequence_is_ignored() {
        let mut tracker = KeyRotationTracker::new(0);
        tracker.set_key_sequence(10, 0);
        assert!(!tracker.try_advance(10, 0));
        assert!(!tracker.try_advance(3, 0));
        assert_eq!(tracker.key_sequence(), 10);
    }

    #[test]
    fn test_zero_guard_time_disables_guard() {
        let mut tracker = KeyRotationTracker::new(0);
        tracker.set_key_sequence(1, 500);
        assert!(tracker.try_advance(2, 500));
        assert!(tracker.try_advance(3, 500));
        assert_eq!(tracker.guard_time(), 0);
    }

    #[test]
    fn test_operator_set_ignores_guard_and_allows_rollback() {
        let mut tracker = KeyRotationTracker::new(624);
        tracker.set_key_sequence(100, 0);
        tracker.set_key_sequence(7, 1);
        assert_eq!(tracker.key_sequence(), 7);
    }
}
