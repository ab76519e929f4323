//! Retry policy: attempt budget and fixed cooldown

use std::time::Duration;

/// Default pause between attempts
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(1);

/// Bounded retry with a fixed cooldown between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Pause between two consecutive attempts
    pub cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

impl RetryPolicy {
    /// Policy with `max_attempts` attempts and the default cooldown
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Replace the cooldown
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Whether a cooldown is due after `failed` attempts have failed
    pub fn should_cool_down(&self, failed: u32) -> bool {
        self.max_attempts > 1 && failed < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.cooldown, Duration::from_secs(1));
    }

    #[test]
    fn test_no_cooldown_for_single_attempt() {
        let policy = RetryPolicy::new(1);
        assert!(!policy.should_cool_down(1));
    }

    #[test]
    fn test_no_cooldown_after_last_attempt() {
        let policy = RetryPolicy::new(3).with_cooldown(Duration::from_millis(5));
        assert!(policy.should_cool_down(1));
        assert!(policy.should_cool_down(2));
        assert!(!policy.should_cool_down(3));
    }
}
