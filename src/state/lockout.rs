//! Login lockout bookkeeping
//!
//! Pure state: no timers or I/O here. The login controller owns the
//! countdown task and persistence, and drives this struct with timestamps
//! from its clock.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::settings::LockoutConfig;

/// Persisted attempt/lockout state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutState {
    #[serde(default)]
    pub attempt_count: u32,
    /// Absolute deadline, so reloading never resets or extends a lock
    #[serde(default)]
    pub locked_until: Option<DateTime<Utc>>,
    #[serde(default = "default_multiplier")]
    pub backoff_multiplier: u32,
    /// Last email typed into the form
    #[serde(default)]
    pub email: String,
}

/// Upper bound on a single lock, roughly ten years
const MAX_LOCK_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

fn default_multiplier() -> u32 {
    1
}

impl Default for LockoutState {
    fn default() -> Self {
        Self {
            attempt_count: 0,
            locked_until: None,
            backoff_multiplier: default_multiplier(),
            email: String::new(),
        }
    }
}

/// Failure threshold and base lock duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub max_attempts: u32,
    pub base_lockout_seconds: u64,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_lockout_seconds: 60,
        }
    }
}

impl From<&LockoutConfig> for LockoutPolicy {
    fn from(config: &LockoutConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_lockout_seconds: config.base_lockout_seconds,
        }
    }
}

impl LockoutState {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.map_or(false, |until| now < until)
    }

    /// Time left on the lock, clamped at zero
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        match self.locked_until {
            Some(until) if until > now => until - now,
            _ => Duration::zero(),
        }
    }

    /// Whole seconds left on the lock, rounded up
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> u64 {
        let millis = self.remaining(now).num_milliseconds().max(0) as u64;
        millis.div_ceil(1000)
    }

    /// Clear an elapsed lock. The multiplier is kept so the next episode escalates.
    ///
    /// Returns `true` when the state changed.
    pub fn expire_if_elapsed(&mut self, now: DateTime<Utc>) -> bool {
        match self.locked_until {
            Some(until) if now >= until => {
                self.attempt_count = 0;
                self.locked_until = None;
                true
            }
            _ => false,
        }
    }

    /// Count a failed attempt, starting a lock once the threshold is hit.
    ///
    /// Returns the length of the lock in seconds when one starts.
    pub fn register_failure(&mut self, policy: &LockoutPolicy, now: DateTime<Utc>) -> Option<u64> {
        self.attempt_count = self.attempt_count.saturating_add(1);
        if self.attempt_count < policy.max_attempts {
            return None;
        }

        let seconds = policy
            .base_lockout_seconds
            .saturating_mul(u64::from(self.backoff_multiplier))
            .min(MAX_LOCK_SECONDS);
        self.locked_until = Some(now + Duration::seconds(seconds as i64));
        self.backoff_multiplier = self.backoff_multiplier.saturating_mul(2);
        Some(seconds)
    }

    pub fn register_success(&mut self) {
        *self = Self::default();
    }

    pub fn attempts_left(&self, policy: &LockoutPolicy) -> u32 {
        policy.max_attempts.saturating_sub(self.attempt_count)
    }
}
