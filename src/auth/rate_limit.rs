//! In-memory sliding-window rate limiting.
//!
//! Process-scoped, best-effort state injected at construction: counters
//! reset on restart, are never persisted and are not shared across
//! processes. Exceeding the limit never blocks; it fails fast.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub struct RateLimiter {
    max_attempts: u32,
    window: Duration,
    attempts: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Record an attempt for `key` and report whether it is within the
    /// limit. Returns false once `max_attempts` have been seen inside the
    /// window; over-limit attempts are not recorded.
    pub fn try_acquire(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut attempts = self.attempts.lock().expect("rate limiter lock poisoned");

        let entry = attempts.entry(key.to_string()).or_default();
        entry.retain(|t| now.duration_since(*t) < self.window);

        if entry.len() >= self.max_attempts as usize {
            return false;
        }

        entry.push(now);
        true
    }

    /// Drop entries whose whole window has elapsed. Out-of-band maintenance;
    /// `try_acquire` already prunes per key.
    pub fn prune(&self) {
        let now = Instant::now();
        let mut attempts = self.attempts.lock().expect("rate limiter lock poisoned");
        attempts.retain(|_, entry| {
            entry.retain(|t| now.duration_since(*t) < self.window);
            !entry.is_empty()
        });
    }
}
