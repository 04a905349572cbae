//! Fixed-window rate limiter keyed by caller identity.
//!
//! In-memory and per-process only: counters are not shared across instances
//! and reset on restart, so enforcement is best-effort. The keyed
//! quota-per-window interface would take a shared counter store without
//! changing callers.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Window {
    started: Instant,
    count: u32,
}

pub struct RateLimiter {
    quota: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(quota: u32, window: Duration) -> Self {
        Self {
            quota,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_hour(quota: u32) -> Self {
        Self::new(quota, Duration::from_secs(3600))
    }

    /// Record one request for `key`. Returns false when the key has exhausted
    /// its quota for the current window.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.quota {
            return false;
        }
        window.count += 1;
        true
    }
}
