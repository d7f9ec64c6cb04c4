//! Fixed-window request rate limiting
//!
//! This module tracks request counts per client key over fixed windows. The
//! first request for a key starts its window; once the per-window budget is
//! spent, further requests are rejected until the window lapses. Rejected
//! requests never consume budget, so a stored count can never exceed the
//! configured limit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

/// Configuration for the rate limiter
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum number of admitted requests per window
    pub max_requests: u32,

    /// Length of the fixed window
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
        }
    }
}

/// Outcome of an admission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The request fits the current window budget
    Admitted,
    /// The budget is spent; `retry_after` is the time left until the window
    /// lapses
    Rejected { retry_after: Duration },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Counter tracking one key's current window
#[derive(Debug)]
struct WindowCounter {
    /// Start of the current window
    window_start: Instant,

    /// Admissions in the current window
    count: u32,
}

impl WindowCounter {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            count: 0,
        }
    }
}

/// Thread-safe fixed-window rate limiter
///
/// Each key owns its own counter behind its own lock. The outer map lock is
/// held only to look up or insert a counter; admission decisions for a key
/// serialize on that key's lock alone.
pub struct RateLimiter {
    config: RateLimitConfig,
    counters: RwLock<HashMap<String, Arc<Mutex<WindowCounter>>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            counters: RwLock::new(HashMap::new()),
        }
    }

    /// Create a new rate limiter with default configuration
    pub fn with_defaults() -> Self {
        Self::new(RateLimitConfig::default())
    }

    /// Decide whether a request from `key` fits the current window
    ///
    /// A lapsed window is reset before the check, and the check happens
    /// before the increment, so a rejected request leaves the counter
    /// untouched.
    ///
    /// # Arguments
    ///
    /// * `key` - Opaque client identifier the budget is tracked under
    ///
    /// # Returns
    ///
    /// `Admission::Admitted`, or `Admission::Rejected` carrying the time
    /// until the window lapses
    pub fn admit(&self, key: &str) -> Admission {
        let counter = self.counter_for(key);
        let mut counter = counter.lock().unwrap();
        let now = Instant::now();

        if now.saturating_duration_since(counter.window_start) >= self.config.window {
            counter.window_start = now;
            counter.count = 0;
        }

        if counter.count < self.config.max_requests {
            counter.count += 1;
            Admission::Admitted
        } else {
            let window_end = counter.window_start + self.config.window;
            Admission::Rejected {
                retry_after: window_end.saturating_duration_since(now),
            }
        }
    }

    /// Look up the counter for a key, inserting a fresh one if absent
    fn counter_for(&self, key: &str) -> Arc<Mutex<WindowCounter>> {
        if let Some(counter) = self.counters.read().unwrap().get(key) {
            return Arc::clone(counter);
        }

        let mut counters = self.counters.write().unwrap();
        Arc::clone(
            counters
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(WindowCounter::new()))),
        )
    }

    /// Drop counters whose window has lapsed, returning how many were removed
    ///
    /// A lapsed counter is semantically identical to an absent one, so this
    /// only frees memory. Should be called periodically.
    pub fn evict_idle(&self) -> usize {
        let mut counters = self.counters.write().unwrap();
        let now = Instant::now();
        let before = counters.len();

        counters.retain(|_, counter| {
            // Keep counters another thread is still holding
            if Arc::strong_count(counter) > 1 {
                return true;
            }
            let counter = counter.lock().unwrap();
            now.saturating_duration_since(counter.window_start) < self.config.window
        });

        before - counters.len()
    }

    /// Get current number of tracked keys
    pub fn tracked_keys(&self) -> usize {
        self.counters.read().unwrap().len()
    }
}
