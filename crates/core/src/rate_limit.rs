//! Rate limiting for outbound food lookups
//!
//! A sliding window limiter: every granted request leaves a timestamp in the
//! window, and a new request is granted only while fewer than
//! `max_requests` timestamps are younger than `window`. Expired timestamps are
//! evicted lazily on each check, never on a timer.
//!
//! Time comes from a [`Clock`], so tests can drive the window with a
//! [`ManualClock`] instead of sleeping.
//!
//! # Example
//!
//! ```rust
//! use moodfood_core::rate_limit::{RateLimitConfig, SlidingWindowLimiter};
//!
//! let limiter = SlidingWindowLimiter::new(RateLimitConfig::default());
//!
//! if limiter.try_acquire() {
//!     // Proceed with the lookup
//! } else {
//!     // Denied, fall back to local data
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Maximum lookups granted per window
pub const MAX_REQUESTS: usize = 10;

/// Length of the sliding window
pub const WINDOW_DURATION: Duration = Duration::from_secs(60);

/// Source of "now" for the limiter
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Create a clock frozen at the current instant
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += by;
    }

    /// Time elapsed since the clock was created
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

/// Rate limiter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: usize,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: MAX_REQUESTS,
            window: WINDOW_DURATION,
        }
    }
}

impl RateLimitConfig {
    /// Per-minute rate limit
    #[must_use]
    pub fn per_minute(max: usize) -> Self {
        Self {
            max_requests: max,
            window: Duration::from_secs(60),
        }
    }
}

/// Sliding window rate limiter shared by every lookup in the process
pub struct SlidingWindowLimiter {
    // Timestamps of granted requests, oldest first
    window: Mutex<VecDeque<Instant>>,
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SlidingWindowLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlidingWindowLimiter")
            .field("config", &self.config)
            .field("in_window", &self.window.lock().map(|w| w.len()).unwrap_or_default())
            .finish_non_exhaustive()
    }
}

impl SlidingWindowLimiter {
    /// Create a limiter driven by the system clock
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a limiter driven by a custom clock
    #[must_use]
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            window: Mutex::new(VecDeque::with_capacity(config.max_requests)),
            config,
            clock,
        }
    }

    /// The limiter's configuration
    #[must_use]
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Try to acquire a slot at the clock's current instant
    #[must_use]
    pub fn try_acquire(&self) -> bool {
        self.try_acquire_at(self.clock.now())
    }

    /// Try to acquire a slot at `now`.
    ///
    /// Eviction, the capacity check and the append all happen under one lock,
    /// so concurrent callers can never both claim the last free slot. Denied
    /// attempts leave the window untouched.
    #[must_use]
    pub fn try_acquire_at(&self, now: Instant) -> bool {
        let mut window = self.window.lock().unwrap_or_else(|e| e.into_inner());
        self.evict(&mut window, now);

        if window.len() >= self.config.max_requests {
            return false;
        }

        window.push_back(now);
        true
    }

    /// Number of granted requests still inside the window
    #[must_use]
    pub fn current_count(&self) -> usize {
        let now = self.clock.now();
        let mut window = self.window.lock().unwrap_or_else(|e| e.into_inner());
        self.evict(&mut window, now);
        window.len()
    }

    /// Slots left before the limiter starts denying
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.config.max_requests.saturating_sub(self.current_count())
    }

    /// Forget every granted request
    pub fn reset(&self) {
        let mut window = self.window.lock().unwrap_or_else(|e| e.into_inner());
        window.clear();
    }

    // Entries are in increasing time order, so expiry is a prefix trim.
    // An entry exactly `window` old is still counted.
    fn evict(&self, window: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = window.front() {
            if now.saturating_duration_since(oldest) > self.config.window {
                window.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn limiter_with_clock() -> (SlidingWindowLimiter, ManualClock) {
        let clock = ManualClock::new();
        let limiter =
            SlidingWindowLimiter::with_clock(RateLimitConfig::default(), Arc::new(clock.clone()));
        (limiter, clock)
    }

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 10);
        assert_eq!(config.window, Duration::from_secs(60));
    }

    #[test]
    fn test_eleventh_request_denied() {
        let (limiter, _clock) = limiter_with_clock();

        for _ in 0..10 {
            assert!(limiter.try_acquire());
        }
        assert!(!limiter.try_acquire());
        assert_eq!(limiter.current_count(), 10);
    }

    #[test]
    fn test_slot_frees_after_window() {
        let (limiter, clock) = limiter_with_clock();

        for _ in 0..10 {
            assert!(limiter.try_acquire());
        }
        assert!(!limiter.try_acquire());

        clock.advance(Duration::from_secs(60) + Duration::from_millis(1));
        assert!(limiter.try_acquire());
    }

    #[test]
    fn test_entry_at_window_edge_still_counts() {
        let (limiter, clock) = limiter_with_clock();

        for _ in 0..10 {
            assert!(limiter.try_acquire());
        }

        clock.advance(Duration::from_secs(60));
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn test_partial_eviction() {
        let (limiter, clock) = limiter_with_clock();

        for _ in 0..5 {
            assert!(limiter.try_acquire());
        }
        clock.advance(Duration::from_secs(30));
        for _ in 0..5 {
            assert!(limiter.try_acquire());
        }
        assert!(!limiter.try_acquire());

        // Only the first five have expired
        clock.advance(Duration::from_secs(31));
        assert_eq!(limiter.current_count(), 5);
        assert_eq!(limiter.remaining(), 5);
    }

    #[test]
    fn test_denied_attempts_not_recorded() {
        let (limiter, clock) = limiter_with_clock();

        for _ in 0..10 {
            assert!(limiter.try_acquire());
        }
        for _ in 0..20 {
            assert!(!limiter.try_acquire());
        }

        clock.advance(Duration::from_secs(61));
        assert_eq!(limiter.current_count(), 0);
        for _ in 0..10 {
            assert!(limiter.try_acquire());
        }
    }

    #[test]
    fn test_explicit_timestamps() {
        let limiter = SlidingWindowLimiter::new(RateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(60),
        });
        let start = Instant::now();

        assert!(limiter.try_acquire_at(start));
        assert!(limiter.try_acquire_at(start + Duration::from_secs(10)));
        assert!(!limiter.try_acquire_at(start + Duration::from_secs(20)));
        assert!(limiter.try_acquire_at(start + Duration::from_secs(61)));
        assert!(!limiter.try_acquire_at(start + Duration::from_secs(62)));
    }

    #[test]
    fn test_reset() {
        let (limiter, _clock) = limiter_with_clock();

        for _ in 0..10 {
            assert!(limiter.try_acquire());
        }
        limiter.reset();
        assert!(limiter.try_acquire());
    }

    #[test]
    fn test_concurrent_callers_never_exceed_limit() {
        let clock = ManualClock::new();
        let limiter = Arc::new(SlidingWindowLimiter::with_clock(
            RateLimitConfig::default(),
            Arc::new(clock),
        ));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || (0..4).filter(|_| limiter.try_acquire()).count())
            })
            .collect();

        let granted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(granted, 10);
    }
}
