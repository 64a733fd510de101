//! Fixed-window request admission.
//!
//! Each client key owns a counter and a window boundary. The window rolls
//! forward when a request arrives after the boundary; it does not slide.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Request may proceed; `remaining` more fit in the current window.
    Admit { remaining: u32 },
    /// Request must be refused until the window resets.
    Reject { retry_after: Duration },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admit { .. })
    }
}

/// Admission filter shared by every request-handling task.
///
/// Implementations must make the per-key read-modify-write atomic: two
/// concurrent checks on one key may never lose an increment.
pub trait RateLimiter: Send + Sync + 'static {
    fn check(&self, key: &str) -> Admission;

    /// Drops state that can no longer affect a decision. Optional.
    fn purge_expired(&self) {}
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    count: u32,
    reset_at: Instant,
}

/// In-process fixed-window counter. Does not coordinate across instances.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    buckets: DashMap<String, Bucket>,
    max_requests: u32,
    window: Duration,
}

impl Default for FixedWindowLimiter {
    /// 60 requests per 60 seconds.
    fn default() -> Self {
        Self::new(60, Duration::from_secs(60))
    }
}

impl FixedWindowLimiter {
    /// Creates a limiter admitting `max_requests` per `window` for each key.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            buckets: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }

    /// Admission check against an explicit clock reading.
    pub fn check_at(&self, key: &str, now: Instant) -> Admission {
        // The entry guard holds the shard lock for the whole update.
        let mut bucket = self.buckets.entry(key.to_owned()).or_insert_with(|| Bucket {
            count: 0,
            reset_at: now + self.window,
        });

        if now > bucket.reset_at {
            bucket.count = 0;
            bucket.reset_at = now + self.window;
        }

        bucket.count = bucket.count.saturating_add(1);

        if bucket.count > self.max_requests {
            Admission::Reject {
                retry_after: bucket.reset_at.saturating_duration_since(now),
            }
        } else {
            Admission::Admit {
                remaining: self.max_requests - bucket.count,
            }
        }
    }

    /// Removes buckets whose window ended before `now`.
    pub fn purge_expired_at(&self, now: Instant) {
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| bucket.reset_at >= now);
        let purged = before.saturating_sub(self.buckets.len());
        if purged > 0 {
            tracing::debug!(purged, remaining = self.buckets.len(), "purged idle rate buckets");
        }
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn check(&self, key: &str) -> Admission {
        self.check_at(key, Instant::now())
    }

    fn purge_expired(&self) {
        self.purge_expired_at(Instant::now());
    }
}
