use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Sliding-window rate limiter, independent of any HTTP transport.
///
/// Tracks the timestamps of recent calls; once `max_calls` land inside the
/// window, `wait_time` reports how long until the oldest falls out. The
/// current instant is always a parameter, so tests drive it with synthetic
/// clocks and no sleeping.
pub struct SlidingWindowLimiter {
    max_calls: usize,
    window: Duration,
    timestamps: VecDeque<Instant>,
}

impl SlidingWindowLimiter {
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            timestamps: VecDeque::with_capacity(max_calls),
        }
    }

    /// The Polygon Starter plan allows 5 requests per minute.
    pub fn polygon_starter() -> Self {
        Self::new(5, Duration::from_secs(60))
    }

    /// How long a caller must wait before the next call is allowed.
    /// Zero when the window still has room. Expired timestamps are pruned.
    pub fn wait_time(&mut self, now: Instant) -> Duration {
        while let Some(&oldest) = self.timestamps.front() {
            if now.duration_since(oldest) >= self.window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }

        if self.timestamps.len() < self.max_calls {
            return Duration::ZERO;
        }
        match self.timestamps.front() {
            Some(&oldest) => self.window.saturating_sub(now.duration_since(oldest)),
            None => Duration::ZERO,
        }
    }

    /// Record that a call was made at `now`.
    pub fn record(&mut self, now: Instant) {
        self.timestamps.push_back(now);
    }

    /// Whether a call at `now` would be allowed without waiting.
    pub fn can_call(&mut self, now: Instant) -> bool {
        self.wait_time(now).is_zero()
    }

    /// Number of calls still inside the window as of the last query.
    pub fn recent_calls(&self) -> usize {
        self.timestamps.len()
    }
}
