use std::net::IpAddr;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Outcome of a rate-limit check.
pub enum RateDecision {
    Allowed { limit: u32, remaining: u32 },
    Limited { limit: u32, retry_after: Duration },
}

/// In-memory per-IP fixed-window request counter, scoped by the middleware to
/// API paths only.
pub struct RateLimitState {
    max_requests: u32,
    window: Duration,
    counters: DashMap<IpAddr, WindowCounter>,
}

struct WindowCounter {
    count: u32,
    window_start: Instant,
}

impl RateLimitState {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            counters: DashMap::new(),
        }
    }

    pub fn check(&self, ip: IpAddr) -> RateDecision {
        let now = Instant::now();
        let mut entry = self.counters.entry(ip).or_insert(WindowCounter {
            count: 0,
            window_start: now,
        });

        let elapsed = now.duration_since(entry.window_start);
        if elapsed >= self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= self.max_requests {
            RateDecision::Limited {
                limit: self.max_requests,
                retry_after: self.window.saturating_sub(elapsed),
            }
        } else {
            entry.count += 1;
            RateDecision::Allowed {
                limit: self.max_requests,
                remaining: self.max_requests - entry.count,
            }
        }
    }

    /// Drops counters whose window has expired.
    pub fn sweep(&self) {
        let window = self.window;
        self.counters
            .retain(|_, counter| counter.window_start.elapsed() < window);
    }

    pub fn tracked_ips(&self) -> usize {
        self.counters.len()
    }
}
