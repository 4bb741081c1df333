use std::collections::VecDeque;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// How long connection timestamps are kept per IP.
const HISTORY_WINDOW: Duration = Duration::from_secs(60);

/// Per-IP transport-level connection limiter.
///
/// Sits beneath the HTTP layer: it only sees socket open/close events and the
/// remote address. An over-limit socket is dropped by the accept loop with no
/// HTTP response framed, which is deliberate — connection floods get a closed
/// socket, not a polite 429.
#[derive(Clone)]
pub struct ConnectionTracker {
    inner: Arc<TrackerInner>,
}

struct TrackerInner {
    max_active: usize,
    max_queue: usize,
    clients: DashMap<IpAddr, ClientState>,
}

#[derive(Default)]
struct ClientState {
    active: usize,
    recent: VecDeque<Instant>,
}

impl ClientState {
    fn prune(&mut self, now: Instant) {
        while self
            .recent
            .front()
            .is_some_and(|t| now.duration_since(*t) > HISTORY_WINDOW)
        {
            self.recent.pop_front();
        }
    }
}

/// Live-connection token. Dropping it decrements the owning IP's count.
pub struct ConnectionGuard {
    inner: Arc<TrackerInner>,
    ip: IpAddr,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if let Some(mut entry) = self.inner.clients.get_mut(&self.ip) {
            entry.active = entry.active.saturating_sub(1);
        }
        // Remove the entry once the IP has no live connections and its
        // request history has aged out, so the map is bounded by currently
        // connected IPs plus a short tail.
        self.inner.clients.remove_if(&self.ip, |_, state| {
            state.active == 0
                && state
                    .recent
                    .back()
                    .is_none_or(|t| t.elapsed() >= HISTORY_WINDOW)
        });
    }
}

impl ConnectionTracker {
    pub fn new(max_active: usize, max_queue: usize) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                max_active,
                max_queue,
                clients: DashMap::new(),
            }),
        }
    }

    /// Admits a new connection from `ip`, or returns `None` when the IP is
    /// over its concurrent-connection cap or has queued too many connection
    /// attempts in the last minute.
    pub fn try_admit(&self, ip: IpAddr) -> Option<ConnectionGuard> {
        let now = Instant::now();
        let admitted = {
            let mut entry = self.inner.clients.entry(ip).or_default();
            entry.prune(now);
            if entry.active >= self.inner.max_active || entry.recent.len() >= self.inner.max_queue
            {
                false
            } else {
                entry.active += 1;
                entry.recent.push_back(now);
                true
            }
        };

        admitted.then(|| ConnectionGuard {
            inner: Arc::clone(&self.inner),
            ip,
        })
    }

    /// Number of live connections currently attributed to `ip`.
    pub fn active(&self, ip: IpAddr) -> usize {
        self.inner.clients.get(&ip).map_or(0, |e| e.active)
    }

    /// Number of IPs currently tracked.
    pub fn tracked_ips(&self) -> usize {
        self.inner.clients.len()
    }

    /// Drops entries with no live connections and no recent history.
    pub fn sweep(&self) {
        let now = Instant::now();
        self.inner.clients.retain(|_, state| {
            state.prune(now);
            state.active > 0 || !state.recent.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[test]
    fn admits_up_to_cap_then_rejects() {
        let tracker = ConnectionTracker::new(2, 100);
        let g1 = tracker.try_admit(ip(1)).expect("first admitted");
        let g2 = tracker.try_admit(ip(1)).expect("second admitted");
        assert!(tracker.try_admit(ip(1)).is_none());
        assert_eq!(tracker.active(ip(1)), 2);

        // Another IP has its own budget.
        assert!(tracker.try_admit(ip(2)).is_some());

        drop(g1);
        assert_eq!(tracker.active(ip(1)), 1);
        let _g3 = tracker.try_admit(ip(1)).expect("capacity restored");
        drop(g2);
    }

    #[test]
    fn guard_drop_decrements_to_zero() {
        let tracker = ConnectionTracker::new(4, 100);
        let guards: Vec<_> = (0..3).map(|_| tracker.try_admit(ip(9)).unwrap()).collect();
        assert_eq!(tracker.active(ip(9)), 3);
        drop(guards);
        assert_eq!(tracker.active(ip(9)), 0);
    }

    #[test]
    fn connection_churn_hits_queue_bound() {
        let tracker = ConnectionTracker::new(10, 3);
        for _ in 0..3 {
            drop(tracker.try_admit(ip(5)).expect("within queue bound"));
        }
        // No live connections, but the 60s history is full.
        assert_eq!(tracker.active(ip(5)), 0);
        assert!(tracker.try_admit(ip(5)).is_none());
    }

    #[test]
    fn sweep_keeps_entries_with_live_connections() {
        let tracker = ConnectionTracker::new(10, 100);
        let _guard = tracker.try_admit(ip(7)).unwrap();
        drop(tracker.try_admit(ip(8)).unwrap());
        assert_eq!(tracker.tracked_ips(), 2);

        tracker.sweep();
        // ip(8) still has fresh history, ip(7) a live connection.
        assert_eq!(tracker.tracked_ips(), 2);
        assert_eq!(tracker.active(ip(7)), 1);
    }
}
