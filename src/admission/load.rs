use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;

/// Sampling tick for the lag probe.
const SAMPLE_TICK: Duration = Duration::from_millis(100);

/// Tracks runtime scheduling lag as a saturation signal.
///
/// A background task sleeps for a fixed tick and records how much longer than
/// the tick it actually took to wake up. The load-shedding gate reads the last
/// sample and rejects requests once it crosses the configured threshold.
#[derive(Clone)]
pub struct LoadMonitor {
    lag_ms: Arc<AtomicU64>,
    threshold: Duration,
}

impl LoadMonitor {
    pub fn new(threshold: Duration) -> Self {
        Self {
            lag_ms: Arc::new(AtomicU64::new(0)),
            threshold,
        }
    }

    pub fn spawn_sampler(&self) -> tokio::task::JoinHandle<()> {
        let monitor = self.clone();
        tokio::spawn(async move {
            loop {
                let start = Instant::now();
                tokio::time::sleep(SAMPLE_TICK).await;
                let lag = start.elapsed().saturating_sub(SAMPLE_TICK);
                monitor.record_lag(lag);
            }
        })
    }

    pub fn record_lag(&self, lag: Duration) {
        self.lag_ms.store(lag.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn current_lag(&self) -> Duration {
        Duration::from_millis(self.lag_ms.load(Ordering::Relaxed))
    }

    pub fn is_overloaded(&self) -> bool {
        self.current_lag() > self.threshold
    }
}
