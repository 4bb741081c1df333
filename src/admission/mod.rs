// Transient per-process abuse-control state, rebuilt from zero on restart.
// Constructed at startup and injected into the pipeline instead of living
// in module-level globals.

mod load;
mod rate_limit;
mod tracker;

use std::sync::Arc;
use std::time::Duration;

pub use load::LoadMonitor;
pub use rate_limit::{RateDecision, RateLimitState};
pub use tracker::{ConnectionGuard, ConnectionTracker};

use crate::config::Config;

pub struct AdmissionState {
    tracker: ConnectionTracker,
    rate: RateLimitState,
    load: LoadMonitor,
    sweep_interval: Duration,
}

impl AdmissionState {
    pub fn new(config: &Config) -> Self {
        Self {
            tracker: ConnectionTracker::new(
                config.max_connections_per_ip,
                config.max_request_queue,
            ),
            rate: RateLimitState::new(config.rate_limit_requests, config.rate_limit_window()),
            load: LoadMonitor::new(Duration::from_millis(config.load_shed_lag_ms)),
            sweep_interval: config.rate_limit_window(),
        }
    }

    pub fn tracker(&self) -> &ConnectionTracker {
        &self.tracker
    }

    pub fn rate(&self) -> &RateLimitState {
        &self.rate
    }

    pub fn load(&self) -> &LoadMonitor {
        &self.load
    }

    /// Spawns the event-loop lag sampler and the periodic sweep that evicts
    /// idle tracker entries and expired rate windows, so IPs that stop
    /// connecting cannot grow either map without bound.
    pub fn start_background(self: &Arc<Self>) -> Vec<tokio::task::JoinHandle<()>> {
        let sampler = self.load.spawn_sampler();

        let state = Arc::clone(self);
        let sweeper = tokio::spawn(async move {
            let mut interval = tokio::time::interval(state.sweep_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                state.tracker.sweep();
                state.rate.sweep();
            }
        });

        vec![sampler, sweeper]
    }
}
