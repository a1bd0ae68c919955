//! Tick lag as a health signal.
//!
//! A late creation tick means the runtime is not keeping up. The node
//! counts as unhealthy from the first late tick until a tick arrives on time
//! again, at which point a single `ZERO` report signals recovery.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
pub struct HealthMonitor {
    tolerated_lag: Duration,
    unhealthy_since: Option<Instant>,
}

impl HealthMonitor {
    pub fn new(tolerated_lag: Duration) -> Self {
        Self {
            tolerated_lag,
            unhealthy_since: None,
        }
    }

    /// The duration to report for a tick scheduled at `deadline` that ran at
    /// `now`, or `None` while healthy.
    pub fn observe(&mut self, deadline: Instant, now: Instant) -> Option<Duration> {
        let lag = now.saturating_duration_since(deadline);
        if lag > self.tolerated_lag {
            let since = *self.unhealthy_since.get_or_insert(deadline);
            return Some(now.saturating_duration_since(since));
        }
        self.unhealthy_since.take().map(|_| Duration::ZERO)
    }

    pub fn is_unhealthy(&self) -> bool {
        self.unhealthy_since.is_some()
    }
}
