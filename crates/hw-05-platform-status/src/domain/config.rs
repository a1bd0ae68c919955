//! Platform status configuration.

use std::time::Duration;

use serde::Deserialize;

use super::errors::{PlatformStatusError, PlatformStatusResult};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlatformStatusConfig {
    /// Time spent in `Observing` before moving to `Checking`.
    pub observing_status_delay_ms: u64,
    /// `Active` falls back to `Checking` if no self event reaches consensus
    /// for this long.
    pub active_status_delay_ms: u64,
}

impl Default for PlatformStatusConfig {
    fn default() -> Self {
        Self {
            observing_status_delay_ms: 10_000,
            active_status_delay_ms: 10_000,
        }
    }
}

impl PlatformStatusConfig {
    pub fn validate(&self) -> PlatformStatusResult<()> {
        if self.active_status_delay_ms == 0 {
            return Err(PlatformStatusError::InvalidConfig(
                "active_status_delay_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn observing_status_delay(&self) -> Duration {
        Duration::from_millis(self.observing_status_delay_ms)
    }

    pub fn active_status_delay(&self) -> Duration {
        Duration::from_millis(self.active_status_delay_ms)
    }
}
