//! Event creation configuration.

use std::time::Duration;

use serde::Deserialize;
use shared_types::AncientMode;

use super::errors::{EventCreationError, EventCreationResult};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EventCreationConfig {
    /// Upper bound on self events per second. `0` disables the limit.
    pub max_creation_rate: f64,
    /// Creation is forbidden once the node has been unhealthy this long.
    pub maximum_permissible_unhealthy_duration_ms: u64,
    /// How often the runtime ticks `maybe_create_event`.
    pub creation_attempt_interval_ms: u64,
    /// Property compared against event window thresholds.
    pub ancient_mode: AncientMode,
    /// Seed for parent tie-breaking. Random when absent.
    pub rng_seed: Option<u64>,
    /// The chance of choosing the most ignored peer as other parent is
    /// `(max_selfishness - 1) / anti_selfishness_factor`. At least 1.
    pub anti_selfishness_factor: f64,
}

impl Default for EventCreationConfig {
    fn default() -> Self {
        Self {
            max_creation_rate: 20.0,
            maximum_permissible_unhealthy_duration_ms: 1_000,
            creation_attempt_interval_ms: 10,
            ancient_mode: AncientMode::BirthRound,
            rng_seed: None,
            anti_selfishness_factor: 10.0,
        }
    }
}

impl EventCreationConfig {
    pub fn maximum_permissible_unhealthy_duration(&self) -> Duration {
        Duration::from_millis(self.maximum_permissible_unhealthy_duration_ms)
    }

    pub fn creation_attempt_interval(&self) -> Duration {
        Duration::from_millis(self.creation_attempt_interval_ms.max(1))
    }

    pub fn validate(&self) -> EventCreationResult<()> {
        if !self.max_creation_rate.is_finite() || self.max_creation_rate < 0.0 {
            return Err(EventCreationError::InvalidConfig(format!(
                "max_creation_rate must be a non-negative number, got {}",
                self.max_creation_rate
            )));
        }
        if self.anti_selfishness_factor.is_nan() || self.anti_selfishness_factor < 1.0 {
            return Err(EventCreationError::InvalidConfig(format!(
                "anti_selfishness_factor must be at least 1, got {}",
                self.anti_selfishness_factor
            )));
        }
        Ok(())
    }

    /// Minimum spacing between two self events, if rate limited.
    pub fn minimum_creation_interval(&self) -> Option<Duration> {
        if self.max_creation_rate > 0.0 {
            Some(Duration::from_secs_f64(1.0 / self.max_creation_rate))
        } else {
            None
        }
    }
}
