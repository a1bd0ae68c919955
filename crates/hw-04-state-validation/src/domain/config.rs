//! State validation configuration.

use std::time::Duration;

use serde::Deserialize;

use super::errors::{StateValidationError, StateValidationResult};

/// Disables the ignored-round exclusion.
pub const DO_NOT_IGNORE_ROUNDS: i64 = -1;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IssDetectorConfig {
    /// Rounds on each side of the latest round that are tracked.
    pub rounds_non_ancient: u64,
    /// Drop signature transactions until preconsensus replay has finished.
    pub ignore_preconsensus_signatures: bool,
    /// A round excluded from detection, or `DO_NOT_IGNORE_ROUNDS`.
    pub ignored_round: i64,
}

impl Default for IssDetectorConfig {
    fn default() -> Self {
        Self {
            rounds_non_ancient: 26,
            ignore_preconsensus_signatures: true,
            ignored_round: DO_NOT_IGNORE_ROUNDS,
        }
    }
}

impl IssDetectorConfig {
    pub fn validate(&self) -> StateValidationResult<()> {
        if self.rounds_non_ancient == 0 {
            return Err(StateValidationError::InvalidConfig(
                "rounds_non_ancient must be at least 1".to_string(),
            ));
        }
        if self.ignored_round < DO_NOT_IGNORE_ROUNDS {
            return Err(StateValidationError::InvalidConfig(format!(
                "ignored_round must be a round number or {DO_NOT_IGNORE_ROUNDS}, got {}",
                self.ignored_round
            )));
        }
        Ok(())
    }

    pub fn ignored_round(&self) -> Option<u64> {
        u64::try_from(self.ignored_round).ok()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StateHasherConfig {
    /// Hashing slower than this is logged.
    pub slow_hash_warning_ms: u64,
}

impl Default for StateHasherConfig {
    fn default() -> Self {
        Self {
            slow_hash_warning_ms: 1_000,
        }
    }
}

impl StateHasherConfig {
    pub fn slow_hash_warning(&self) -> Duration {
        Duration::from_millis(self.slow_hash_warning_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_round_sentinel() {
        assert_eq!(IssDetectorConfig::default().ignored_round(), None);
        let config = IssDetectorConfig {
            ignored_round: 7,
            ..IssDetectorConfig::default()
        };
        assert_eq!(config.ignored_round(), Some(7));
    }

    #[test]
    fn test_validation() {
        assert!(IssDetectorConfig::default().validate().is_ok());
        let zero = IssDetectorConfig {
            rounds_non_ancient: 0,
            ..IssDetectorConfig::default()
        };
        assert!(zero.validate().is_err());
        let negative = IssDetectorConfig {
            ignored_round: -5,
            ..IssDetectorConfig::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let config: IssDetectorConfig =
            serde_json::from_str(r#"{"ignore_preconsensus_signatures": false}"#).unwrap();
        assert_eq!(config.rounds_non_ancient, 26);
        assert!(!config.ignore_preconsensus_signatures);
    }
}
