//! Gossip sync configuration.

use serde::Deserialize;

use super::errors::{SyncError, SyncResult};

/// Fraction of tracked peers that must report us behind before we act.
///
/// The policy is a collaborator input: the sync subsystem only compares
/// `reported > fraction * peers`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallenBehindThreshold {
    fraction: f64,
}

impl FallenBehindThreshold {
    pub fn new(fraction: f64) -> SyncResult<Self> {
        if !(0.0..1.0).contains(&fraction) {
            return Err(SyncError::InvalidThreshold(fraction));
        }
        Ok(Self { fraction })
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn is_exceeded(&self, reported: usize, peers: usize) -> bool {
        reported as f64 > self.fraction * peers as f64
    }
}

impl Default for FallenBehindThreshold {
    fn default() -> Self {
        Self { fraction: 0.5 }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub fallen_behind_threshold: f64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            fallen_behind_threshold: FallenBehindThreshold::default().fraction(),
        }
    }
}

impl SyncConfig {
    pub fn threshold(&self) -> SyncResult<FallenBehindThreshold> {
        FallenBehindThreshold::new(self.fallen_behind_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strictly_greater() {
        let half = FallenBehindThreshold::default();
        assert!(!half.is_exceeded(2, 4));
        assert!(half.is_exceeded(3, 4));
        assert!(!half.is_exceeded(0, 0));
    }

    #[test]
    fn test_threshold_range_checked() {
        assert_eq!(
            FallenBehindThreshold::new(1.5),
            Err(SyncError::InvalidThreshold(1.5))
        );
        assert!(FallenBehindThreshold::new(f64::NAN).is_err());
        // a fraction of one could never be exceeded
        assert_eq!(
            FallenBehindThreshold::new(1.0),
            Err(SyncError::InvalidThreshold(1.0))
        );
        assert!(FallenBehindThreshold::new(0.0).is_ok());
        assert!(FallenBehindThreshold::new(0.99).is_ok());
        let config: SyncConfig = serde_json::from_str(r#"{"fallen_behind_threshold": 0.25}"#).unwrap();
        assert_eq!(config.threshold().unwrap().fraction(), 0.25);
    }
}
