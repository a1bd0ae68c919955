//! # Node Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! Loaded from the JSON file named by `HW_CONFIG_PATH` when set, otherwise
//! from defaults. `HW_NODE_ID` and `HW_KEY_SEED` override the file.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use hw_01_transaction_pool::TransactionPoolConfig;
use hw_02_event_creation::EventCreationConfig;
use hw_03_gossip_sync::SyncConfig;
use hw_04_state_validation::{IssDetectorConfig, StateHasherConfig};
use hw_05_platform_status::PlatformStatusConfig;
use hw_telemetry::TelemetryConfig;
use serde::Deserialize;
use shared_crypto::Ed25519KeyPair;
use shared_types::{NodeId, Roster, RosterEntry};
use tracing::info;

use crate::errors::{NodeError, NodeResult};

/// One roster member as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RosterMemberConfig {
    pub node_id: u64,
    pub weight: u64,
    /// Hex encoded Ed25519 public key. Zeroes when absent.
    #[serde(default)]
    pub public_key: Option<String>,
}

/// Intervals of the runtime's own timers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// How often `TimeElapsed` is fed to the status machine.
    pub status_tick_interval_ms: u64,
    /// Capacity of the bounded stage channels.
    pub channel_capacity: usize,
    /// Rounds after which an event is expired and no longer gossiped.
    /// At least `iss_detector.rounds_non_ancient`.
    pub rounds_expired: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            status_tick_interval_ms: 100,
            channel_capacity: 1_024,
            rounds_expired: 500,
        }
    }
}

impl RuntimeConfig {
    pub fn status_tick_interval(&self) -> Duration {
        Duration::from_millis(self.status_tick_interval_ms)
    }
}

/// Complete node configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub node_id: u64,
    /// Hex encoded 32 byte signing key seed. A fresh key when absent.
    pub key_seed: Option<String>,
    pub roster: Vec<RosterMemberConfig>,
    pub transaction_pool: TransactionPoolConfig,
    pub event_creation: EventCreationConfig,
    pub sync: SyncConfig,
    pub iss_detector: IssDetectorConfig,
    pub state_hasher: StateHasherConfig,
    pub platform_status: PlatformStatusConfig,
    pub telemetry: TelemetryConfig,
    pub runtime: RuntimeConfig,
}

impl Default for NodeConfig {
    /// A single node network.
    fn default() -> Self {
        Self {
            node_id: 0,
            key_seed: None,
            roster: vec![RosterMemberConfig {
                node_id: 0,
                weight: 1,
                public_key: None,
            }],
            transaction_pool: TransactionPoolConfig::default(),
            event_creation: EventCreationConfig::default(),
            sync: SyncConfig::default(),
            iss_detector: IssDetectorConfig::default(),
            state_hasher: StateHasherConfig::default(),
            platform_status: PlatformStatusConfig::default(),
            telemetry: TelemetryConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Defaults, an optional `HW_CONFIG_PATH` file, then environment overrides.
    pub fn load() -> NodeResult<Self> {
        let config = match env::var("HW_CONFIG_PATH") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.with_env_overrides()
    }

    pub fn from_file(path: impl AsRef<Path>) -> NodeResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| NodeError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&raw)?;
        info!(path = %path.display(), "Loaded node configuration");
        Ok(config)
    }

    pub fn from_json(raw: &str) -> NodeResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_env_overrides(mut self) -> NodeResult<Self> {
        if let Ok(node_id) = env::var("HW_NODE_ID") {
            self.node_id = node_id
                .parse()
                .map_err(|_| NodeError::InvalidConfig(format!("HW_NODE_ID is not a u64: {node_id}")))?;
        }
        if let Ok(seed) = env::var("HW_KEY_SEED") {
            self.key_seed = Some(seed);
        }
        self.telemetry = self.telemetry.with_env_overrides();
        Ok(self)
    }

    /// Checks spanning more than one section.
    pub fn validate(&self) -> NodeResult<()> {
        if self.runtime.rounds_expired < self.iss_detector.rounds_non_ancient {
            return Err(NodeError::InvalidConfig(format!(
                "runtime.rounds_expired ({}) is below iss_detector.rounds_non_ancient ({})",
                self.runtime.rounds_expired, self.iss_detector.rounds_non_ancient
            )));
        }
        Ok(())
    }

    pub fn self_id(&self) -> NodeId {
        NodeId(self.node_id)
    }

    pub fn build_roster(&self) -> NodeResult<Roster> {
        let entries = self
            .roster
            .iter()
            .map(|member| {
                let public_key = match &member.public_key {
                    Some(key) => decode_key(key, "roster public key")?,
                    None => [0u8; 32],
                };
                Ok(RosterEntry {
                    node_id: NodeId(member.node_id),
                    weight: member.weight,
                    public_key,
                })
            })
            .collect::<NodeResult<Vec<_>>>()?;
        let roster = Roster::new(entries)?;
        if !roster.contains(self.self_id()) {
            return Err(NodeError::InvalidConfig(format!(
                "node {} is not in the roster",
                self.node_id
            )));
        }
        Ok(roster)
    }

    pub fn signing_key(&self) -> NodeResult<Ed25519KeyPair> {
        match &self.key_seed {
            Some(seed) => Ok(Ed25519KeyPair::from_seed(decode_key(seed, "key seed")?)),
            None => Ok(Ed25519KeyPair::generate()),
        }
    }
}

fn decode_key(encoded: &str, what: &str) -> NodeResult<[u8; 32]> {
    let bytes = hex::decode(encoded)
        .map_err(|e| NodeError::InvalidConfig(format!("{what} is not hex: {e}")))?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| NodeError::InvalidConfig(format!("{what} must be 32 bytes")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_single_node() {
        let config = NodeConfig::default();
        let roster = config.build_roster().unwrap();
        assert_eq!(roster.len(), 1);
        assert!(roster.contains(NodeId(0)));
    }

    #[test]
    fn test_partial_json() {
        let config = NodeConfig::from_json(
            r#"{
                "node_id": 2,
                "roster": [
                    {"node_id": 1, "weight": 5},
                    {"node_id": 2, "weight": 7}
                ],
                "sync": {"fallen_behind_threshold": 0.25},
                "iss_detector": {"rounds_non_ancient": 10}
            }"#,
        )
        .unwrap();
        assert_eq!(config.self_id(), NodeId(2));
        assert_eq!(config.build_roster().unwrap().total_weight(), 12);
        assert_eq!(config.iss_detector.rounds_non_ancient, 10);
        assert_eq!(config.transaction_pool, TransactionPoolConfig::default());
    }

    #[test]
    fn test_self_missing_from_roster_rejected() {
        let config = NodeConfig {
            node_id: 9,
            ..NodeConfig::default()
        };
        assert!(matches!(
            config.build_roster(),
            Err(NodeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_roster_rejected() {
        let config = NodeConfig {
            roster: vec![],
            ..NodeConfig::default()
        };
        assert!(matches!(config.build_roster(), Err(NodeError::Roster(_))));
    }

    #[test]
    fn test_key_seed_decoding() {
        let config = NodeConfig {
            key_seed: Some(hex::encode([7u8; 32])),
            ..NodeConfig::default()
        };
        let key = config.signing_key().unwrap();
        assert_eq!(
            key.public_key().as_bytes(),
            Ed25519KeyPair::from_seed([7u8; 32]).public_key().as_bytes()
        );

        let short = NodeConfig {
            key_seed: Some("abcd".to_string()),
            ..NodeConfig::default()
        };
        assert!(short.signing_key().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"runtime": {{"status_tick_interval_ms": 5}}}}"#).unwrap();
        let config = NodeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.runtime.status_tick_interval(), Duration::from_millis(5));

        assert!(matches!(
            NodeConfig::from_file("/nonexistent/hashweave.json"),
            Err(NodeError::ConfigRead { .. })
        ));
    }

    #[test]
    fn test_rounds_expired_not_below_non_ancient() {
        let mut config = NodeConfig::default();
        assert_eq!(config.runtime.rounds_expired, 500);
        assert!(config.validate().is_ok());

        config.runtime.rounds_expired = config.iss_detector.rounds_non_ancient;
        assert!(config.validate().is_ok());

        config.runtime.rounds_expired -= 1;
        assert!(matches!(config.validate(), Err(NodeError::InvalidConfig(_))));

        let parsed = NodeConfig::from_json(r#"{"runtime": {"rounds_expired": 40}}"#).unwrap();
        assert_eq!(parsed.runtime.rounds_expired, 40);
        assert_eq!(parsed.runtime.channel_capacity, 1_024);
    }
}
