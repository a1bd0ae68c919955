//! Telemetry configuration from environment variables.

use std::env;

use serde::Deserialize;

/// Configuration for logging and metrics export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Prometheus metrics port
    pub metrics_port: u16,

    /// Network identifier (testnet, mainnet, devnet)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "hashweave".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            metrics_port: 9100,
            network: "testnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `HW_SERVICE_NAME`: Service name (default: hashweave)
    /// - `HW_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `HW_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `HW_METRICS_PORT`: Prometheus metrics port (default: 9100)
    /// - `HW_NETWORK`: Network name (default: testnet)
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment variables on top of an existing configuration.
    pub fn with_env_overrides(mut self) -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        if let Ok(name) = env::var("HW_SERVICE_NAME") {
            self.service_name = name;
        }
        if let Ok(level) = env::var("HW_LOG_LEVEL").or_else(|_| env::var("RUST_LOG")) {
            self.log_level = level;
        }
        self.json_logs = env::var("HW_JSON_LOGS")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(self.json_logs || is_container);
        if let Some(port) = env::var("HW_METRICS_PORT").ok().and_then(|v| v.parse().ok()) {
            self.metrics_port = port;
        }
        if let Ok(network) = env::var("HW_NETWORK") {
            self.network = network;
        }
        self
    }

    /// Service name qualified by network, e.g. `hashweave-testnet`.
    pub fn full_service_name(&self) -> String {
        format!("{}-{}", self.service_name, self.network)
    }
}
