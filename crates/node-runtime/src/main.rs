//! # Hashweave Node
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (`HW_CONFIG_PATH`, then environment overrides)
//! 2. Initialize logging and metrics
//! 3. Build every subsystem, failing fast on invalid configuration
//! 4. Spawn the stages
//! 5. Run until Ctrl+C, then shut down gracefully
//!
//! Without a gossip network only a single node roster can run: its own
//! events are ordered by a loopback, one round per event.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use node_runtime::adapters::{InMemoryStateStore, LoopbackOrdering};
use node_runtime::{NodeConfig, NodeRuntime, RuntimeCollaborators};
use shared_types::SystemTimeSource;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::load().context("Failed to load node configuration")?;
    let _telemetry =
        hw_telemetry::init_telemetry(&config.telemetry).context("Failed to initialize telemetry")?;

    if config.roster.len() != 1 {
        bail!(
            "roster has {} members; only a single node network can run without a gossip transport",
            config.roster.len()
        );
    }

    let (ordering, rounds) = LoopbackOrdering::new(config.runtime.channel_capacity.max(1));
    let runtime = NodeRuntime::start(
        config,
        RuntimeCollaborators {
            rounds: Box::new(rounds),
            gossip: Arc::new(ordering),
            store: Arc::new(InMemoryStateStore::new()),
            time: Arc::new(SystemTimeSource),
        },
    )
    .context("Failed to start node runtime")?;

    info!(node = %runtime.self_id(), "Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    Ok(())
}
