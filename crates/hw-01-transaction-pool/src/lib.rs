//! # Transaction Pool Subsystem
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Buffers transactions until the Event Creator drains them into a new self
//! event. Application transactions arrive from client-facing threads while
//! event creation runs on its own pipeline stage, so the pool carries its own
//! lock and drains under it.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | A transaction leaves the pool only by inclusion or `clear()` | `domain/pool.rs` - `get_transactions()` |
//! | INVARIANT-2 | A drained transaction lands in exactly one batch | `domain/pool.rs` - drain under lock |
//! | INVARIANT-3 | System transactions drain before application ones | `domain/pool.rs` - `drain_batch()` |
//!
//! ## Admission
//!
//! ```text
//! submit(payload, is_system)
//!     │
//!     ├── too large ─────────────────────────→ drop + log
//!     │
//!     ├── system ────────────────────────────→ [system queue]
//!     │
//!     └── application
//!             ├── unhealthy / not ACTIVE ─────→ drop + log
//!             ├── queue at throttle size ─────→ drop + log
//!             └── otherwise ──────────────────→ [application queue]
//! ```
//!
//! Rejections are never propagated as hard failures. Losing a non-critical
//! transaction is preferable to stalling event creation.
//!
//! ## Module Structure
//!
//! ```text
//! domain/config.rs - TransactionPoolConfig
//! domain/errors.rs - PoolError, SubmissionRejected
//! domain/pool.rs   - TransactionPool (Mutex-guarded queues)
//! ports/inbound.rs - TransactionPoolApi
//! metrics.rs       - Prometheus gauges and counters (feature `metrics`)
//! ```

pub mod domain;
pub mod metrics;
pub mod ports;

pub use domain::{PoolError, PoolResult, SubmissionRejected, TransactionPool, TransactionPoolConfig};
pub use ports::inbound::TransactionPoolApi;
