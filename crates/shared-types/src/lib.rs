//! # Shared Types Crate
//!
//! This crate contains the domain entities exchanged between the Hashweave
//! subsystems. Nothing here performs I/O or holds locks; every type is a
//! plain value that can be cloned across pipeline stages.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Immutable Values**: Events, windows and notifications are never mutated
//!   after construction. A new value replaces the old one.
//! - **Validated Construction**: Types carrying invariants (`Roster`,
//!   `EventWindow`) are only built through fallible constructors.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | `entities` | `NodeId`, `Hash`, `Signature`, `Roster`, `Threshold` |
//! | `window` | `EventWindow`, `AncientMode` |
//! | `events` | `Transaction`, `UnsignedEvent`, `PlatformEvent`, `ConsensusRound` |
//! | `status` | `PlatformStatus`, `PlatformStatusAction`, `StatusActionSubmitter`, `IssNotification` |
//! | `time` | `TimeSource` and its system and manual implementations |

pub mod entities;
pub mod errors;
pub mod events;
pub mod status;
pub mod time;
pub mod window;

pub use entities::*;
pub use errors::*;
pub use events::*;
pub use status::*;
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource, Timestamp};
pub use window::{AncientMode, EventWindow, ROUND_FIRST, ROUND_NEGATIVE_INFINITY};
