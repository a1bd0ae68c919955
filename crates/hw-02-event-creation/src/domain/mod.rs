//! Domain layer for event creation.

pub mod childless;
pub mod config;
pub mod creator;
pub mod errors;
pub mod future_buffer;
pub mod hasher;
pub mod rules;
pub mod signer;
pub mod status;
pub mod tipset;

pub use childless::ChildlessEventTracker;
pub use config::EventCreationConfig;
pub use creator::TipsetEventCreator;
pub use errors::{EventCreationError, EventCreationResult};
pub use future_buffer::FutureEventBuffer;
pub use hasher::EventHasher;
pub use rules::{EventCreationRule, EventCreationRules, RuleContext};
pub use signer::SelfEventSigner;
pub use status::EventCreationStatus;
pub use tipset::{Tipset, TipsetTracker, TipsetWeightCalculator};
