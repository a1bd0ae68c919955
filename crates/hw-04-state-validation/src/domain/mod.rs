//! Domain layer for state validation.

pub mod config;
pub mod errors;
pub mod iss_detector;
pub mod mapping;
pub mod round;
pub mod signed_state;
pub mod state_hasher;

pub use config::{IssDetectorConfig, StateHasherConfig, DO_NOT_IGNORE_ROUNDS};
pub use errors::{StateValidationError, StateValidationResult};
pub use iss_detector::IssDetector;
pub use mapping::map_iss_to_status_action;
pub use round::RoundHashTally;
pub use signed_state::{ReservedSignedState, SignedState, StateWithHashComplexity};
pub use state_hasher::StateHasher;
