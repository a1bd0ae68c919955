//! Event creation phases, reported for observability.

use std::fmt;

/// Why the node is or is not creating an event right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EventCreationStatus {
    #[default]
    Idle,
    AttemptingCreation,
    /// Rules permitted creation but no legal parent pairing existed.
    NoEligibleParents,
    /// Blocked by the maximum rate rule, or just created an event.
    RateLimited,
    /// Blocked by the platform status rule.
    PlatformStatus,
    /// Blocked by the platform health rule.
    Overloaded,
}

impl EventCreationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EventCreationStatus::Idle => "idle",
            EventCreationStatus::AttemptingCreation => "attempting_creation",
            EventCreationStatus::NoEligibleParents => "no_eligible_parents",
            EventCreationStatus::RateLimited => "rate_limited",
            EventCreationStatus::PlatformStatus => "platform_status",
            EventCreationStatus::Overloaded => "overloaded",
        }
    }
}

impl fmt::Display for EventCreationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
