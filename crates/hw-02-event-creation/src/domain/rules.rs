//! # Event Creation Rules
//!
//! A fixed, ordered chain of policies that gate self-event creation. Every
//! rule must permit creation; the first rule that forbids it names the
//! reported [`EventCreationStatus`].
//!
//! | Order | Rule | Forbids when | Status |
//! |-------|------|--------------|--------|
//! | 1 | `MaximumRate` | less than `1 / max_creation_rate` since last creation | `RateLimited` |
//! | 2 | `PlatformStatus` | status not `ACTIVE`/`CHECKING`, except `FREEZING` with buffered system transactions | `PlatformStatus` |
//! | 3 | `PlatformHealth` | unhealthy for longer than the permitted duration | `Overloaded` |
//!
//! Rules read a [`RuleContext`] snapshot; none of them writes platform state.

use std::time::Duration;

use shared_types::{PlatformStatus, Timestamp};

use super::config::EventCreationConfig;
use super::status::EventCreationStatus;

/// Everything a rule may look at when deciding.
#[derive(Clone, Copy, Debug)]
pub struct RuleContext {
    pub now: Timestamp,
    pub platform_status: PlatformStatus,
    pub unhealthy_duration: Duration,
    pub has_buffered_system_transactions: bool,
}

/// Forbids creating events faster than a configured rate.
#[derive(Clone, Debug)]
pub struct MaximumRateRule {
    minimum_interval: Option<Duration>,
    last_creation: Option<Timestamp>,
}

impl MaximumRateRule {
    pub fn new(minimum_interval: Option<Duration>) -> Self {
        Self {
            minimum_interval,
            last_creation: None,
        }
    }

    fn is_permitted(&self, ctx: &RuleContext) -> bool {
        match (self.minimum_interval, self.last_creation) {
            (Some(interval), Some(last)) => {
                let interval = u64::try_from(interval.as_nanos()).unwrap_or(u64::MAX);
                ctx.now.saturating_sub(last) >= interval
            }
            _ => true,
        }
    }
}

/// Creation follows the platform status; see the module table.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlatformStatusRule;

impl PlatformStatusRule {
    fn is_permitted(&self, ctx: &RuleContext) -> bool {
        if ctx.platform_status == PlatformStatus::Freezing {
            // Freeze-round signatures must still reach the network.
            return ctx.has_buffered_system_transactions;
        }
        ctx.platform_status.permits_event_creation()
    }
}

/// Forbids creation while the node has been unhealthy for too long.
#[derive(Clone, Copy, Debug)]
pub struct PlatformHealthRule {
    maximum_permissible_unhealthy_duration: Duration,
}

impl PlatformHealthRule {
    pub fn new(maximum_permissible_unhealthy_duration: Duration) -> Self {
        Self {
            maximum_permissible_unhealthy_duration,
        }
    }

    fn is_permitted(&self, ctx: &RuleContext) -> bool {
        ctx.unhealthy_duration <= self.maximum_permissible_unhealthy_duration
    }
}

/// One link of the chain.
#[derive(Clone, Debug)]
pub enum EventCreationRule {
    MaximumRate(MaximumRateRule),
    PlatformStatus(PlatformStatusRule),
    PlatformHealth(PlatformHealthRule),
}

impl EventCreationRule {
    pub fn is_event_creation_permitted(&self, ctx: &RuleContext) -> bool {
        match self {
            EventCreationRule::MaximumRate(rule) => rule.is_permitted(ctx),
            EventCreationRule::PlatformStatus(rule) => rule.is_permitted(ctx),
            EventCreationRule::PlatformHealth(rule) => rule.is_permitted(ctx),
        }
    }

    pub fn event_was_created(&mut self, now: Timestamp) {
        if let EventCreationRule::MaximumRate(rule) = self {
            rule.last_creation = Some(now);
        }
    }

    /// Status reported while this rule forbids creation.
    pub fn status(&self) -> EventCreationStatus {
        match self {
            EventCreationRule::MaximumRate(_) => EventCreationStatus::RateLimited,
            EventCreationRule::PlatformStatus(_) => EventCreationStatus::PlatformStatus,
            EventCreationRule::PlatformHealth(_) => EventCreationStatus::Overloaded,
        }
    }
}

/// The AND of all rules, evaluated in order.
#[derive(Clone, Debug)]
pub struct EventCreationRules {
    rules: Vec<EventCreationRule>,
}

impl EventCreationRules {
    /// The standard chain: rate, then status, then health.
    pub fn from_config(config: &EventCreationConfig) -> Self {
        Self::new(vec![
            EventCreationRule::MaximumRate(MaximumRateRule::new(
                config.minimum_creation_interval(),
            )),
            EventCreationRule::PlatformStatus(PlatformStatusRule),
            EventCreationRule::PlatformHealth(PlatformHealthRule::new(
                config.maximum_permissible_unhealthy_duration(),
            )),
        ])
    }

    pub fn new(rules: Vec<EventCreationRule>) -> Self {
        Self { rules }
    }

    /// The status of the first rule forbidding creation, if any.
    pub fn blocking_status(&self, ctx: &RuleContext) -> Option<EventCreationStatus> {
        self.rules
            .iter()
            .find(|rule| !rule.is_event_creation_permitted(ctx))
            .map(EventCreationRule::status)
    }

    pub fn is_event_creation_permitted(&self, ctx: &RuleContext) -> bool {
        self.blocking_status(ctx).is_none()
    }

    pub fn event_was_created(&mut self, now: Timestamp) {
        for rule in &mut self.rules {
            rule.event_was_created(now);
        }
    }

    /// Forget rate state, e.g. after a reconnect.
    pub fn reset(&mut self) {
        for rule in &mut self.rules {
            if let EventCreationRule::MaximumRate(rate) = rule {
                rate.last_creation = None;
            }
        }
    }
}
