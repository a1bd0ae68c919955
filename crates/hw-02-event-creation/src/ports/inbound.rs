//! Driving Ports (API - Inbound)

use std::time::Duration;

use shared_types::{EventWindow, PlatformEvent, PlatformStatus};

use crate::domain::EventCreationStatus;

/// Event creation as seen by the runtime stage that owns it.
pub trait EventCreationApi: Send {
    /// Track a received event. Future events are buffered, ancient ones dropped.
    fn register_event(&mut self, event: PlatformEvent);

    fn set_event_window(&mut self, window: EventWindow);

    /// The window in force, advertised to peers when syncing.
    fn current_event_window(&self) -> EventWindow;

    /// A signed self event, or `None` when creation is forbidden or no legal
    /// parent exists.
    fn maybe_create_event(&mut self) -> Option<PlatformEvent>;

    fn update_platform_status(&mut self, status: PlatformStatus);

    /// A zero duration signals recovery.
    fn report_unhealthy_duration(&mut self, duration: Duration);

    fn clear(&mut self);

    /// What the last creation attempt ran into.
    fn status(&self) -> EventCreationStatus;
}
