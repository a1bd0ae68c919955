//! Driving Ports (API - Inbound)

use shared_types::{PlatformStatus, PlatformStatusAction};

pub trait PlatformStatusApi: Send {
    /// Apply one action. Returns the new status when it changed.
    fn process_action(&mut self, action: PlatformStatusAction) -> Option<PlatformStatus>;

    fn current_status(&self) -> PlatformStatus;
}
