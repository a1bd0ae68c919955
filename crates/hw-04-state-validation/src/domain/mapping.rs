//! ISS to platform status consequence.

use shared_types::{IssNotification, IssType, PlatformStatusAction};

/// Only disagreements involving this node's own state halt the platform.
pub fn map_iss_to_status_action(notification: &IssNotification) -> Option<PlatformStatusAction> {
    match notification.iss_type {
        IssType::SelfIss | IssType::CatastrophicIss => Some(PlatformStatusAction::CatastrophicFailure),
        IssType::OtherIss => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping() {
        assert_eq!(
            map_iss_to_status_action(&IssNotification::new(1, IssType::SelfIss)),
            Some(PlatformStatusAction::CatastrophicFailure)
        );
        assert_eq!(
            map_iss_to_status_action(&IssNotification::new(1, IssType::CatastrophicIss)),
            Some(PlatformStatusAction::CatastrophicFailure)
        );
        assert_eq!(
            map_iss_to_status_action(&IssNotification::new(1, IssType::OtherIss)),
            None
        );
    }
}
