//! Rendered notification content.
//!
//! An [`AlertMessage`] is the fully rendered content for one notification:
//! summary, body, icon name, and urgency. Rendering happens in the daemon
//! right before the sink call, with the charge percent already rounded up
//! to a whole percent by the snapshot.

use bw_core::AlertTier;
use notify_rust::Urgency;

/// The app name attached to every notification.
pub const APP_NAME: &str = "battwatch";

/// Freedesktop icon name for low-tier alerts.
const ICON_LOW: &str = "battery-low";

/// Freedesktop icon name for critical-tier alerts.
const ICON_CRITICAL: &str = "battery-caution";

/// Rendered content for one desktop notification.
///
/// # Examples
///
/// ```
/// use bw_notify::AlertMessage;
///
/// let message = AlertMessage::low("BAT0", 14);
/// assert_eq!(message.summary, "Battery low");
/// assert!(message.body.contains("14%"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    /// One-line notification title.
    pub summary: String,

    /// Notification body text.
    pub body: String,

    /// Freedesktop icon name.
    pub icon: &'static str,

    /// Urgency hint passed to the notification daemon.
    pub urgency: Urgency,
}

impl AlertMessage {
    /// Renders the low-tier message for a battery at the given percent.
    #[must_use]
    pub fn low(battery: &str, percent: u8) -> Self {
        Self {
            summary: "Battery low".to_owned(),
            body: format!("Battery {battery} is at {percent}%. Connect power soon."),
            icon: ICON_LOW,
            urgency: Urgency::Normal,
        }
    }

    /// Renders the critical-tier message for a battery at the given percent.
    #[must_use]
    pub fn critical(battery: &str, percent: u8) -> Self {
        Self {
            summary: "Battery critically low".to_owned(),
            body: format!("Battery {battery} is at {percent}%. Connect power now."),
            icon: ICON_CRITICAL,
            urgency: Urgency::Critical,
        }
    }

    /// Renders the message for an alert tier, or `None` for
    /// [`AlertTier::Normal`] (which never surfaces a notification).
    #[must_use]
    pub fn for_tier(tier: AlertTier, battery: &str, percent: u8) -> Option<Self> {
        match tier {
            AlertTier::Normal => None,
            AlertTier::Low => Some(Self::low(battery, percent)),
            AlertTier::Critical => Some(Self::critical(battery, percent)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_message_rendering() {
        let message = AlertMessage::low("BAT0", 14);
        insta::assert_snapshot!(message.summary, @"Battery low");
        insta::assert_snapshot!(message.body, @"Battery BAT0 is at 14%. Connect power soon.");
        assert_eq!(message.icon, "battery-low");
        assert_eq!(message.urgency, Urgency::Normal);
    }

    #[test]
    fn test_critical_message_rendering() {
        let message = AlertMessage::critical("BAT1", 3);
        insta::assert_snapshot!(message.summary, @"Battery critically low");
        insta::assert_snapshot!(message.body, @"Battery BAT1 is at 3%. Connect power now.");
        assert_eq!(message.icon, "battery-caution");
        assert_eq!(message.urgency, Urgency::Critical);
    }

    #[test]
    fn test_for_tier_normal_is_none() {
        assert!(AlertMessage::for_tier(AlertTier::Normal, "BAT0", 50).is_none());
    }

    #[test]
    fn test_for_tier_maps_alert_tiers() {
        let low = AlertMessage::for_tier(AlertTier::Low, "BAT0", 14).expect("low message");
        assert_eq!(low.urgency, Urgency::Normal);

        let critical =
            AlertMessage::for_tier(AlertTier::Critical, "BAT0", 3).expect("critical message");
        assert_eq!(critical.urgency, Urgency::Critical);
    }
}
