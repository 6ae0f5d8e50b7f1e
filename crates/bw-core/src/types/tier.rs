//! Notification severity tiers.
//!
//! This module provides the [`AlertTier`] enum describing the current
//! notification severity class for a battery.

use serde::{Deserialize, Serialize};

/// The notification severity class for a battery.
///
/// A battery is [`Normal`](Self::Normal) while its charge sits above the
/// low threshold, [`Low`](Self::Low) at or below it, and
/// [`Critical`](Self::Critical) at or below the critical threshold. When
/// both thresholds are satisfied, critical wins.
///
/// # Examples
///
/// ```
/// use bw_core::AlertTier;
///
/// assert!(AlertTier::Critical.is_alert());
/// assert!(!AlertTier::Normal.is_alert());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertTier {
    /// Charge is above both thresholds. No notification action.
    #[default]
    Normal,

    /// Charge is at or below the low threshold (but above critical).
    Low,

    /// Charge is at or below the critical threshold.
    Critical,
}

impl AlertTier {
    /// Returns `true` if this tier surfaces a notification.
    ///
    /// # Examples
    ///
    /// ```
    /// use bw_core::AlertTier;
    ///
    /// assert!(AlertTier::Low.is_alert());
    /// assert!(AlertTier::Critical.is_alert());
    /// assert!(!AlertTier::Normal.is_alert());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_alert(self) -> bool {
        matches!(self, Self::Low | Self::Critical)
    }

    /// Returns a human-readable label for this tier.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Low => "Low",
            Self::Critical => "Critical",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_tier_is_alert() {
        assert!(!AlertTier::Normal.is_alert());
        assert!(AlertTier::Low.is_alert());
        assert!(AlertTier::Critical.is_alert());
    }

    #[test]
    fn test_alert_tier_labels() {
        assert_eq!(AlertTier::Normal.label(), "Normal");
        assert_eq!(AlertTier::Low.label(), "Low");
        assert_eq!(AlertTier::Critical.label(), "Critical");
    }

    #[test]
    fn test_alert_tier_default() {
        assert_eq!(AlertTier::default(), AlertTier::Normal);
    }

    #[test]
    fn test_alert_tier_serialization() {
        assert_eq!(
            serde_json::to_string(&AlertTier::Normal).unwrap(),
            r#""normal""#
        );
        assert_eq!(serde_json::to_string(&AlertTier::Low).unwrap(), r#""low""#);
        assert_eq!(
            serde_json::to_string(&AlertTier::Critical).unwrap(),
            r#""critical""#
        );
    }

    #[test]
    fn test_alert_tier_deserialization() {
        let tier: AlertTier = serde_json::from_str(r#""critical""#).unwrap();
        assert_eq!(tier, AlertTier::Critical);
    }
}
