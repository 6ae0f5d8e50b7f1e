//! Error types for the bw-power crate.
//!
//! This module provides the [`PowerError`] type for device access and
//! resolution failures.

use camino::Utf8PathBuf;

/// Errors that can occur while reading power-supply devices.
///
/// # Error Recovery Strategy
///
/// - **Device not found / missing property / invalid property / no charge
///   source / I/O**: Recoverable - log, skip the affected battery for the
///   current evaluation pass, and let the next poll or hardware event act
///   as the retry. These are expected hot-unplug races.
/// - **No battery** ([`PowerError::NoBattery`]): Fatal - the daemon has
///   nothing to monitor and exits at startup.
#[derive(Debug, thiserror::Error)]
pub enum PowerError {
    /// The device directory could not be opened (removed or never present).
    #[error("power-supply device not found: {0}")]
    DeviceNotFound(Utf8PathBuf),

    /// A required property file is absent on the device.
    #[error("device '{device}' has no '{property}' property")]
    MissingProperty {
        /// The device sysname.
        device: String,
        /// The property file name.
        property: &'static str,
    },

    /// A property file exists but its contents did not parse.
    ///
    /// Treated identically to a missing property by callers.
    #[error("device '{device}' property '{property}' is malformed: '{value}'")]
    InvalidProperty {
        /// The device sysname.
        device: String,
        /// The property file name.
        property: &'static str,
        /// The offending raw value.
        value: String,
    },

    /// None of the charge data sources were present and parseable.
    #[error("no usable charge source on device '{0}'")]
    NoChargeSource(String),

    /// No battery device could be resolved at startup.
    #[error("no battery device found under {0}")]
    NoBattery(Utf8PathBuf),

    /// An I/O error occurred while reading a property.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PowerError {
    /// Creates a new [`PowerError::MissingProperty`] error.
    #[inline]
    pub fn missing_property(device: impl Into<String>, property: &'static str) -> Self {
        Self::MissingProperty {
            device: device.into(),
            property,
        }
    }

    /// Creates a new [`PowerError::InvalidProperty`] error.
    #[inline]
    pub fn invalid_property(
        device: impl Into<String>,
        property: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidProperty {
            device: device.into(),
            property,
            value: value.into(),
        }
    }

    /// Returns `true` if this error only invalidates the current pass.
    ///
    /// Recoverable errors leave battery state untouched; the next scheduled
    /// poll or hardware event serves as the retry.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::NoBattery(_))
    }

    /// Returns `true` if this error should abort startup.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_property_display() {
        let err = PowerError::missing_property("BAT0", "capacity");
        assert!(err.to_string().contains("BAT0"));
        assert!(err.to_string().contains("capacity"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_invalid_property_display() {
        let err = PowerError::invalid_property("BAT0", "charge_now", "banana");
        assert!(err.to_string().contains("banana"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_no_battery_is_fatal() {
        let err = PowerError::NoBattery(Utf8PathBuf::from("/sys/class/power_supply"));
        assert!(err.is_fatal());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_device_not_found_is_recoverable() {
        let err = PowerError::DeviceNotFound(Utf8PathBuf::from("/sys/class/power_supply/AC"));
        assert!(err.is_recoverable());
    }
}
