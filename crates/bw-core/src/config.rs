//! Configuration structures for the battwatch daemon.
//!
//! This module provides configuration types for all components of the daemon:
//!
//! - [`MonitorConfig`] - Monitor loop settings (poll interval, thresholds,
//!   notification expiry)
//! - [`DeviceConfig`] - Device resolution settings (sysfs root, overrides)
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`] with values suitable for a
//! typical laptop, and validate themselves via [`MonitorConfig::validate`].

use std::time::Duration;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default sysfs class directory containing power-supply devices.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/power_supply";

/// Configuration for the monitor loop.
///
/// Controls how often batteries are polled, which charge fractions trigger
/// the low and critical alert tiers, and how long notifications stay on
/// screen. All values are immutable for the daemon's lifetime.
///
/// # Examples
///
/// ```
/// use bw_core::MonitorConfig;
///
/// let config = MonitorConfig::default();
/// assert_eq!(config.poll_interval_secs, 60);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between safety-net evaluation passes.
    ///
    /// Hardware-change events trigger passes earlier; this is the upper
    /// bound on how stale the daemon's view of the battery can get.
    pub poll_interval_secs: u64,

    /// Charge fraction at or below which the low tier fires (0.0 to 1.0).
    pub low_threshold: f64,

    /// Charge fraction at or below which the critical tier fires (0.0 to 1.0).
    ///
    /// Expected to be at or below `low_threshold` for sane behavior, but
    /// not enforced.
    pub critical_threshold: f64,

    /// Notification expiry in milliseconds. `0` means never expire.
    pub notify_timeout_ms: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            low_threshold: 0.15,
            critical_threshold: 0.05,
            notify_timeout_ms: 0,
        }
    }
}

impl MonitorConfig {
    /// Returns the poll interval as a [`Duration`].
    #[inline]
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if the poll interval is zero
    /// or a threshold lies outside `[0.0, 1.0]`. A critical threshold above
    /// the low threshold is deliberately NOT an error; the state machine
    /// still behaves deterministically (critical wins).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::invalid_option(
                "poll_interval_secs",
                "must be positive",
            ));
        }
        for (option, value) in [
            ("low_threshold", self.low_threshold),
            ("critical_threshold", self.critical_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(ConfigError::invalid_option(
                    option,
                    "must be a fraction between 0.0 and 1.0",
                ));
            }
        }
        Ok(())
    }
}

/// Configuration for startup device resolution.
///
/// Device resolution happens once at startup; the resulting battery list is
/// static for the daemon's lifetime.
///
/// # Examples
///
/// ```
/// use bw_core::DeviceConfig;
///
/// let config = DeviceConfig::default();
/// assert_eq!(config.sysfs_root.as_str(), "/sys/class/power_supply");
/// assert!(config.batteries.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// The sysfs class directory to scan for power-supply devices.
    ///
    /// Overridable mainly for tests and containers.
    pub sysfs_root: Utf8PathBuf,

    /// Explicit battery device paths. Empty means auto-discover.
    pub batteries: Vec<Utf8PathBuf>,

    /// Explicit power-supply (mains) device path.
    ///
    /// `None` with auto-discovery enabled picks a conventionally named
    /// mains device if one exists; charging state falls back to the
    /// battery's own `status` property when no supply is resolved.
    pub supply: Option<Utf8PathBuf>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            sysfs_root: Utf8PathBuf::from(DEFAULT_SYSFS_ROOT),
            batteries: Vec::new(),
            supply: None,
        }
    }
}

/// Root configuration for the battwatch daemon.
///
/// # Examples
///
/// ```
/// use bw_core::Config;
///
/// let config = Config::default();
/// let json = serde_json::to_string_pretty(&config).unwrap();
/// assert!(json.contains("poll_interval_secs"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Monitor loop configuration.
    pub monitor: MonitorConfig,

    /// Device resolution configuration.
    pub devices: DeviceConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_config_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.poll_interval_secs, 60);
        assert!((config.low_threshold - 0.15).abs() < f64::EPSILON);
        assert!((config.critical_threshold - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.notify_timeout_ms, 0);
    }

    #[test]
    fn test_monitor_config_poll_interval() {
        let config = MonitorConfig {
            poll_interval_secs: 5,
            ..MonitorConfig::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_monitor_config_validate_default() {
        assert!(MonitorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_monitor_config_validate_zero_interval() {
        let config = MonitorConfig {
            poll_interval_secs: 0,
            ..MonitorConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("poll_interval_secs"));
    }

    #[test]
    fn test_monitor_config_validate_threshold_out_of_range() {
        let config = MonitorConfig {
            low_threshold: 1.5,
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MonitorConfig {
            critical_threshold: -0.1,
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_monitor_config_validate_inverted_thresholds_allowed() {
        // critical > low is odd but explicitly not rejected
        let config = MonitorConfig {
            low_threshold: 0.05,
            critical_threshold: 0.15,
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_device_config_defaults() {
        let config = DeviceConfig::default();
        assert_eq!(config.sysfs_root.as_str(), DEFAULT_SYSFS_ROOT);
        assert!(config.batteries.is_empty());
        assert!(config.supply.is_none());
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let json = r#"{"monitor": {"poll_interval_secs": 10}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.monitor.poll_interval_secs, 10);
        // Other fields should have defaults
        assert!((config.monitor.low_threshold - 0.15).abs() < f64::EPSILON);
        assert_eq!(config.devices.sysfs_root.as_str(), DEFAULT_SYSFS_ROOT);
    }
}
