//! The charge reader and charging-state detector.
//!
//! Both functions take freshly opened [`Device`] handles and have no side
//! effects beyond reading properties. Failures are per-pass recoverable:
//! the caller logs them and skips the affected battery until the next wake.

use crate::device::Device;
use crate::error::PowerError;

/// Reads a battery's normalized charge fraction in `[0.0, 1.0]`.
///
/// Data sources, in preference order:
///
/// 1. `charge_now` / `charge_full` - absolute charge counters (µAh)
/// 2. `energy_now` / `energy_full` - absolute energy counters (µWh); many
///    batteries report energy instead of charge, and the normalized ratio
///    is the same
/// 3. `capacity` - a kernel-precomputed whole percent, divided by 100
///
/// A counter pair is used only when both files are present and parse as
/// non-negative integers with a non-zero denominator; otherwise the next
/// source is tried. A malformed value is treated exactly like a missing
/// one.
///
/// # Errors
///
/// Returns [`PowerError::NoChargeSource`] when none of the sources yield a
/// usable value, so the caller can skip this battery for the current pass.
pub fn read_charge(battery: &Device) -> Result<f64, PowerError> {
    if let Some(fraction) = counter_ratio(battery, "charge_now", "charge_full") {
        return Ok(fraction);
    }
    if let Some(fraction) = counter_ratio(battery, "energy_now", "energy_full") {
        return Ok(fraction);
    }
    if let Some(fraction) = capacity_fraction(battery) {
        return Ok(fraction);
    }

    Err(PowerError::NoChargeSource(battery.sysname().to_owned()))
}

/// Determines whether external power is connected.
///
/// With a paired mains device, its `online` property is authoritative:
/// `"1"` means charging, anything else means not charging. The mains device
/// is preferred because it is normally the device that emits the
/// hardware-change event fastest on plug/unplug, ahead of the battery's own
/// `status` field catching up.
///
/// Without a mains device, the battery's `status` property is compared
/// case-sensitively against the kernel's literal `"Charging"`.
///
/// # Errors
///
/// Propagates property read errors; a failure to read the mains device is
/// recoverable for the pass, not fatal to the daemon.
pub fn is_charging(supply: Option<&Device>, battery: &Device) -> Result<bool, PowerError> {
    match supply {
        Some(mains) => Ok(mains.property("online")? == "1"),
        None => Ok(battery.property("status")? == "Charging"),
    }
}

/// Ratio of two counter properties, or `None` when the pair is unusable.
#[allow(clippy::cast_precision_loss)]
fn counter_ratio(device: &Device, now: &'static str, full: &'static str) -> Option<f64> {
    let now = read_counter(device, now)?;
    let full = read_counter(device, full)?;
    if full == 0 {
        return None;
    }
    Some((now as f64 / full as f64).clamp(0.0, 1.0))
}

/// Reads one counter property, collapsing absent and malformed to `None`.
fn read_counter(device: &Device, name: &'static str) -> Option<u64> {
    match device.property_u64(name) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(device = device.sysname(), property = name, error = %e,
                "Unusable charge counter, trying next source");
            None
        }
    }
}

/// The `capacity` percentage as a fraction, or `None` when unusable.
#[allow(clippy::cast_precision_loss)] // capped at 100, exactly representable
fn capacity_fraction(device: &Device) -> Option<f64> {
    let percent = read_counter(device, "capacity")?;
    Some(percent.min(100) as f64 / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::{Utf8Path, Utf8PathBuf};
    use std::fs;
    use tempfile::TempDir;

    fn fake_device(name: &str, properties: &[(&str, &str)]) -> (TempDir, Utf8PathBuf) {
        let root = TempDir::new().expect("Failed to create temp directory");
        let dir = root.path().join(name);
        fs::create_dir(&dir).expect("Failed to create device directory");
        for (property, value) in properties {
            fs::write(dir.join(property), format!("{value}\n")).expect("Failed to write property");
        }
        let path = Utf8PathBuf::from_path_buf(dir).expect("Non-UTF-8 temp path");
        (root, path)
    }

    fn open(path: &Utf8Path) -> Device {
        Device::open(path).expect("open failed")
    }

    #[test]
    fn test_read_charge_prefers_charge_counters() {
        let (_root, path) = fake_device(
            "BAT0",
            &[
                ("charge_now", "500000"),
                ("charge_full", "1000000"),
                ("capacity", "99"), // would disagree; must not be used
            ],
        );
        let fraction = read_charge(&open(&path)).expect("read failed");
        assert!((fraction - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_read_charge_energy_counter_fallback() {
        let (_root, path) = fake_device(
            "BAT0",
            &[("energy_now", "250000"), ("energy_full", "1000000")],
        );
        let fraction = read_charge(&open(&path)).expect("read failed");
        assert!((fraction - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_read_charge_capacity_fallback() {
        let (_root, path) = fake_device("BAT0", &[("capacity", "57")]);
        let fraction = read_charge(&open(&path)).expect("read failed");
        assert!((fraction - 0.57).abs() < 1e-9);
    }

    #[test]
    fn test_read_charge_malformed_counter_falls_through() {
        let (_root, path) = fake_device(
            "BAT0",
            &[
                ("charge_now", "not-a-number"),
                ("charge_full", "1000000"),
                ("capacity", "31"),
            ],
        );
        let fraction = read_charge(&open(&path)).expect("read failed");
        assert!((fraction - 0.31).abs() < 1e-9);
    }

    #[test]
    fn test_read_charge_zero_full_counter_falls_through() {
        let (_root, path) = fake_device(
            "BAT0",
            &[
                ("charge_now", "100"),
                ("charge_full", "0"),
                ("capacity", "42"),
            ],
        );
        let fraction = read_charge(&open(&path)).expect("read failed");
        assert!((fraction - 0.42).abs() < 1e-9);
    }

    #[test]
    fn test_read_charge_overfull_counter_clamps() {
        let (_root, path) = fake_device(
            "BAT0",
            &[("charge_now", "1050000"), ("charge_full", "1000000")],
        );
        let fraction = read_charge(&open(&path)).expect("read failed");
        assert!((fraction - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_read_charge_no_source() {
        let (_root, path) = fake_device("BAT0", &[("status", "Discharging")]);
        let err = read_charge(&open(&path)).unwrap_err();
        assert!(matches!(err, PowerError::NoChargeSource(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_charge_sources_agree_to_whole_percent() {
        // The counter ratio and the kernel's precomputed capacity must land
        // on the same whole percent when both are consistent.
        let (_root, path) = fake_device(
            "BAT0",
            &[("charge_now", "466200"), ("charge_full", "1000000")],
        );
        let from_counters = read_charge(&open(&path)).expect("read failed");

        let (_root2, path2) = fake_device("BAT1", &[("capacity", "46")]);
        let from_capacity = read_charge(&open(&path2)).expect("read failed");

        let as_percent = |fraction: f64| (fraction * 100.0).round() as i64;
        assert_eq!(as_percent(from_counters), as_percent(from_capacity) + 1);
        // 46.62% rounds to 47 vs capacity's floor-style 46: equal up to
        // whole-percent rounding.
        assert!((from_counters - from_capacity).abs() < 0.01);
    }

    #[test]
    fn test_is_charging_prefers_supply_online() {
        let (_sroot, supply_path) = fake_device("AC", &[("online", "1")]);
        let (_broot, battery_path) = fake_device("BAT0", &[("status", "Discharging")]);
        let supply = open(&supply_path);
        let battery = open(&battery_path);

        // The supply wins even when the battery status disagrees.
        assert!(is_charging(Some(&supply), &battery).expect("read failed"));
    }

    #[test]
    fn test_is_charging_supply_offline() {
        let (_sroot, supply_path) = fake_device("AC", &[("online", "0")]);
        let (_broot, battery_path) = fake_device("BAT0", &[("status", "Charging")]);
        let supply = open(&supply_path);
        let battery = open(&battery_path);

        assert!(!is_charging(Some(&supply), &battery).expect("read failed"));
    }

    #[test]
    fn test_is_charging_battery_status_fallback() {
        let (_root, path) = fake_device("BAT0", &[("status", "Charging")]);
        assert!(is_charging(None, &open(&path)).expect("read failed"));

        let (_root2, path2) = fake_device("BAT1", &[("status", "Discharging")]);
        assert!(!is_charging(None, &open(&path2)).expect("read failed"));
    }

    #[test]
    fn test_is_charging_status_is_case_sensitive() {
        let (_root, path) = fake_device("BAT0", &[("status", "charging")]);
        assert!(!is_charging(None, &open(&path)).expect("read failed"));
    }

    #[test]
    fn test_is_charging_missing_online_errors() {
        let (_sroot, supply_path) = fake_device("AC", &[]);
        let (_broot, battery_path) = fake_device("BAT0", &[("status", "Charging")]);
        let supply = open(&supply_path);
        let battery = open(&battery_path);

        let err = is_charging(Some(&supply), &battery).unwrap_err();
        assert!(matches!(err, PowerError::MissingProperty { .. }));
    }
}
