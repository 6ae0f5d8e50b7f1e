//! Startup device resolution.
//!
//! This module provides [`resolve`], the one-shot lookup that hands the
//! monitor loop its battery list and optional mains device. Resolution
//! scans the power-supply sysfs class once, classifies entries by their
//! `type` property, and prefers conventional device names. User-supplied
//! overrides bypass the scan entirely.
//!
//! Resolution runs exactly once; there is no dynamic add/remove of
//! batteries while the daemon runs.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

use bw_core::DeviceConfig;

use crate::device::Device;
use crate::error::PowerError;

/// Mains device names tried first, in order, during auto-discovery.
///
/// Kernels and firmware disagree on what to call the AC adapter; these
/// cover the common spellings.
const SUPPLY_NAME_PREFERENCE: &[&str] = &["AC", "ACAD", "ADP0", "ADP1", "AC0"];

/// The `type` property value identifying a battery.
const TYPE_BATTERY: &str = "Battery";

/// The `type` property value identifying a mains supply.
const TYPE_MAINS: &str = "Mains";

/// The devices handed to the monitor loop at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDevices {
    /// Battery device paths, one independent state machine each.
    pub batteries: Vec<Utf8PathBuf>,

    /// The paired mains device, when one was resolved.
    pub supply: Option<Utf8PathBuf>,
}

/// Resolves battery and mains devices per the device configuration.
///
/// Explicit overrides in `config` win over discovery. Without overrides,
/// the sysfs root is scanned once: every `Battery`-typed entry becomes a
/// monitored battery (sorted by name, so `BAT0` leads), and the mains
/// device is picked by [`SUPPLY_NAME_PREFERENCE`], falling back to the
/// alphabetically first `Mains`-typed entry.
///
/// # Errors
///
/// Returns [`PowerError::NoBattery`] when no battery can be resolved; the
/// daemon treats this as fatal at startup.
pub fn resolve(config: &DeviceConfig) -> Result<ResolvedDevices, PowerError> {
    let batteries = if config.batteries.is_empty() {
        discover_batteries(&config.sysfs_root)?
    } else {
        config.batteries.clone()
    };

    if batteries.is_empty() {
        return Err(PowerError::NoBattery(config.sysfs_root.clone()));
    }

    let supply = match &config.supply {
        Some(path) => Some(path.clone()),
        None => discover_supply(&config.sysfs_root),
    };

    debug!(
        batteries = batteries.len(),
        supply = supply.as_ref().map_or("none", |p| p.as_str()),
        "Resolved power-supply devices"
    );

    Ok(ResolvedDevices { batteries, supply })
}

/// Scans the class directory for battery-typed devices.
fn discover_batteries(root: &Utf8Path) -> Result<Vec<Utf8PathBuf>, PowerError> {
    let mut batteries: Vec<Utf8PathBuf> = scan_class(root)?
        .into_iter()
        .filter_map(|(path, device_type)| (device_type == TYPE_BATTERY).then_some(path))
        .collect();
    batteries.sort();
    Ok(batteries)
}

/// Scans the class directory for a mains-typed device, preferring
/// conventional names.
fn discover_supply(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let mut supplies: Vec<Utf8PathBuf> = scan_class(root)
        .ok()?
        .into_iter()
        .filter_map(|(path, device_type)| (device_type == TYPE_MAINS).then_some(path))
        .collect();
    supplies.sort();

    for &preferred in SUPPLY_NAME_PREFERENCE {
        if let Some(found) = supplies
            .iter()
            .find(|path| path.file_name() == Some(preferred))
        {
            return Some(found.clone());
        }
    }
    supplies.into_iter().next()
}

/// Lists `(path, type)` for every readable entry of the class directory.
///
/// Entries whose `type` property cannot be read are logged and skipped;
/// a device yanked mid-scan must not abort discovery of the others.
fn scan_class(root: &Utf8Path) -> Result<Vec<(Utf8PathBuf, String)>, PowerError> {
    let mut entries = Vec::new();

    for entry in root.read_dir_utf8().map_err(PowerError::Io)? {
        let entry = entry.map_err(PowerError::Io)?;
        let path = entry.path().to_owned();

        let device = match Device::open(&path) {
            Ok(device) => device,
            Err(e) => {
                debug!(path = %path, error = %e, "Skipping unreadable class entry");
                continue;
            }
        };

        match device.property_opt("type") {
            Ok(Some(device_type)) => entries.push((path, device_type)),
            Ok(None) => debug!(path = %path, "Class entry has no type property"),
            Err(e) => warn!(path = %path, error = %e, "Failed to classify device"),
        }
    }

    Ok(entries)
}
