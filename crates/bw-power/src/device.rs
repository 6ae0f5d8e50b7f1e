//! Per-pass sysfs device handles.
//!
//! A [`Device`] wraps one directory of the power-supply sysfs class
//! (for example `/sys/class/power_supply/BAT0`). Properties are plain files
//! inside that directory whose contents are short strings.
//!
//! # Lifetime discipline
//!
//! Handles are opened at the start of an evaluation pass and dropped at its
//! end. They are never held across the monitor loop's blocking wait: a
//! hardware-change event (dock removal, battery swap) can invalidate the
//! underlying directory at any time, and re-opening per pass is how the
//! daemon re-resolves fresh state.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::PowerError;

/// A handle onto one power-supply class device, valid for one pass.
///
/// # Examples
///
/// ```no_run
/// use bw_power::Device;
/// use camino::Utf8Path;
///
/// # fn example() -> Result<(), bw_power::PowerError> {
/// let battery = Device::open(Utf8Path::new("/sys/class/power_supply/BAT0"))?;
/// let status = battery.property("status")?;
/// println!("{}: {status}", battery.sysname());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Device {
    /// The device directory.
    path: Utf8PathBuf,

    /// The directory's base name, e.g. `BAT0`.
    sysname: String,
}

impl Device {
    /// Opens a device by its sysfs path.
    ///
    /// "Opening" validates that the directory currently exists; the device
    /// may still vanish mid-pass, which surfaces as a property read error.
    ///
    /// # Errors
    ///
    /// Returns [`PowerError::DeviceNotFound`] if the path is not a
    /// directory (device removed, or never present).
    pub fn open(path: &Utf8Path) -> Result<Self, PowerError> {
        if !path.is_dir() {
            return Err(PowerError::DeviceNotFound(path.to_owned()));
        }

        let sysname = path.file_name().unwrap_or(path.as_str()).to_owned();

        Ok(Self {
            path: path.to_owned(),
            sysname,
        })
    }

    /// Reads a named string property, trimmed of trailing whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`PowerError::MissingProperty`] if the property file does
    /// not exist and [`PowerError::Io`] for any other read failure.
    pub fn property(&self, name: &'static str) -> Result<String, PowerError> {
        match fs::read_to_string(self.path.join(name)) {
            Ok(raw) => Ok(raw.trim().to_owned()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(PowerError::missing_property(&self.sysname, name))
            }
            Err(e) => Err(PowerError::Io(e)),
        }
    }

    /// Reads a named property, mapping a missing file to `None`.
    ///
    /// Used where absence is an expected branch rather than an error, such
    /// as the charge reader's fallback chain.
    ///
    /// # Errors
    ///
    /// Returns [`PowerError::Io`] for read failures other than absence.
    pub fn property_opt(&self, name: &'static str) -> Result<Option<String>, PowerError> {
        match self.property(name) {
            Ok(value) => Ok(Some(value)),
            Err(PowerError::MissingProperty { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Reads a named property and parses it as a non-negative integer.
    ///
    /// Returns `None` if the property is absent. A present but unparseable
    /// value is an [`PowerError::InvalidProperty`] error, which callers
    /// treat exactly like a missing property.
    ///
    /// # Errors
    ///
    /// Returns [`PowerError::InvalidProperty`] on malformed contents and
    /// [`PowerError::Io`] on read failures.
    pub fn property_u64(&self, name: &'static str) -> Result<Option<u64>, PowerError> {
        let Some(raw) = self.property_opt(name)? else {
            return Ok(None);
        };
        raw.parse::<u64>()
            .map(Some)
            .map_err(|_| PowerError::invalid_property(&self.sysname, name, raw))
    }

    /// Returns the device's base name, e.g. `BAT0`.
    #[inline]
    #[must_use]
    pub fn sysname(&self) -> &str {
        &self.sysname
    }

    /// Returns the device's sysfs path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}
