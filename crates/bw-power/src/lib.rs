//! Sysfs power-supply device access for battwatch.
//!
//! This crate is the daemon's only window onto the hardware. It provides:
//!
//! - [`Device`] - a handle onto one entry of the power-supply sysfs class,
//!   opened fresh for each evaluation pass (hardware can disappear between
//!   polls, so handles are never cached across passes)
//! - [`read_charge`] - the charge reader: normalized charge fraction from
//!   charge counters, energy counters, or the capacity percentage
//! - [`is_charging`] - the charging-state detector: mains `online` property
//!   when a supply device is paired, battery `status` otherwise
//! - [`resolve`] - startup auto-discovery of battery and mains devices
//!
//! # Error model
//!
//! Everything that can fail mid-flight (device unplugged, property missing,
//! value malformed) is a recoverable [`PowerError`]: the caller logs it and
//! skips that battery for the current pass. Only
//! [`PowerError::NoBattery`] is fatal, and only at startup.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod charge;
pub mod device;
pub mod discover;
pub mod error;

pub use charge::{is_charging, read_charge};
pub use device::Device;
pub use discover::{resolve, ResolvedDevices};
pub use error::PowerError;
