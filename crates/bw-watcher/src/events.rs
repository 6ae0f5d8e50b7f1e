//! Event types for power-supply hardware changes.
//!
//! A [`PowerEvent`] is emitted for every uevent the kernel raises on the
//! `power_supply` subsystem that survives filtering. The monitor loop does
//! not inspect the payload beyond logging; an event's only job is to wake
//! the loop and restart its poll countdown.

use std::time::Instant;

/// The kind of device change a uevent reported.
///
/// Mapped from udev's event type. The monitor loop treats all kinds the
/// same; the distinction exists for logging and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceAction {
    /// A device appeared.
    Add,
    /// A device's properties changed (plug/unplug lands here).
    Change,
    /// A device went away.
    Remove,
    /// A driver was bound to the device.
    Bind,
    /// A driver was unbound from the device.
    Unbind,
    /// Any other or unrecognized action.
    Unknown,
}

impl From<udev::EventType> for DeviceAction {
    fn from(event_type: udev::EventType) -> Self {
        match event_type {
            udev::EventType::Add => Self::Add,
            udev::EventType::Change => Self::Change,
            udev::EventType::Remove => Self::Remove,
            udev::EventType::Bind => Self::Bind,
            udev::EventType::Unbind => Self::Unbind,
            _ => Self::Unknown,
        }
    }
}

/// A power-supply hardware-change event.
///
/// # Examples
///
/// ```
/// use bw_watcher::{DeviceAction, PowerEvent};
///
/// let event = PowerEvent::new("BAT0", DeviceAction::Change);
/// assert_eq!(event.sysname, "BAT0");
/// assert!(event.is_change());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerEvent {
    /// The sysfs name of the device that changed, e.g. `BAT0` or `AC`.
    pub sysname: String,

    /// What happened to the device.
    pub action: DeviceAction,

    /// When this event was received, for latency logging.
    pub timestamp: Instant,
}

impl PowerEvent {
    /// Creates a new event stamped with the current instant.
    #[inline]
    #[must_use]
    pub fn new(sysname: impl Into<String>, action: DeviceAction) -> Self {
        Self {
            sysname: sysname.into(),
            action,
            timestamp: Instant::now(),
        }
    }

    /// Creates an event from a udev monitor event.
    #[must_use]
    pub fn from_udev(event: &udev::Event) -> Self {
        Self::new(
            event.sysname().to_string_lossy().into_owned(),
            DeviceAction::from(event.event_type()),
        )
    }

    /// Returns `true` for property-change events.
    #[inline]
    #[must_use]
    pub fn is_change(&self) -> bool {
        self.action == DeviceAction::Change
    }
}
