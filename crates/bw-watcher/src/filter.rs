//! Event filtering for the watcher thread.
//!
//! The udev monitor is already scoped to the `power_supply` subsystem at
//! the socket level; filters narrow further by device, and they run on the
//! watcher thread so discarded events never cross the channel.
//!
//! # Examples
//!
//! ```
//! use bw_watcher::{AcceptAllFilter, DeviceAction, EventFilter, PowerEvent, SysnameFilter};
//!
//! let event = PowerEvent::new("BAT0", DeviceAction::Change);
//!
//! assert!(AcceptAllFilter.should_forward(&event));
//!
//! let filter = SysnameFilter::new(["BAT0", "AC"]);
//! assert!(filter.should_forward(&event));
//! assert!(!filter.should_forward(&PowerEvent::new("hidpp_battery_3", DeviceAction::Change)));
//! ```

use crate::events::PowerEvent;

/// A predicate deciding which power events reach the monitor loop.
///
/// # Thread Safety
///
/// Filters must be [`Send`] and `'static` because they are moved into the
/// blocking watcher thread.
pub trait EventFilter: Send + 'static {
    /// Returns `true` if the event should be sent to the channel.
    fn should_forward(&self, event: &PowerEvent) -> bool;
}

/// A filter that forwards every event.
///
/// The default for the daemon: any power-supply change is a valid wake
/// signal, and the loop re-reads all state anyway.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllFilter;

impl EventFilter for AcceptAllFilter {
    #[inline]
    fn should_forward(&self, _event: &PowerEvent) -> bool {
        true
    }
}

/// A filter that forwards events only for named devices.
///
/// Useful on machines with chatty peripheral batteries (wireless mice,
/// headsets) whose charge reports would otherwise wake the loop.
#[derive(Debug, Clone, Default)]
pub struct SysnameFilter {
    names: Vec<String>,
}

impl SysnameFilter {
    /// Creates a filter forwarding only the given sysnames.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl EventFilter for SysnameFilter {
    #[inline]
    fn should_forward(&self, event: &PowerEvent) -> bool {
        self.names.iter().any(|name| name == &event.sysname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DeviceAction;

    #[test]
    fn test_accept_all_filter() {
        let filter = AcceptAllFilter;
        assert!(filter.should_forward(&PowerEvent::new("BAT0", DeviceAction::Change)));
        assert!(filter.should_forward(&PowerEvent::new("anything", DeviceAction::Remove)));
    }

    #[test]
    fn test_sysname_filter_forwards_named_devices() {
        let filter = SysnameFilter::new(["BAT0", "AC"]);
        assert!(filter.should_forward(&PowerEvent::new("BAT0", DeviceAction::Change)));
        assert!(filter.should_forward(&PowerEvent::new("AC", DeviceAction::Change)));
    }

    #[test]
    fn test_sysname_filter_drops_other_devices() {
        let filter = SysnameFilter::new(["BAT0"]);
        assert!(!filter.should_forward(&PowerEvent::new("BAT1", DeviceAction::Change)));
        assert!(!filter.should_forward(&PowerEvent::new("hidpp_battery_0", DeviceAction::Add)));
    }

    #[test]
    fn test_sysname_filter_empty_drops_everything() {
        let filter = SysnameFilter::default();
        assert!(!filter.should_forward(&PowerEvent::new("BAT0", DeviceAction::Change)));
    }
}
