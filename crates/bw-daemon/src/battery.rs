//! Per-battery monitoring state.
//!
//! A [`Battery`] pairs one battery device with its latches and its
//! notification sink. It lives for the process's lifetime; device handles
//! do not. Every evaluation pass opens the devices fresh, reads a
//! [`ChargeSnapshot`], runs the transition function, and applies the
//! decision to the sink.
//!
//! Failure isolation: a read error abandons this battery's evaluation for
//! the current pass only. Latches and the live notification are left
//! exactly as they were, and the next wake retries naturally.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

use bw_core::{ChargeSnapshot, MonitorConfig};
use bw_notify::{AlertMessage, Notifier};
use bw_power::{is_charging, read_charge, Device, PowerError};

use crate::state::{decide, Decision, ShownLatches};

/// One monitored battery and its notification state.
#[derive(Debug)]
pub struct Battery<N: Notifier> {
    /// Display name, the device's sysname (e.g. `BAT0`).
    name: String,

    /// The battery device path, opened fresh each pass.
    battery_path: Utf8PathBuf,

    /// The paired mains device path. Absent means "infer charging state
    /// from the battery's own status field".
    supply_path: Option<Utf8PathBuf>,

    /// Which tiers have been surfaced this discharge cycle.
    latches: ShownLatches,

    /// The battery's notification sink, owned exclusively.
    notifier: N,
}

impl<N: Notifier> Battery<N> {
    /// Creates the monitoring record for one battery device.
    #[must_use]
    pub fn new(battery_path: Utf8PathBuf, supply_path: Option<Utf8PathBuf>, notifier: N) -> Self {
        let name = battery_path
            .file_name()
            .unwrap_or(battery_path.as_str())
            .to_owned();
        Self {
            name,
            battery_path,
            supply_path,
            latches: ShownLatches::cleared(),
            notifier,
        }
    }

    /// Returns the battery's display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the battery device path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.battery_path
    }

    /// Runs one evaluation for this battery.
    ///
    /// Read failures are logged and skip the evaluation; they never
    /// propagate, so one battery's hot-unplug race cannot affect the
    /// others in the same pass.
    pub fn evaluate(&mut self, config: &MonitorConfig) {
        let snapshot = match self.read_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(battery = %self.name, error = %e, "Skipping battery for this pass");
                return;
            }
        };

        self.apply(snapshot, config);
    }

    /// Reads a fresh snapshot, acquiring and releasing device handles
    /// within this call.
    fn read_snapshot(&self) -> Result<ChargeSnapshot, PowerError> {
        let battery = Device::open(&self.battery_path)?;
        let fraction = read_charge(&battery)?;

        let charging = match &self.supply_path {
            Some(path) => {
                let supply = Device::open(path)?;
                is_charging(Some(&supply), &battery)?
            }
            None => is_charging(None, &battery)?,
        };

        Ok(ChargeSnapshot::new(fraction, charging))
    }

    /// Applies the transition function's decision to the sink and latches.
    fn apply(&mut self, snapshot: ChargeSnapshot, config: &MonitorConfig) {
        match decide(self.latches, snapshot, config) {
            Decision::ClearAlerts => {
                if self.latches != ShownLatches::cleared() {
                    debug!(battery = %self.name, "Charging; clearing alert state");
                }
                self.latches = ShownLatches::cleared();
                self.notifier.close();
            }
            Decision::Alert { tier, force } => {
                let percent = snapshot.percent_ceil();
                let Some(message) = AlertMessage::for_tier(tier, &self.name, percent) else {
                    return;
                };
                match self.notifier.show(&message, force) {
                    Ok(()) => self.latches.mark_shown(tier),
                    Err(e) => {
                        // Latch stays unset; the next pass retries the
                        // first-crossing display.
                        warn!(battery = %self.name, error = %e, "Failed to show notification");
                    }
                }
            }
            Decision::Keep => {}
        }
    }

    /// Closes the live notification, if any. Used at daemon shutdown.
    pub fn close_notification(&mut self) {
        self.notifier.close();
    }

    /// Returns the current latches. Exposed for tests and logging.
    #[inline]
    #[must_use]
    pub fn latches(&self) -> ShownLatches {
        self.latches
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{MockNotifier, SinkCall};
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _root: TempDir,
        battery: Battery<MockNotifier>,
        sink: MockNotifier,
        battery_dir: Utf8PathBuf,
        supply_dir: Utf8PathBuf,
    }

    /// Builds a fake sysfs battery (capacity + status) and mains (online)
    /// pair, wired into a Battery with a recording sink.
    fn fixture(capacity: u32, online: bool) -> Fixture {
        let root = TempDir::new().expect("Failed to create temp directory");
        let base = Utf8PathBuf::from_path_buf(root.path().to_owned()).expect("Non-UTF-8 path");

        let battery_dir = base.join("BAT0");
        fs::create_dir(&battery_dir).expect("Failed to create battery dir");
        fs::write(battery_dir.join("capacity"), format!("{capacity}\n"))
            .expect("Failed to write capacity");
        fs::write(battery_dir.join("status"), "Discharging\n").expect("Failed to write status");

        let supply_dir = base.join("AC");
        fs::create_dir(&supply_dir).expect("Failed to create supply dir");
        fs::write(supply_dir.join("online"), if online { "1\n" } else { "0\n" })
            .expect("Failed to write online");

        let sink = MockNotifier::new();
        let battery = Battery::new(
            battery_dir.clone(),
            Some(supply_dir.clone()),
            sink.clone(),
        );

        Fixture {
            _root: root,
            battery,
            sink,
            battery_dir,
            supply_dir,
        }
    }

    fn config() -> MonitorConfig {
        MonitorConfig {
            low_threshold: 0.15,
            critical_threshold: 0.05,
            ..MonitorConfig::default()
        }
    }

    fn set_capacity(fixture: &Fixture, capacity: u32) {
        fs::write(fixture.battery_dir.join("capacity"), format!("{capacity}\n"))
            .expect("Failed to write capacity");
    }

    fn set_online(fixture: &Fixture, online: bool) {
        fs::write(
            fixture.supply_dir.join("online"),
            if online { "1\n" } else { "0\n" },
        )
        .expect("Failed to write online");
    }

    #[test]
    fn test_fresh_critical_crossing_forces_show() {
        // charge=3%, not charging, fresh battery: critical fires forced,
        // low latch untouched.
        let mut fixture = fixture(3, false);
        fixture.battery.evaluate(&config());

        let shows = fixture.sink.shows();
        assert_eq!(shows.len(), 1);
        assert!(shows[0].0.contains("3%"));
        assert!(shows[0].1, "first crossing must force-show");
        assert!(fixture.battery.latches().critical);
        assert!(!fixture.battery.latches().low);
    }

    #[test]
    fn test_repeated_critical_passes_update_without_force() {
        let mut fixture = fixture(3, false);
        fixture.battery.evaluate(&config());
        fixture.battery.evaluate(&config());

        let shows = fixture.sink.shows();
        assert_eq!(shows.len(), 2);
        assert!(shows[0].1);
        assert!(!shows[1].1, "already-shown tier must not force");
    }

    #[test]
    fn test_charging_resets_latches_and_closes() {
        let mut fixture = fixture(3, false);
        fixture.battery.evaluate(&config());
        assert!(fixture.battery.latches().critical);

        set_online(&fixture, true);
        fixture.battery.evaluate(&config());

        assert_eq!(fixture.battery.latches(), ShownLatches::cleared());
        assert_eq!(fixture.sink.close_count(), 1);
    }

    #[test]
    fn test_normal_band_takes_no_action() {
        let mut fixture = fixture(10, false);
        fixture.battery.evaluate(&config());
        assert!(fixture.battery.latches().low);
        let calls_before = fixture.sink.calls().len();

        // Drifts above both thresholds without charging: nothing happens,
        // latches keep their values.
        set_capacity(&fixture, 20);
        fixture.battery.evaluate(&config());

        assert_eq!(fixture.sink.calls().len(), calls_before);
        assert!(fixture.battery.latches().low);
    }

    #[test]
    fn test_full_discharge_cycle_realerts_after_charge() {
        let mut fixture = fixture(10, false);
        fixture.battery.evaluate(&config()); // low, forced

        set_online(&fixture, true);
        fixture.battery.evaluate(&config()); // reset

        set_online(&fixture, false);
        fixture.battery.evaluate(&config()); // low again, forced again

        let forces: Vec<bool> = fixture.sink.shows().into_iter().map(|(_, f)| f).collect();
        assert_eq!(forces, vec![true, true]);
    }

    #[test]
    fn test_critical_supersedes_low_in_one_pass() {
        let mut fixture = fixture(3, false);
        fixture.battery.evaluate(&config());

        // A single pass in the critical band renders exactly one
        // notification, the critical one.
        let calls = fixture.sink.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            SinkCall::Show(message, _) => assert!(message.summary.contains("critically")),
            SinkCall::Close => panic!("unexpected close"),
        }
    }

    #[test]
    fn test_read_failure_skips_pass_and_preserves_state() {
        let mut fixture = fixture(10, false);
        fixture.battery.evaluate(&config());
        let latches_before = fixture.battery.latches();
        let calls_before = fixture.sink.calls().len();

        // Yank the charge sources: the pass must skip, not crash, and
        // must leave latches and sink untouched.
        fs::remove_file(fixture.battery_dir.join("capacity")).expect("Failed to remove capacity");
        fixture.battery.evaluate(&config());

        assert_eq!(fixture.battery.latches(), latches_before);
        assert_eq!(fixture.sink.calls().len(), calls_before);
    }

    #[test]
    fn test_supply_open_failure_skips_pass() {
        let mut fixture = fixture(10, false);
        fs::remove_dir_all(&fixture.supply_dir).expect("Failed to remove supply");

        fixture.battery.evaluate(&config());
        assert!(fixture.sink.calls().is_empty());
        assert_eq!(fixture.battery.latches(), ShownLatches::cleared());
    }

    #[test]
    fn test_battery_status_fallback_without_supply() {
        let root = TempDir::new().expect("Failed to create temp directory");
        let base = Utf8PathBuf::from_path_buf(root.path().to_owned()).expect("Non-UTF-8 path");
        let battery_dir = base.join("BAT0");
        fs::create_dir(&battery_dir).expect("Failed to create battery dir");
        fs::write(battery_dir.join("capacity"), "4\n").expect("Failed to write capacity");
        fs::write(battery_dir.join("status"), "Charging\n").expect("Failed to write status");

        let sink = MockNotifier::new();
        let mut battery = Battery::new(battery_dir, None, sink.clone());
        battery.evaluate(&config());

        // Charging via the status fallback: no alert, one (idempotent) close.
        assert_eq!(sink.shows().len(), 0);
        assert_eq!(sink.close_count(), 1);
    }

    #[test]
    fn test_battery_name_from_path() {
        let fixture = fixture(50, false);
        assert_eq!(fixture.battery.name(), "BAT0");
    }
}
