//! The event multiplexer and monitor loop.
//!
//! The loop is the daemon's spine: a single task that runs one evaluation
//! pass over all batteries, then blocks on first-ready of the hardware
//! event channel and the poll interval.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │ loop:                                                  │
//! │   evaluate all batteries (sequential, one at a time)   │
//! │   select! {                                            │
//! │     cancelled        => close notifications, return    │
//! │     hardware event   => restart poll countdown         │
//! │     interval elapsed => (fall through)                 │
//! │   }                                                    │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Ordering guarantee: evaluation passes are strictly sequential. The loop
//! is a single task and the select happens between passes, never during
//! one, which is what makes the per-battery latch logic safe without
//! locks.

use smallvec::SmallVec;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use bw_core::MonitorConfig;
use bw_notify::Notifier;
use bw_watcher::PowerEvent;

use crate::battery::Battery;
use crate::error::DaemonError;

/// The monitor loop over a static list of batteries.
///
/// Most machines have one battery, a few have two; the list is inline up
/// to that and lives for the daemon's lifetime.
#[derive(Debug)]
pub struct Monitor<N: Notifier> {
    /// The batteries, each an independent state machine.
    batteries: SmallVec<[Battery<N>; 2]>,

    /// Immutable monitor configuration.
    config: MonitorConfig,
}

impl<N: Notifier> Monitor<N> {
    /// Creates a monitor over the given batteries.
    ///
    /// # Errors
    ///
    /// Returns [`DaemonError::NoBatteries`] when the list is empty.
    pub fn new(
        config: MonitorConfig,
        batteries: impl IntoIterator<Item = Battery<N>>,
    ) -> Result<Self, DaemonError> {
        let batteries: SmallVec<[Battery<N>; 2]> = batteries.into_iter().collect();
        if batteries.is_empty() {
            return Err(DaemonError::NoBatteries);
        }
        Ok(Self { batteries, config })
    }

    /// Returns the monitored battery count.
    #[inline]
    #[must_use]
    pub fn battery_count(&self) -> usize {
        self.batteries.len()
    }

    /// Runs the monitor loop until cancellation.
    ///
    /// The first evaluation pass runs immediately, so a user with an
    /// already-low battery is not kept waiting a full poll interval for
    /// the first notification.
    ///
    /// On a hardware event the poll countdown restarts to a full interval
    /// before the re-evaluation, so bursts of uevents do not also cause
    /// redundant near-simultaneous polls.
    ///
    /// On cancellation, live notifications are closed before returning.
    ///
    /// # Errors
    ///
    /// Returns [`DaemonError::EventChannelClosed`] if the watcher task
    /// dies while the loop is running.
    pub async fn run(
        &mut self,
        events: &mut mpsc::Receiver<PowerEvent>,
        cancel: &CancellationToken,
    ) -> Result<(), DaemonError> {
        let period = self.config.poll_interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            batteries = self.batteries.len(),
            poll_interval_secs = self.config.poll_interval_secs,
            "Monitor loop started"
        );

        loop {
            self.evaluate_all();

            tokio::select! {
                () = cancel.cancelled() => {
                    info!("Monitor loop cancelled");
                    break;
                }

                event = events.recv() => {
                    match event {
                        Some(event) => {
                            debug!(
                                sysname = %event.sysname,
                                action = ?event.action,
                                "Hardware event; restarting poll countdown"
                            );
                            ticker.reset();
                        }
                        None => return Err(DaemonError::EventChannelClosed),
                    }
                }

                _ = ticker.tick() => {
                    trace!("Poll interval elapsed");
                }
            }
        }

        for battery in &mut self.batteries {
            battery.close_notification();
        }

        Ok(())
    }

    /// Runs one evaluation pass over all batteries, in order.
    ///
    /// Each battery isolates its own failures, so the pass always visits
    /// every battery.
    fn evaluate_all(&mut self) {
        for battery in &mut self.batteries {
            battery.evaluate(&self.config);
        }
    }
}
