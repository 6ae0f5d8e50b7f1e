//! The per-battery threshold state machine.
//!
//! The machine is split into a pure transition function, [`decide`], and
//! the [`Battery`](crate::battery::Battery) record that applies its
//! decisions. Keeping the transition pure makes the latch rules directly
//! testable without devices or a notification service.
//!
//! # States
//!
//! The state per battery is the pair of latches in [`ShownLatches`]
//! combined with the charging boolean of the current snapshot: Normal,
//! LowAlerted, CriticalAlerted, Charging. The latches are independent by
//! design: a critical alert does not touch the low latch, so a battery
//! drifting back up into the low band after a critical alert stays quiet
//! until a charge cycle resets everything.

use bw_core::{AlertTier, ChargeSnapshot, MonitorConfig};

/// Which alert tiers have been surfaced since the last charging reset.
///
/// Both latches are forced back to `false` by the sole reset event:
/// observing the battery charging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShownLatches {
    /// The low tier's notification has been shown this discharge cycle.
    pub low: bool,

    /// The critical tier's notification has been shown this discharge cycle.
    pub critical: bool,
}

impl ShownLatches {
    /// Returns latches with both tiers unshown.
    #[inline]
    #[must_use]
    pub const fn cleared() -> Self {
        Self {
            low: false,
            critical: false,
        }
    }

    /// Marks a tier as shown. [`AlertTier::Normal`] is a no-op.
    #[inline]
    pub fn mark_shown(&mut self, tier: AlertTier) {
        match tier {
            AlertTier::Normal => {}
            AlertTier::Low => self.low = true,
            AlertTier::Critical => self.critical = true,
        }
    }
}

/// The outcome of one evaluation pass for one battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The battery is charging: clear both latches and close any live
    /// notification. Evaluated before threshold checks and always wins.
    ClearAlerts,

    /// A threshold tier is active.
    Alert {
        /// The tier to render. Never [`AlertTier::Normal`].
        tier: AlertTier,
        /// Whether to force the notification onto the screen.
        ///
        /// Set exactly when this tier's latch was not yet set, i.e. on the
        /// first crossing per discharge cycle.
        force: bool,
    },

    /// Charge is above both thresholds: no action, latches untouched.
    Keep,
}

/// The transition function: previous latches plus a fresh snapshot in,
/// decision out.
///
/// Tie-break: critical takes priority over low when both thresholds are
/// satisfied. No decision ever renders two notifications.
///
/// # Examples
///
/// ```
/// use bw_core::{AlertTier, ChargeSnapshot, MonitorConfig};
/// use bw_daemon::{decide, Decision, ShownLatches};
///
/// let config = MonitorConfig::default(); // low 15%, critical 5%
/// let snapshot = ChargeSnapshot::new(0.03, false);
///
/// let decision = decide(ShownLatches::cleared(), snapshot, &config);
/// assert_eq!(
///     decision,
///     Decision::Alert { tier: AlertTier::Critical, force: true }
/// );
/// ```
#[must_use]
pub fn decide(
    latches: ShownLatches,
    snapshot: ChargeSnapshot,
    config: &MonitorConfig,
) -> Decision {
    if snapshot.charging {
        return Decision::ClearAlerts;
    }

    if snapshot.fraction <= config.critical_threshold {
        return Decision::Alert {
            tier: AlertTier::Critical,
            force: !latches.critical,
        };
    }

    if snapshot.fraction <= config.low_threshold {
        return Decision::Alert {
            tier: AlertTier::Low,
            force: !latches.low,
        };
    }

    Decision::Keep
}
