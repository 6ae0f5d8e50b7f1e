//! Desktop notification sink for battwatch.
//!
//! This crate owns everything that touches the freedesktop notification
//! service:
//!
//! - [`AlertMessage`] - rendered notification content for an alert tier
//! - [`Notifier`] - the trait seam between the threshold state machine and
//!   the notification transport, so the daemon's logic is testable with a
//!   recording mock
//! - [`DesktopNotifier`] - the `notify-rust` backed implementation owning
//!   at most one live notification handle per battery
//! - [`CloseWatcher`] - a dedicated background thread servicing the
//!   notification service's close signals, so the sink can tell a
//!   dismissed notification from a visible one
//!
//! # Redisplay semantics
//!
//! A live notification is updated in place on every pass its tier stays
//! active. It is pushed back onto the screen only when the tier is newly
//! crossed (force) or when no dismissal has been observed, in which case a
//! re-show is an in-place content refresh. A user's dismissal is respected
//! until the next forced signal.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod closed;
pub mod error;
pub mod message;
pub mod sink;

pub use closed::CloseWatcher;
pub use error::NotifyError;
pub use message::AlertMessage;
pub use sink::{DesktopNotifier, Notifier};
