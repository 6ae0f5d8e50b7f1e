//! The notification sink.
//!
//! [`Notifier`] is the seam between the threshold state machine and the
//! notification transport. The daemon holds one sink per battery; each
//! sink owns at most one live notification at a time.
//!
//! [`DesktopNotifier`] is the production implementation on `notify-rust`.
//! Tests in the daemon crate substitute a recording mock.

use notify_rust::{Notification, NotificationHandle, Timeout};
use tracing::{debug, trace};

use crate::closed::CloseWatcher;
use crate::error::NotifyError;
use crate::message::{AlertMessage, APP_NAME};

/// A per-battery notification sink.
///
/// # Contract
///
/// - [`show`](Self::show) with no live notification creates and displays
///   one. With a live notification it updates the content in place, then
///   re-displays only if `force` is set or no dismissal has been observed.
/// - [`close`](Self::close) removes the live notification if present and
///   is idempotent. The notification identity is retained so a later show
///   reuses it.
pub trait Notifier: Send + 'static {
    /// Shows or updates the battery's notification.
    ///
    /// # Errors
    ///
    /// Returns an error when the notification service rejects the call;
    /// the caller logs it and retries on a later pass.
    fn show(&mut self, message: &AlertMessage, force: bool) -> Result<(), NotifyError>;

    /// Closes the live notification, if any.
    fn close(&mut self);
}

/// The `notify-rust` backed sink used by the daemon.
///
/// Owns the battery's [`NotificationHandle`] exclusively. The handle is
/// created on the first alert, updated in place for as long as the battery
/// exists, and released when charging resumes or the process exits. The
/// numeric notification id survives a close so the next alert replaces the
/// same slot instead of stacking a new bubble.
pub struct DesktopNotifier {
    /// The live notification, if one is on screen (or dismissed but not
    /// yet closed by us).
    handle: Option<NotificationHandle>,

    /// The last id shown, kept across closes for reuse.
    last_id: Option<u32>,

    /// Expiry applied when a notification is created.
    timeout: Timeout,

    /// Shared close-signal tracking.
    closed: CloseWatcher,
}

impl std::fmt::Debug for DesktopNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopNotifier")
            .field("live", &self.handle.is_some())
            .field("last_id", &self.last_id)
            .finish_non_exhaustive()
    }
}

impl DesktopNotifier {
    /// Creates a sink with the given expiry.
    ///
    /// `timeout_ms` of 0 means never expire, matching the daemon's
    /// configuration contract.
    #[must_use]
    pub fn new(timeout_ms: u32, closed: CloseWatcher) -> Self {
        let timeout = match timeout_ms {
            0 => Timeout::Never,
            ms => Timeout::Milliseconds(ms),
        };
        Self {
            handle: None,
            last_id: None,
            timeout,
            closed,
        }
    }

    /// Builds the notification for a first show.
    fn build(&self, message: &AlertMessage) -> Notification {
        let mut notification = Notification::new();
        notification
            .appname(APP_NAME)
            .summary(&message.summary)
            .body(&message.body)
            .icon(message.icon)
            .urgency(message.urgency)
            .timeout(self.timeout);
        if let Some(id) = self.last_id {
            // Reuse the previous slot rather than stacking a new bubble.
            notification.id(id);
        }
        notification.finalize()
    }
}

impl Notifier for DesktopNotifier {
    fn show(&mut self, message: &AlertMessage, force: bool) -> Result<(), NotifyError> {
        match self.handle.as_mut() {
            None => {
                let handle = self.build(message).show()?;
                let id = handle.id();
                debug!(id, summary = %message.summary, "Notification shown");
                self.closed.clear(id);
                self.last_id = Some(id);
                self.handle = Some(handle);
            }
            Some(handle) => {
                // Refresh content on the retained handle.
                handle.summary(&message.summary);
                handle.body(&message.body);
                handle.icon(message.icon);
                handle.urgency(message.urgency);

                let id = handle.id();
                let dismissed = self.closed.was_closed(id);

                if force {
                    // A newly crossed tier overrides an earlier dismissal.
                    handle.update();
                    self.closed.clear(id);
                    debug!(id, summary = %message.summary, "Notification re-shown (forced)");
                } else if !dismissed {
                    // No close observed: an update is an in-place content
                    // refresh, not a re-display.
                    handle.update();
                    trace!(id, "Notification content updated");
                } else {
                    trace!(id, "Notification dismissed by user; not re-showing");
                }
            }
        }
        Ok(())
    }

    fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            let id = handle.id();
            debug!(id, "Closing notification");
            handle.close();
            self.closed.clear(id);
            // last_id is retained for reuse.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Showing requires a live notification daemon on the session bus, so
    // only the transport-free pieces are unit tested here. The redisplay
    // decision table is exercised through the daemon crate's mock sink.

    #[test]
    fn test_timeout_zero_means_never() {
        let sink = DesktopNotifier::new(0, CloseWatcher::inert());
        assert_eq!(sink.timeout, Timeout::Never);
    }

    #[test]
    fn test_timeout_milliseconds() {
        let sink = DesktopNotifier::new(5_000, CloseWatcher::inert());
        assert_eq!(sink.timeout, Timeout::Milliseconds(5_000));
    }

    #[test]
    fn test_new_sink_has_no_live_handle() {
        let sink = DesktopNotifier::new(0, CloseWatcher::inert());
        assert!(sink.handle.is_none());
        assert!(sink.last_id.is_none());
    }

    #[test]
    fn test_close_without_handle_is_idempotent() {
        let mut sink = DesktopNotifier::new(0, CloseWatcher::inert());
        sink.close();
        sink.close();
        assert!(sink.handle.is_none());
    }
}
