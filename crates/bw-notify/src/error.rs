//! Error types for the bw-notify crate.

/// Errors that can occur while talking to the notification service.
///
/// A failure to connect at startup ([`NotifyError::Bus`] from
/// [`CloseWatcher::spawn`](crate::CloseWatcher::spawn)) is fatal to the
/// daemon. A failure to show a notification mid-flight is logged by the
/// caller and retried naturally on the next evaluation pass.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The notification service rejected or failed a show/update call.
    #[error("failed to show desktop notification: {0}")]
    Show(#[from] notify_rust::error::Error),

    /// The session bus connection failed.
    #[error("failed to connect to the session bus: {0}")]
    Bus(#[from] zbus::Error),

    /// The close-signal dispatch thread could not be spawned.
    #[error("failed to spawn notification dispatch thread: {0}")]
    Dispatch(#[from] std::io::Error),
}
