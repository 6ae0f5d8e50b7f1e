//! Error types for the bw-watcher crate.
//!
//! This module provides the [`WatchError`] type for errors that can occur
//! while monitoring power-supply uevents.

/// Errors that can occur during power-supply event monitoring.
///
/// # Error Recovery Strategy
///
/// - **Monitor errors** ([`WatchError::Monitor`]): Fatal - the udev monitor
///   could not be created, so the daemon has no hardware-change channel.
/// - **Channel closed** ([`WatchError::ChannelClosed`]): Fatal -
///   communication between the watcher thread and the monitor loop broke.
/// - **Wait errors** ([`WatchError::Io`]): Fatal - `poll()` on the monitor
///   socket failed for a reason other than signal interruption.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Failed to create or bind the udev monitor socket.
    #[error("failed to initialize udev monitor: {0}")]
    Monitor(std::io::Error),

    /// The event channel was closed unexpectedly.
    #[error("event channel closed unexpectedly")]
    ChannelClosed,

    /// An I/O error occurred while waiting for device events.
    #[error("I/O error while waiting for device events: {0}")]
    Io(std::io::Error),
}

impl WatchError {
    /// Returns `true` if this error is fatal (watching cannot continue).
    ///
    /// All watcher errors are currently fatal; the variant exists so
    /// callers do not need to care if a recoverable case appears later.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_monitor_error_display() {
        let err = WatchError::Monitor(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "netlink bind refused",
        ));
        assert!(err.to_string().contains("udev monitor"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_channel_closed_display() {
        let err = WatchError::ChannelClosed;
        assert!(err.to_string().contains("channel closed"));
    }
}
