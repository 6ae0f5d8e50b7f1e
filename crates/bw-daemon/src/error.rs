//! Error types for the bw-daemon crate.

use bw_notify::NotifyError;
use bw_watcher::WatchError;

/// Errors that can terminate the monitor loop.
///
/// Per-battery read failures never appear here; they are logged inside the
/// evaluation pass and skip only the affected battery. A [`DaemonError`]
/// means the daemon as a whole cannot continue.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    /// The hardware event channel closed while the loop was running.
    ///
    /// The watcher task terminating out from under the loop leaves the
    /// daemon without its low-latency wake source.
    #[error("hardware event channel closed unexpectedly")]
    EventChannelClosed,

    /// There are no batteries to monitor.
    #[error("no batteries to monitor")]
    NoBatteries,

    /// A watcher error surfaced during shutdown.
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// A notification error surfaced during startup.
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_channel_closed_display() {
        let err = DaemonError::EventChannelClosed;
        assert!(err.to_string().contains("channel closed"));
    }

    #[test]
    fn test_no_batteries_display() {
        let err = DaemonError::NoBatteries;
        assert!(err.to_string().contains("no batteries"));
    }
}
