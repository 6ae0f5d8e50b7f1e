//! Close-signal tracking for shown notifications.
//!
//! The freedesktop notification protocol reports dismissal and expiry
//! through the `NotificationClosed` signal on the session bus. The
//! notification library used for showing does not surface a queryable
//! close reason, so this module reconstructs one: [`CloseWatcher::spawn`]
//! starts a dedicated thread that services those signals for the daemon's
//! lifetime and records `id -> reason` in a shared map.
//!
//! The dispatch thread never touches battery state and needs no
//! synchronization with the monitor loop beyond the map itself.

use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};
use zbus::blocking::{Connection, Proxy};

/// Bus name of the freedesktop notification service.
const NOTIFICATION_SERVICE: &str = "org.freedesktop.Notifications";

/// Object path of the freedesktop notification service.
const NOTIFICATION_PATH: &str = "/org/freedesktop/Notifications";

/// The signal emitted when a notification leaves the screen.
const CLOSED_SIGNAL: &str = "NotificationClosed";

/// Close reasons observed for notification ids.
type ClosedMap = Arc<Mutex<FxHashMap<u32, u32>>>;

/// Tracks which notification ids have been closed and why.
///
/// Clones share the same underlying map, so one watcher serves every
/// battery's sink.
///
/// # Close reasons
///
/// Per the freedesktop spec: 1 = expired, 2 = dismissed by the user,
/// 3 = closed by a `CloseNotification` call, 4 = undefined. The sink only
/// cares whether any reason has been observed at all: an id with no
/// recorded close is treated as having no information, which reads as
/// not-currently-visible and makes an in-place re-show safe.
#[derive(Debug, Clone)]
pub struct CloseWatcher {
    closed: ClosedMap,
}

impl CloseWatcher {
    /// Connects to the session bus and spawns the dispatch thread.
    ///
    /// The thread runs for the process's lifetime; it holds only the bus
    /// connection and the shared map.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Bus`](crate::NotifyError::Bus) if the session
    /// bus is unreachable and
    /// [`NotifyError::Dispatch`](crate::NotifyError::Dispatch) if the
    /// thread cannot be spawned. Both are fatal startup conditions: a
    /// daemon that cannot notify has no purpose.
    pub fn spawn() -> Result<Self, crate::NotifyError> {
        let connection = Connection::session()?;
        let closed: ClosedMap = Arc::new(Mutex::new(FxHashMap::default()));

        let map = Arc::clone(&closed);
        thread::Builder::new()
            .name("notify-dispatch".to_owned())
            .spawn(move || dispatch_loop(&connection, &map))?;

        Ok(Self { closed })
    }

    /// Returns `true` if a close has been observed for this id.
    #[must_use]
    pub fn was_closed(&self, id: u32) -> bool {
        self.closed.lock().contains_key(&id)
    }

    /// Returns the recorded close reason for this id, if any.
    #[must_use]
    pub fn close_reason(&self, id: u32) -> Option<u32> {
        self.closed.lock().get(&id).copied()
    }

    /// Forgets the recorded close for this id.
    ///
    /// Called when a notification is (re-)shown under the id, at which
    /// point the previous close no longer describes the screen state.
    pub fn clear(&self, id: u32) {
        self.closed.lock().remove(&id);
    }

    /// Records a close, exactly as the dispatch thread would.
    #[cfg(test)]
    fn record(&self, id: u32, reason: u32) {
        self.closed.lock().insert(id, reason);
    }

    /// Creates a watcher with no dispatch thread behind it.
    ///
    /// Nothing is ever recorded as closed; useful where the session bus is
    /// known to be absent and close tracking is acceptable to lose.
    #[must_use]
    pub fn inert() -> Self {
        Self {
            closed: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }
}

/// Services `NotificationClosed` signals until the connection drops.
fn dispatch_loop(connection: &Connection, closed: &ClosedMap) {
    let proxy = match Proxy::new(
        connection,
        NOTIFICATION_SERVICE,
        NOTIFICATION_PATH,
        NOTIFICATION_SERVICE,
    ) {
        Ok(proxy) => proxy,
        Err(e) => {
            warn!(error = %e, "Notification service proxy failed; dismissals will not be tracked");
            return;
        }
    };

    let signals = match proxy.receive_signal(CLOSED_SIGNAL) {
        Ok(signals) => signals,
        Err(e) => {
            warn!(error = %e, "Close-signal subscription failed; dismissals will not be tracked");
            return;
        }
    };

    debug!("Notification dispatch thread started");

    for message in signals {
        match message.body().deserialize::<(u32, u32)>() {
            Ok((id, reason)) => {
                debug!(id, reason, "Notification closed");
                closed.lock().insert(id, reason);
            }
            Err(e) => warn!(error = %e, "Malformed NotificationClosed signal"),
        }
    }

    debug!("Notification dispatch thread ended");
}
