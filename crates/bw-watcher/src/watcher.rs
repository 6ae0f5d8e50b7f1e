//! Udev monitor with async event streaming.
//!
//! This module provides the [`PowerEventWatcher`] type that bridges the
//! synchronous udev monitor socket to the async tokio runtime.
//!
//! The monitor socket is created on the blocking thread (udev handles are
//! not meant to cross threads) and its readiness is reported back through a
//! oneshot so that initialization failures surface as startup errors
//! rather than at shutdown.

use std::os::fd::AsRawFd;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::WatchError;
use crate::events::PowerEvent;
use crate::filter::EventFilter;

/// Default channel capacity for power events.
///
/// Power-supply uevents arrive in small bursts on plug/unplug; 64 is
/// generous headroom.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// How long each `poll()` slice waits before re-checking for shutdown.
const SHUTDOWN_POLL_SLICE_MS: libc::c_int = 500;

/// The udev subsystem the monitor is scoped to.
const SUBSYSTEM: &str = "power_supply";

/// A power-supply uevent watcher that streams events to an async context.
///
/// `PowerEventWatcher` manages a background blocking task that owns the
/// udev monitor socket. Events are filtered on that thread and sent
/// through a tokio mpsc channel for consumption by the monitor loop.
///
/// # Lifecycle
///
/// 1. **Creation**: [`PowerEventWatcher::new`] spawns the blocking task,
///    which builds the monitor socket and reports readiness back; a socket
///    that cannot be created fails construction.
///
/// 2. **Event Reception**: use [`recv`](Self::recv) or
///    [`events`](Self::events) (for `tokio::select!`).
///
/// 3. **Shutdown**: call [`shutdown`](Self::shutdown) for a clean join, or
///    drop the watcher to signal the task and let it wind down on its own.
///
/// # Examples
///
/// ```no_run
/// use bw_watcher::{AcceptAllFilter, PowerEventWatcher};
///
/// # async fn example() -> Result<(), bw_watcher::WatchError> {
/// let mut watcher = PowerEventWatcher::new(AcceptAllFilter).await?;
///
/// while let Some(event) = watcher.recv().await {
///     println!("{:?} on {}", event.action, event.sysname);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PowerEventWatcher {
    /// Shutdown signal sender.
    ///
    /// Sending on this channel signals the blocking task to stop.
    /// Set to `None` after shutdown is initiated.
    shutdown_tx: Option<oneshot::Sender<()>>,

    /// Handle to the blocking watcher task, awaited during shutdown.
    task_handle: Option<JoinHandle<Result<(), WatchError>>>,

    /// Event receiver for async consumption.
    event_rx: mpsc::Receiver<PowerEvent>,
}

impl std::fmt::Debug for PowerEventWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerEventWatcher")
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl PowerEventWatcher {
    /// Creates a new watcher for the `power_supply` subsystem.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Monitor`] if the udev monitor socket cannot
    /// be created or bound. This is a fatal startup condition.
    pub async fn new<F: EventFilter>(filter: F) -> Result<Self, WatchError> {
        Self::with_capacity(filter, DEFAULT_CHANNEL_CAPACITY).await
    }

    /// Creates a watcher with a custom event channel capacity.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Monitor`] if the udev monitor socket cannot
    /// be created or bound.
    pub async fn with_capacity<F: EventFilter>(
        filter: F,
        channel_capacity: usize,
    ) -> Result<Self, WatchError> {
        let (event_tx, event_rx) = mpsc::channel(channel_capacity);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (init_tx, init_rx) = oneshot::channel();

        let task_handle = tokio::task::spawn_blocking(move || {
            run_monitor_loop(event_tx, shutdown_rx, init_tx, filter)
        });

        // Wait for the blocking task to report whether the socket came up.
        match init_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(WatchError::ChannelClosed),
        }

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            task_handle: Some(task_handle),
            event_rx,
        })
    }

    /// Receives the next power event asynchronously.
    ///
    /// Returns `None` when the watcher has been shut down or its task has
    /// terminated.
    pub async fn recv(&mut self) -> Option<PowerEvent> {
        self.event_rx.recv().await
    }

    /// Tries to receive a power event without blocking.
    pub fn try_recv(&mut self) -> Result<PowerEvent, mpsc::error::TryRecvError> {
        self.event_rx.try_recv()
    }

    /// Returns a mutable reference to the event receiver.
    ///
    /// This is the seam the monitor loop uses with `tokio::select!`.
    pub fn events(&mut self) -> &mut mpsc::Receiver<PowerEvent> {
        &mut self.event_rx
    }

    /// Returns `true` if the watcher task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some() && self.task_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Gracefully shuts down the watcher.
    ///
    /// Sends the shutdown signal and awaits the blocking task.
    ///
    /// # Errors
    ///
    /// Returns any error the watcher thread terminated with.
    pub async fn shutdown(mut self) -> Result<(), WatchError> {
        if let Some(tx) = self.shutdown_tx.take() {
            // Ignore error if the task already exited
            let _ = tx.send(());
        }

        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(result) => result?,
                Err(_join_error) => return Err(WatchError::ChannelClosed),
            }
        }

        Ok(())
    }
}

impl Drop for PowerEventWatcher {
    fn drop(&mut self) {
        // Signal the blocking task; Drop is sync, so the task is not
        // awaited and stops within one poll slice.
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Runs the udev monitor loop in a blocking context.
///
/// Builds the monitor socket, reports readiness through `init_tx`, then
/// alternates between short `poll()` waits and shutdown checks, draining
/// the socket whenever it becomes readable.
fn run_monitor_loop<F: EventFilter>(
    event_tx: mpsc::Sender<PowerEvent>,
    mut shutdown_rx: oneshot::Receiver<()>,
    init_tx: oneshot::Sender<Result<(), WatchError>>,
    filter: F,
) -> Result<(), WatchError> {
    let socket = match build_monitor_socket() {
        Ok(socket) => {
            let _ = init_tx.send(Ok(()));
            socket
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize udev monitor");
            if let Err(unsent) = init_tx.send(Err(e)) {
                // Construction side went away; surface through the join handle.
                return unsent;
            }
            return Ok(());
        }
    };

    let fd = socket.as_raw_fd();
    tracing::info!(subsystem = SUBSYSTEM, "Power event watcher started");

    loop {
        match shutdown_rx.try_recv() {
            Err(oneshot::error::TryRecvError::Empty) => {}
            // Signalled, or the watcher handle was dropped without one
            Ok(()) | Err(oneshot::error::TryRecvError::Closed) => break,
        }

        match wait_readable(fd) {
            Ok(false) => continue, // slice elapsed, re-check shutdown
            Ok(true) => {}
            Err(e) => {
                tracing::error!(error = %e, "poll() failed on udev monitor socket");
                return Err(WatchError::Io(e));
            }
        }

        for event in socket.iter() {
            let power_event = PowerEvent::from_udev(&event);

            if !filter.should_forward(&power_event) {
                tracing::trace!(sysname = %power_event.sysname, "Filtered out power event");
                continue;
            }

            tracing::debug!(
                sysname = %power_event.sysname,
                action = ?power_event.action,
                "Power event"
            );

            // Send via blocking_send for sync context
            if event_tx.blocking_send(power_event).is_err() {
                tracing::debug!("Event channel closed, stopping watcher");
                return Ok(());
            }
        }
    }

    tracing::info!("Power event watcher stopped");
    Ok(())
}

/// Builds the udev monitor socket scoped to the power-supply subsystem.
fn build_monitor_socket() -> Result<udev::MonitorSocket, WatchError> {
    udev::MonitorBuilder::new()
        .and_then(|builder| builder.match_subsystem(SUBSYSTEM))
        .and_then(udev::MonitorBuilder::listen)
        .map_err(WatchError::Monitor)
}

/// Waits one slice for the socket to become readable.
///
/// Returns `Ok(true)` when readable, `Ok(false)` when the slice elapsed.
/// `EINTR` counts as an elapsed slice so signal delivery never kills the
/// watcher.
fn wait_readable(fd: std::os::fd::RawFd) -> Result<bool, std::io::Error> {
    let mut pollfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };

    // The monitor socket iterator is non-blocking; poll() is the only way
    // to wait on it without spinning.
    #[allow(unsafe_code)]
    let ready = unsafe { libc::poll(&raw mut pollfd, 1, SHUTDOWN_POLL_SLICE_MS) };

    if ready < 0 {
        let err = std::io::Error::last_os_error();
        if err.kind() == std::io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }

    if pollfd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
        return Err(std::io::Error::other("udev monitor socket error"));
    }

    Ok(ready > 0 && (pollfd.revents & libc::POLLIN) != 0)
}
