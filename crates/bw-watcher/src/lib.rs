//! Udev power-supply event channel with async streaming.
//!
//! This crate provides hardware-change detection for the `power_supply`
//! device class via a udev monitor, bridged to an async tokio context.
//!
//! # Overview
//!
//! The bw-watcher crate is designed to:
//!
//! - Subscribe to kernel uevents for the `power_supply` subsystem
//!   (plug/unplug, charge property changes)
//! - Filter events at the source before they cross the channel
//! - Stream events asynchronously to the monitor loop, where each event is
//!   merely a wake signal that restarts the poll countdown
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Blocking Thread (spawn_blocking)             │
//! │  ┌──────────────────┐    ┌────────────────┐    ┌────────────┐  │
//! │  │ udev MonitorSocket│ -> │ poll() wait    │ -> │ Filter     │  │
//! │  │ (power_supply)   │    │ (500ms slices) │    │ (sysname)  │  │
//! │  └──────────────────┘    └────────────────┘    └─────┬──────┘  │
//! └──────────────────────────────────────────────────────│─────────┘
//!                                                        │
//!                                          blocking_send │
//!                                                        ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Async Runtime (tokio)                        │
//! │  ┌──────────────────┐    ┌────────────────┐                     │
//! │  │ PowerEventWatcher│    │ mpsc::Receiver │ -> Monitor Loop     │
//! │  │ (shutdown ctrl)  │    │ (events)       │                     │
//! │  └──────────────────┘    └────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use bw_watcher::{AcceptAllFilter, PowerEventWatcher};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut watcher = PowerEventWatcher::new(AcceptAllFilter).await?;
//!
//!     while let Some(event) = watcher.recv().await {
//!         println!("Power event on {}", event.sysname);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! Monitor initialization failure ([`WatchError::Monitor`]) is fatal: the
//! daemon cannot provide its low-latency plug/unplug reaction without the
//! event channel, so startup aborts. Errors after startup terminate the
//! watcher task and surface through [`PowerEventWatcher::shutdown`].

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod filter;
pub mod watcher;

// Re-export error types
pub use error::WatchError;

// Re-export event types
pub use events::{DeviceAction, PowerEvent};

// Re-export filter types
pub use filter::{AcceptAllFilter, EventFilter, SysnameFilter};

// Re-export watcher types
pub use watcher::PowerEventWatcher;
