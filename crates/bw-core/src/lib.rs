//! Core types, errors, and configuration for battwatch.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - Configuration structures ([`Config`], [`MonitorConfig`], [`DeviceConfig`])
//! - Configuration errors ([`ConfigError`])
//! - Domain types ([`AlertTier`], [`ChargeSnapshot`])

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, DeviceConfig, MonitorConfig};
pub use error::ConfigError;
pub use types::{AlertTier, ChargeSnapshot};
