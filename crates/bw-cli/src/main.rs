//! CLI entry point for the battwatch daemon.
//!
//! This binary parses arguments, resolves the monitored devices, and runs
//! the monitor loop until SIGTERM or Ctrl-C.
//!
//! # Usage
//!
//! ```bash
//! battwatchd [OPTIONS]
//!
//! # Defaults: poll every 60s, low at 15%, critical at 5%
//! battwatchd
//!
//! # Tighter thresholds, 10s polls, notifications expire after 20s
//! battwatchd --interval 10 --low 20 --critical 8 --timeout 20
//!
//! # Pin the devices instead of auto-discovering
//! battwatchd --battery BAT1 --supply ACAD
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bw_core::Config;
use bw_daemon::{Battery, Monitor};
use bw_notify::{CloseWatcher, DesktopNotifier};
use bw_power::resolve;
use bw_watcher::{AcceptAllFilter, PowerEventWatcher};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Battery monitor daemon with low/critical desktop notifications.
///
/// Watches the power-supply hardware state via udev and sysfs, alerts when
/// charge crosses the configured thresholds, and clears the alerts when
/// charging resumes.
#[derive(Parser)]
#[command(name = "battwatchd", version, about, long_about = None)]
struct Cli {
    /// Seconds between safety-net polls.
    ///
    /// Hardware events (plug/unplug) trigger checks immediately; the poll
    /// interval only bounds how stale the view can get without them.
    #[arg(short, long, env = "BATTWATCH_INTERVAL", default_value_t = 60)]
    interval: u64,

    /// Low-battery threshold in percent.
    #[arg(
        short,
        long,
        env = "BATTWATCH_LOW",
        default_value_t = 15,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    low: u8,

    /// Critical-battery threshold in percent.
    ///
    /// Expected at or below the low threshold; in the overlap, critical
    /// wins.
    #[arg(
        short,
        long,
        env = "BATTWATCH_CRITICAL",
        default_value_t = 5,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    critical: u8,

    /// Notification expiry in seconds. 0 keeps notifications on screen
    /// until dismissed or cleared.
    #[arg(short, long, env = "BATTWATCH_TIMEOUT", default_value_t = 0)]
    timeout: u32,

    /// Battery device to monitor, as a sysfs name (BAT0) or full path.
    ///
    /// May be given multiple times. Without it, every battery-typed
    /// device in the power-supply class is monitored.
    #[arg(short, long, env = "BATTWATCH_BATTERY")]
    battery: Vec<String>,

    /// Mains device to read charging state from, as a sysfs name or path.
    ///
    /// Without it, a conventionally named mains device is auto-detected;
    /// if none exists, each battery's own status field is used.
    #[arg(short, long, env = "BATTWATCH_SUPPLY")]
    supply: Option<String>,

    /// Power-supply sysfs class directory.
    #[arg(long, env = "BATTWATCH_SYSFS_ROOT", hide = true)]
    sysfs_root: Option<Utf8PathBuf>,

    /// Print the resolved configuration as JSON and exit.
    #[arg(long)]
    dump_config: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
/// Noisy transport crates are filtered to `warn` level.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},zbus=warn,notify_rust=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Builds a validated [`Config`] from CLI arguments.
///
/// Thresholds arrive as whole percents and are stored as fractions; the
/// notification timeout arrives in seconds and is stored in milliseconds.
///
/// # Errors
///
/// Returns an error when validation rejects an option value.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = Config::default();

    config.monitor.poll_interval_secs = cli.interval;
    config.monitor.low_threshold = f64::from(cli.low) / 100.0;
    config.monitor.critical_threshold = f64::from(cli.critical) / 100.0;
    config.monitor.notify_timeout_ms = cli.timeout.saturating_mul(1000);

    if let Some(root) = &cli.sysfs_root {
        config.devices.sysfs_root = root.clone();
    }
    config.devices.batteries = cli
        .battery
        .iter()
        .map(|spec| device_path(&config.devices.sysfs_root, spec))
        .collect();
    config.devices.supply = cli
        .supply
        .as_ref()
        .map(|spec| device_path(&config.devices.sysfs_root, spec));

    config.monitor.validate()?;

    if config.monitor.critical_threshold > config.monitor.low_threshold {
        warn!(
            low_percent = cli.low,
            critical_percent = cli.critical,
            "Critical threshold above low threshold; critical wins in the overlap"
        );
    }

    Ok(config)
}

/// Expands a device spec to a path: bare names are joined onto the sysfs
/// root, anything with a separator is taken verbatim.
fn device_path(root: &Utf8Path, spec: &str) -> Utf8PathBuf {
    if spec.contains('/') {
        Utf8PathBuf::from(spec)
    } else {
        root.join(spec)
    }
}

// =============================================================================
// DAEMON LIFECYCLE
// =============================================================================

/// Resolves devices, wires the components together, and runs the monitor
/// loop until a shutdown signal arrives.
async fn run(config: Config) -> color_eyre::Result<()> {
    let resolved = resolve(&config.devices)?;
    info!(
        batteries = resolved.batteries.len(),
        supply = resolved
            .supply
            .as_ref()
            .map_or("none (battery status fallback)", |p| p.as_str()),
        "Resolved devices"
    );

    // Startup-fatal: a daemon that cannot notify has no purpose.
    let close_watcher = CloseWatcher::spawn()?;

    let batteries: Vec<Battery<DesktopNotifier>> = resolved
        .batteries
        .iter()
        .map(|path| {
            Battery::new(
                path.clone(),
                resolved.supply.clone(),
                DesktopNotifier::new(config.monitor.notify_timeout_ms, close_watcher.clone()),
            )
        })
        .collect();

    let mut monitor = Monitor::new(config.monitor, batteries)?;

    // Startup-fatal: without the uevent channel there is no low-latency
    // plug/unplug reaction.
    let mut watcher = PowerEventWatcher::new(AcceptAllFilter).await?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        signal_cancel.cancel();
    });

    monitor.run(watcher.events(), &cancel).await?;

    info!("Shutting down power event watcher");
    watcher.shutdown().await?;

    info!("battwatchd stopped");
    Ok(())
}

/// Completes when SIGTERM or Ctrl-C is delivered.
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                    _ = tokio::signal::ctrl_c() => info!("Received Ctrl-C, shutting down"),
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                info!("Received Ctrl-C, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received Ctrl-C, shutting down");
    }
}

/// Writes the resolved configuration as pretty JSON to stdout.
fn dump_config(config: &Config) -> color_eyre::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{json}")?;
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Build and validate the configuration
    let config = build_config(&cli)?;

    if cli.dump_config {
        return dump_config(&config);
    }

    // 5. Run the daemon
    run(config).await
}
