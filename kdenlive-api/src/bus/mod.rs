//! Remote-call plumbing for Kdenlive's D-Bus scripting interface.
//!
//! The pieces, bottom up:
//!
//! - [`value`]: [`RemoteValue`] for replies, [`Arg`] for call arguments.
//! - [`reply`]: parser for the `dbus-send --print-reply` dump.
//! - [`tools`]: locating, encoding for and running the CLI bus tools.
//! - [`locator`]: finding the PID-suffixed service name.
//! - [`transport`]: the [`Transport`] seam, the subprocess transport and the selector that picks
//!   between a native binding and subprocess mode.
//! - [`client`]: [`BusClient`], the facade every domain wrapper goes through.

pub mod client;
pub mod locator;
#[cfg(feature = "native-bus")]
pub mod native;
pub mod reply;
pub mod tools;
pub mod transport;
pub mod value;

pub use client::BusClient;
pub use locator::ServiceAddress;
pub use transport::{Transport, TransportMode};
pub use value::{Arg, Record, RecordExt, RemoteValue};

use std::path::PathBuf;
use std::time::Duration;

/// Well-known bus name prefix; running instances register `<prefix>-<pid>`.
pub const DBUS_SERVICE_PREFIX: &str = "org.kde.kdenlive";
/// Name used when no PID-suffixed instance is found.
pub const DBUS_SERVICE: &str = "org.kde.kdenlive";
pub const DBUS_PATH: &str = "/MainWindow";
pub const DBUS_INTERFACE: &str = "org.kde.kdenlive.MainWindow";

const DEFAULT_CRAFT_ROOT: &str = r"C:\CraftRoot";

/// Addressing and timing knobs for the bus layer.
#[derive(Debug, Clone, PartialEq)]
pub struct BusSettings {
    pub service_prefix: String,
    pub object_path: String,
    pub interface: String,
    /// Deadline for a single CLI method call.
    pub call_timeout: Duration,
    /// Deadline for the name listing used by discovery.
    pub discovery_timeout: Duration,
    /// KDE Craft install searched for tools before `PATH`.
    pub craft_root: PathBuf,
    /// Pause after `addProjectClip` before the bin is re-read.
    pub import_settle: Duration,
}

impl BusSettings {
    /// Craft root from `$CRAFT_ROOT`, or the stock Windows install location.
    pub fn craft_root_from_env() -> PathBuf {
        std::env::var_os("CRAFT_ROOT")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CRAFT_ROOT))
    }
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            service_prefix: DBUS_SERVICE_PREFIX.to_string(),
            object_path: DBUS_PATH.to_string(),
            interface: DBUS_INTERFACE.to_string(),
            call_timeout: Duration::from_secs(30),
            discovery_timeout: Duration::from_secs(5),
            craft_root: Self::craft_root_from_env(),
            import_settle: Duration::from_millis(300),
        }
    }
}

/// Backoff schedule for calls that race the application's startup, such as opening a
/// project right after launch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub initial_delay: Duration,
    pub growth: f64,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Delays slept between consecutive attempts (one fewer than `attempts`).
    ///
    /// A growth factor that yields no valid duration (negative, NaN or overflowing) jumps
    /// straight to `max_delay`.
    pub fn delays(&self) -> Vec<Duration> {
        let mut delays = Vec::new();
        let mut delay = self.initial_delay.min(self.max_delay);
        for _ in 1..self.attempts {
            delays.push(delay);
            delay = Duration::try_from_secs_f64(delay.as_secs_f64() * self.growth)
                .unwrap_or(self.max_delay)
                .min(self.max_delay);
        }
        delays
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            initial_delay: Duration::from_millis(500),
            growth: 1.5,
            max_delay: Duration::from_secs(3),
        }
    }
}
