//! Shared configuration loader for the kdenlive tools.
//!
//! `defaults/kdenlive.default.toml` is embedded into every binary so that the documented
//! defaults and runtime behavior stay in sync. Applications layer user files and command line
//! overrides on top of those defaults via [`Loader`] before deserializing into
//! [`KdenliveConfig`]. The `bus` and `retry` groups convert into the settings types the
//! `kdenlive-api` client takes.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use kdenlive_api::{BusSettings, RetryPolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TOML: &str = include_str!("../defaults/kdenlive.default.toml");

/// Name of the optional per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = "kdenlive.toml";

/// Top-level configuration consumed by the kdenlive tools.
#[derive(Debug, Clone, Deserialize)]
pub struct KdenliveConfig {
    pub bus: BusConfig,
    pub retry: RetryConfig,
    pub workflow: WorkflowConfig,
}

/// Addressing and timeouts for the session bus.
#[derive(Debug, Clone, Deserialize)]
pub struct BusConfig {
    pub service_prefix: String,
    pub object_path: String,
    pub interface: String,
    pub call_timeout_secs: u64,
    pub discovery_timeout_secs: u64,
    /// Empty means "from the environment".
    pub craft_root: String,
    pub import_settle_millis: u64,
}

impl From<&BusConfig> for BusSettings {
    fn from(config: &BusConfig) -> Self {
        let craft_root = if config.craft_root.is_empty() {
            BusSettings::craft_root_from_env()
        } else {
            PathBuf::from(&config.craft_root)
        };
        BusSettings {
            service_prefix: config.service_prefix.clone(),
            object_path: config.object_path.clone(),
            interface: config.interface.clone(),
            call_timeout: Duration::from_secs(config.call_timeout_secs),
            discovery_timeout: Duration::from_secs(config.discovery_timeout_secs),
            craft_root,
            import_settle: Duration::from_millis(config.import_settle_millis),
        }
    }
}

impl From<BusConfig> for BusSettings {
    fn from(config: BusConfig) -> Self {
        BusSettings::from(&config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    pub attempts: u32,
    pub initial_delay_millis: u64,
    pub growth: f64,
    pub max_delay_millis: u64,
}

/// Upper bound on the backoff growth factor; anything larger reaches `max_delay` in one step.
const MAX_GROWTH: f64 = 100.0;

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        // NaN fails both comparisons and lands on 1.0
        let growth = if config.growth >= 1.0 {
            config.growth.min(MAX_GROWTH)
        } else {
            1.0
        };
        if growth != config.growth {
            log::warn!("retry.growth {} is out of range, using {growth}", config.growth);
        }
        RetryPolicy {
            attempts: config.attempts.max(1),
            initial_delay: Duration::from_millis(config.initial_delay_millis),
            growth,
            max_delay: Duration::from_millis(config.max_delay_millis),
        }
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        RetryPolicy::from(&config)
    }
}

/// Knobs for the timeline workflows.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    pub scene_count: u32,
    pub scene_duration_frames: i64,
    pub mix_duration_frames: i64,
    pub variant: String,
    pub video_dir: PathBuf,
    pub script: PathBuf,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<KdenliveConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<KdenliveConfig, ConfigError> {
    Loader::new().build()
}
