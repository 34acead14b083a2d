//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `freightwatch-config.yaml` at
//! the project root. This module defines strongly-typed structs that
//! mirror the YAML structure, and provides a loader that reads the file
//! and applies environment overrides.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `freightwatch-config.yaml`. All fields have
/// defaults so a missing file or section falls back to a runnable
/// demo setup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, timing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Fleet size and spawning.
    #[serde(default)]
    pub fleet: FleetConfig,

    /// Route generation tuning.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Per-container stochastic behavior.
    #[serde(default)]
    pub behavior: BehaviorConfig,

    /// Telemetry and alert delivery.
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Geofence source and reload.
    #[serde(default)]
    pub geofences: GeofenceConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `FREIGHTWATCH_GEOFENCES` environment variable overrides
    /// `geofences.path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.geofences.apply_env_overrides();
        Ok(config)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Simulated seconds per real second.
    #[serde(default = "default_speed")]
    pub speed: f64,

    /// Stop after this many ticks; 0 means unbounded.
    #[serde(default)]
    pub max_ticks: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
            speed: default_speed(),
            max_ticks: 0,
        }
    }
}

/// Fleet configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FleetConfig {
    /// Number of containers to spawn at startup.
    #[serde(default = "default_initial_containers")]
    pub initial_containers: u32,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            initial_containers: default_initial_containers(),
        }
    }
}

/// Route generation configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoutingConfig {
    /// Probability that a rail-eligible journey gets a rail final leg.
    #[serde(default = "default_rail_probability")]
    pub rail_probability: f64,

    /// Maximum lateral deviation for intermediate sea points, km.
    #[serde(default = "default_max_deviation_km")]
    pub max_deviation_km: f64,

    /// Water-validation nudge attempts per failed segment.
    #[serde(default = "default_nudge_retries")]
    pub nudge_retries: usize,

    /// Target spacing between generated transit points, km.
    #[serde(default = "default_transit_spacing_km")]
    pub transit_spacing_km: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            rail_probability: default_rail_probability(),
            max_deviation_km: default_max_deviation_km(),
            nudge_retries: default_nudge_retries(),
            transit_spacing_km: default_transit_spacing_km(),
        }
    }
}

/// Container behavior configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BehaviorConfig {
    /// Probability of a dwell pause at a waypoint crossing.
    #[serde(default = "default_dwell_probability")]
    pub dwell_probability: f64,

    /// Shortest dwell pause, simulated minutes.
    #[serde(default = "default_dwell_min_minutes")]
    pub dwell_min_minutes: i64,

    /// Longest dwell pause, simulated minutes.
    #[serde(default = "default_dwell_max_minutes")]
    pub dwell_max_minutes: i64,

    /// Interval between location pings, simulated minutes.
    #[serde(default = "default_ping_interval_minutes")]
    pub ping_interval_minutes: i64,

    /// Probability of door activity at an arrival stop.
    #[serde(default = "default_door_probability")]
    pub door_probability: f64,

    /// Consecutive faults before a container is removed.
    #[serde(default = "default_fault_threshold")]
    pub fault_threshold: u32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            dwell_probability: default_dwell_probability(),
            dwell_min_minutes: default_dwell_min_minutes(),
            dwell_max_minutes: default_dwell_max_minutes(),
            ping_interval_minutes: default_ping_interval_minutes(),
            door_probability: default_door_probability(),
            fault_threshold: default_fault_threshold(),
        }
    }
}

/// Telemetry and alert delivery configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelemetryConfig {
    /// Shortest tracker transmission delay, seconds.
    #[serde(default = "default_report_delay_min_secs")]
    pub report_delay_min_secs: i64,

    /// Longest tracker transmission delay, seconds.
    #[serde(default = "default_report_delay_max_secs")]
    pub report_delay_max_secs: i64,

    /// Bounded gate-event queue capacity.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Maximum alerts retained in the in-memory store.
    #[serde(default = "default_alert_store_capacity")]
    pub alert_store_capacity: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            report_delay_min_secs: default_report_delay_min_secs(),
            report_delay_max_secs: default_report_delay_max_secs(),
            queue_capacity: default_queue_capacity(),
            alert_store_capacity: default_alert_store_capacity(),
        }
    }
}

/// Geofence source configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GeofenceConfig {
    /// Path to a GeoJSON feature collection. When absent the built-in
    /// demo world is used.
    #[serde(default)]
    pub path: Option<String>,

    /// Reload interval in real seconds; 0 disables reloading.
    #[serde(default)]
    pub reload_interval_secs: u64,
}

impl GeofenceConfig {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("FREIGHTWATCH_GEOFENCES")
            && !path.is_empty()
        {
            self.path = Some(path);
        }
    }
}

fn default_world_name() -> String {
    "freightwatch".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_speed() -> f64 {
    900.0
}

const fn default_initial_containers() -> u32 {
    25
}

const fn default_rail_probability() -> f64 {
    0.30
}

const fn default_max_deviation_km() -> f64 {
    50.0
}

const fn default_nudge_retries() -> usize {
    3
}

const fn default_transit_spacing_km() -> f64 {
    500.0
}

const fn default_dwell_probability() -> f64 {
    0.15
}

const fn default_dwell_min_minutes() -> i64 {
    30
}

const fn default_dwell_max_minutes() -> i64 {
    360
}

const fn default_ping_interval_minutes() -> i64 {
    15
}

const fn default_door_probability() -> f64 {
    0.3
}

const fn default_fault_threshold() -> u32 {
    3
}

const fn default_report_delay_min_secs() -> i64 {
    30
}

const fn default_report_delay_max_secs() -> i64 {
    600
}

const fn default_queue_capacity() -> usize {
    1024
}

const fn default_alert_store_capacity() -> usize {
    10_000
}
