use crate::models::{EtaModel, MatchingOptions, ResourceLimits};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub eta: EtaSettings,
    #[serde(default)]
    pub limits: LimitSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_corridor_width")]
    pub default_corridor_width_meters: f64,
    #[serde(default = "default_destination_tolerance")]
    pub default_destination_tolerance_meters: f64,
    #[serde(default = "default_capacity")]
    pub default_capacity: usize,
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_corridor_width_meters: default_corridor_width(),
            default_destination_tolerance_meters: default_destination_tolerance(),
            default_capacity: default_capacity(),
            parallel_threshold: default_parallel_threshold(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

fn default_corridor_width() -> f64 { 1000.0 }
fn default_destination_tolerance() -> f64 { 2000.0 }
fn default_capacity() -> usize { 3 }
fn default_parallel_threshold() -> usize { 64 }
fn default_request_timeout() -> u64 { 2000 }

/// Pickup time model
///
/// When `trip_duration_minutes` is set, pickup times are proportional to
/// route progress over the whole trip; otherwise `average_speed_kmh` is
/// applied to route progress.
#[derive(Debug, Clone, Deserialize)]
pub struct EtaSettings {
    #[serde(default = "default_average_speed")]
    pub average_speed_kmh: f64,
    pub trip_duration_minutes: Option<f64>,
}

impl Default for EtaSettings {
    fn default() -> Self {
        Self {
            average_speed_kmh: default_average_speed(),
            trip_duration_minutes: None,
        }
    }
}

fn default_average_speed() -> f64 { 30.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LimitSettings {
    #[serde(default = "default_max_route_points")]
    pub max_route_points: usize,
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    #[serde(default = "default_max_work_units")]
    pub max_work_units: u64,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_route_points: default_max_route_points(),
            max_candidates: default_max_candidates(),
            max_work_units: default_max_work_units(),
        }
    }
}

fn default_max_route_points() -> usize { 10_000 }
fn default_max_candidates() -> usize { 10_000 }
fn default_max_work_units() -> u64 { 5_000_000 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_route_cache_size")]
    pub route_cache_size: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            route_cache_size: default_route_cache_size(),
        }
    }
}

fn default_route_cache_size() -> usize { 128 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CORRIDOR_)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CORRIDOR__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Parse configuration from a TOML string, without environment overrides
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Engine options derived from these settings
    pub fn matching_options(&self) -> MatchingOptions {
        let default_eta = match self.eta.trip_duration_minutes {
            Some(total_minutes) => EtaModel::TripDuration { total_minutes },
            None => EtaModel::AverageSpeed {
                speed_kmh: self.eta.average_speed_kmh,
            },
        };

        MatchingOptions {
            default_corridor_width_meters: self.matching.default_corridor_width_meters,
            default_destination_tolerance_meters: self.matching.default_destination_tolerance_meters,
            default_capacity: self.matching.default_capacity,
            default_eta,
            limits: ResourceLimits {
                max_route_points: self.limits.max_route_points,
                max_candidates: self.limits.max_candidates,
                max_work_units: self.limits.max_work_units,
            },
            parallel_threshold: self.matching.parallel_threshold,
            request_timeout: Duration::from_millis(self.matching.request_timeout_ms),
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix("CORRIDOR")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
