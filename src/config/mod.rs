use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_BATCH_LIMIT;
use crate::domain::{GeoPoint, TravelMode};

/// Built-in defaults shared by the CLI and the config file
pub mod defaults {
    use crate::domain::GeoPoint;

    /// Lattice points per side of the sampling grid
    pub const GRID_SIZE: usize = 20;
    /// Oracle batches allowed in flight at once for one computation
    pub const MAX_CONCURRENT_BATCHES: usize = 4;
    pub const MAX_MINUTES: f64 = 15.0;
    pub const POI_RADIUS_M: u32 = 1500;
    pub const TIMEOUT_SECS: u64 = 30;
    pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";
    pub const MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
    /// San Francisco
    pub const CENTER: GeoPoint = GeoPoint::new(37.7749, -122.4194);
}

fn default_mode() -> TravelMode {
    TravelMode::Walking
}
fn default_minutes() -> f64 {
    defaults::MAX_MINUTES
}
fn default_grid_size() -> usize {
    defaults::GRID_SIZE
}
fn default_max_concurrent_batches() -> usize {
    defaults::MAX_CONCURRENT_BATCHES
}
fn default_poi_radius() -> u32 {
    defaults::POI_RADIUS_M
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default = "default_mode")]
    pub mode: TravelMode,
    #[serde(default = "default_minutes")]
    pub minutes: f64,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    #[serde(default = "default_max_concurrent_batches")]
    pub max_concurrent_batches: usize,
    #[serde(default = "default_poi_radius")]
    pub poi_radius_m: u32,
    #[serde(default)]
    pub speeds: SpeedConfig,
    #[serde(default)]
    pub maps: Option<MapsApiConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            lat: None,
            lng: None,
            place: None,
            mode: default_mode(),
            minutes: default_minutes(),
            output: None,
            verbose: false,
            grid_size: default_grid_size(),
            max_concurrent_batches: default_max_concurrent_batches(),
            poi_radius_m: default_poi_radius(),
            speeds: SpeedConfig::default(),
            maps: None,
        }
    }
}

/// Rough travel speeds in meters per hour, one per mode
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct SpeedConfig {
    #[serde(default = "SpeedConfig::default_walking")]
    pub walking: f64,
    #[serde(default = "SpeedConfig::default_bicycling")]
    pub bicycling: f64,
    #[serde(default = "SpeedConfig::default_running")]
    pub running: f64,
}

impl SpeedConfig {
    fn default_walking() -> f64 {
        TravelMode::Walking.default_speed_m_per_hour()
    }
    fn default_bicycling() -> f64 {
        TravelMode::Bicycling.default_speed_m_per_hour()
    }
    fn default_running() -> f64 {
        TravelMode::Running.default_speed_m_per_hour()
    }

    pub fn speed_for(&self, mode: TravelMode) -> f64 {
        match mode {
            TravelMode::Walking => self.walking,
            TravelMode::Bicycling => self.bicycling,
            TravelMode::Running => self.running,
        }
    }
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            walking: Self::default_walking(),
            bicycling: Self::default_bicycling(),
            running: Self::default_running(),
        }
    }
}

fn default_api_key_env() -> String {
    defaults::API_KEY_ENV.to_string()
}
fn default_base_url() -> String {
    defaults::MAPS_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    defaults::TIMEOUT_SECS
}
fn default_batch_limit() -> usize {
    DEFAULT_BATCH_LIMIT
}

/// Web mapping service settings
#[derive(Debug, Deserialize, Clone)]
pub struct MapsApiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is unset
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Destinations per distance-matrix call
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,
}

impl Default for MapsApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            batch_limit: default_batch_limit(),
        }
    }
}

impl MapsApiConfig {
    /// Configured key, else the environment variable; blank values count as unset
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

impl FileConfig {
    /// First parseable config file from the search paths, if any
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.lat?, self.lng?))
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("isochrone-explorer.toml"));
    paths.push(PathBuf::from(".isochrone-explorer.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("isochrone-explorer").join("config.toml"));
        paths.push(config_dir.join("isochrone-explorer.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".isochrone-explorer.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.mode, TravelMode::Walking);
        assert_eq!(config.minutes, 15.0);
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.max_concurrent_batches, 4);
        assert_eq!(config.speeds, SpeedConfig::default());
        assert!(config.origin().is_none());
        assert!(config.maps.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            lat = 40.7128
            lng = -74.0060
            mode = "bicycling"
            minutes = 20
            grid_size = 16

            [speeds]
            bicycling = 18000

            [maps]
            api_key = "abc"
            batch_limit = 10
        "#;
        let config: FileConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.origin(), Some(GeoPoint::new(40.7128, -74.0060)));
        assert_eq!(config.mode, TravelMode::Bicycling);
        assert_eq!(config.minutes, 20.0);
        assert_eq!(config.grid_size, 16);
        assert_eq!(config.speeds.speed_for(TravelMode::Bicycling), 18000.0);
        assert_eq!(config.speeds.speed_for(TravelMode::Walking), 5000.0);

        let maps = config.maps.unwrap();
        assert_eq!(maps.batch_limit, 10);
        assert_eq!(maps.timeout_secs, 30);
        assert_eq!(maps.resolve_api_key().as_deref(), Some("abc"));
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let maps = MapsApiConfig {
            api_key: Some("  ".to_string()),
            ..MapsApiConfig::default()
        };
        assert!(maps.resolve_api_key().is_none());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mode = \"running\"\nminutes = 30").unwrap();

        let config = FileConfig::from_path(file.path()).unwrap();
        assert_eq!(config.mode, TravelMode::Running);
        assert_eq!(config.minutes, 30.0);

        assert!(FileConfig::from_path(Path::new("/nonexistent/isochrone.toml")).is_err());
    }
}
