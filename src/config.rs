use std::path::PathBuf;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use clap::Parser;
use std::fs;
use tracing::{info, warn};

use crate::models::DEFAULT_TARGET_PERCENTAGE;

/// Configuration for the attendance server and CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Port the server listens on
    pub port: u16,
    /// Quiet window before a grid edit is written, in milliseconds
    pub persist_debounce_ms: u64,
    /// Target used by goal projections when a request does not name one
    pub default_target_percentage: f64,
    /// Base URL the CLI talks to
    pub server_url: String,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub persist_debounce_ms: Option<u64>,
    #[serde(default)]
    pub default_target_percentage: Option<f64>,
    #[serde(default)]
    pub server_url: Option<String>,
}

/// Command line arguments for the server
#[derive(Parser, Debug)]
#[clap(name = "attendance", about = "Attendance tracking server")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Port to listen on
    #[clap(long, env = "ATTENDANCE_PORT")]
    pub port: Option<u16>,

    /// Debounce window for timetable writes, in milliseconds
    #[clap(long, env = "ATTENDANCE_PERSIST_DEBOUNCE_MS")]
    pub persist_debounce_ms: Option<u64>,

    /// Default target attendance percentage
    #[clap(long, env = "ATTENDANCE_TARGET")]
    pub default_target_percentage: Option<f64>,

    /// Debug mode
    #[clap(long, env = "ATTENDANCE_DEBUG", default_value_t = false)]
    pub debug: bool,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            port: update.port.unwrap_or(self.port),
            persist_debounce_ms: update.persist_debounce_ms.unwrap_or(self.persist_debounce_ms),
            default_target_percentage: update
                .default_target_percentage
                .filter(|target| (0.0..=100.0).contains(target))
                .unwrap_or(self.default_target_percentage),
            server_url: update.server_url.unwrap_or(self.server_url),
        }
    }

    /// Returns the debounce window as a Duration
    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }
}

/// Returns the XDG config directory, if it exists
pub fn get_config_dir_path() -> Option<PathBuf> {
    let path = match ProjectDirs::from("com", "attendance", "attendance") {
        Some(proj_dirs) => PathBuf::from(proj_dirs.config_dir()),
        None => {
            warn!("Could not determine XDG config directory, skipping config file");
            return None;
        }
    };

    if !path.exists() {
        info!("Config path not found at {:?}, using defaults", path);
        return None;
    }
    Some(path)
}

/// Returns the base (default) configuration
pub fn base_config(config_path: Option<PathBuf>) -> Config {
    let database_url = config_path.map_or("attendance.db".to_string(), |path| {
        path.join("attendance.db").to_string_lossy().to_string()
    });

    Config {
        database_url,
        port: 3000,
        persist_debounce_ms: 500,
        default_target_percentage: DEFAULT_TARGET_PERCENTAGE,
        server_url: "http://localhost:3000".to_string(),
    }
}

/// Loads configuration from a TOML file
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<ConfigUpdate>(&content) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                Ok(config)
            },
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                Err(format!("Failed to parse config file: {}", e))
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            Err(format!("Failed to read config file: {}", e))
        }
    }
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url,
        port: args.port,
        persist_debounce_ms: args.persist_debounce_ms,
        default_target_percentage: args.default_target_percentage,
        server_url: None,
    }
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
pub fn get_config(args: CliArgs) -> Config {
    let config_path = get_config_dir_path();

    let base = base_config(config_path.clone());
    let file_path = config_path.map(|path| path.join("config.toml"));

    // Apply updates in order of increasing precedence
    let config = base
        .apply_update(config_from_file(file_path).unwrap_or_default())
        .apply_update(config_from_args(args));

    info!(
        "Final configuration: database_url={}, port={}, debounce={}ms, target={}%",
        config.database_url, config.port, config.persist_debounce_ms, config.default_target_percentage
    );

    config
}
