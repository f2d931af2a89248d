use std::path::PathBuf;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use clap::Parser;
use std::fs;
use tracing::{info, warn};
use toml;

/// Configuration for the front-desk server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Address (host:port) the HTTP server binds to
    pub bind_address: String,
    /// How long a login session stays valid, in minutes
    pub session_ttl_minutes: u64,
    /// Password given to the bootstrap admin user when the users table is empty
    pub bootstrap_admin_password: String,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    /// Optional update for database URL
    #[serde(default)]
    pub database_url: Option<String>,
    /// Optional update for the bind address
    #[serde(default)]
    pub bind_address: Option<String>,
    /// Optional update for the session TTL (in minutes)
    #[serde(default)]
    pub session_ttl_minutes: Option<u64>,
    /// Optional update for the bootstrap admin password
    #[serde(default)]
    pub bootstrap_admin_password: Option<String>,
}

/// Command line arguments for the application
#[derive(Parser, Debug)]
#[clap(name = "frontdesk", about = "A hotel front-desk API server")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address the HTTP server binds to
    #[clap(long, env = "FRONTDESK_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Session TTL in minutes
    #[clap(long, env = "FRONTDESK_SESSION_TTL_MINUTES")]
    pub session_ttl_minutes: Option<u64>,

    /// Password for the bootstrap admin user
    #[clap(long, env = "FRONTDESK_BOOTSTRAP_ADMIN_PASSWORD")]
    pub bootstrap_admin_password: Option<String>,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            bind_address: update.bind_address.unwrap_or(self.bind_address),
            session_ttl_minutes: update.session_ttl_minutes.unwrap_or(self.session_ttl_minutes),
            bootstrap_admin_password: update.bootstrap_admin_password.unwrap_or(self.bootstrap_admin_password),
        }
    }

    /// Returns the session TTL as a Duration
    pub fn session_ttl(&self) -> Duration {
        Duration::minutes(self.session_ttl_minutes as i64)
    }
}

/// Returns the base (default) configuration
pub fn base_config(config_path: Option<PathBuf>) -> Config {

    let database_url = config_path.map_or("frontdesk.db".to_string(), |path| path.join("frontdesk.db").to_string_lossy().to_string());

    Config {
        database_url,
        bind_address: "127.0.0.1:3000".to_string(),
        session_ttl_minutes: 12 * 60,
        bootstrap_admin_password: "admin".to_string(),
    }
}

/// Loads configuration from a TOML file
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    // if the config path is None, return the default config
    if config_path.is_none() {
        return Ok(ConfigUpdate::default());
    }

    let config_path = config_path.unwrap();

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
        bind_address: args.bind_address,
        session_ttl_minutes: args.session_ttl_minutes,
        bootstrap_admin_password: args.bootstrap_admin_password,
    }
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
pub fn get_config(args: CliArgs) -> Config {
    let mut config_path = match ProjectDirs::from("com", "frontdesk", "frontdesk") {
        Some(proj_dirs) => {
            let config_dir = proj_dirs.config_dir();
            let path = PathBuf::from(config_dir);
            Some(path)
        }
        None => {
            warn!("Could not determine XDG config directory, skipping config file");
            None
        }
    };

    config_path = config_path.and_then(|path| {
        if !path.exists() {
            info!("Config path not found at {:?}, using defaults", path);
            None
        } else {
            Some(path)
        }
    });

    let base = base_config(config_path.clone());

    // Apply updates in order of increasing precedence
    let config = base
        .apply_update(config_from_file(config_path.map(|p| p.join("config.toml"))).unwrap_or_default())
        .apply_update(config_from_args(args));

    info!("Final configuration: database_url={}, bind_address={}, session_ttl={}min",
          config.database_url, config.bind_address, config.session_ttl_minutes);

    config
}
