//! Configuration file discovery and logging bootstrap
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. User config directory (`~/.config/tapedeck/config.toml` on Linux)
//! 4. System config (`/etc/tapedeck/config.toml`, Unix only)
//!
//! No file at all is not an error: callers fall back to built-in defaults.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "TAPEDECK_CONFIG";

/// Logging configuration (`[logging]` section)
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level or full filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Locate the config file to load, if any
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: user config directory
    if let Some(path) = dirs::config_dir().map(|d| d.join("tapedeck").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }

    // Priority 4: system-wide config
    if cfg!(unix) {
        let system = PathBuf::from("/etc/tapedeck/config.toml");
        if system.exists() {
            return Some(system);
        }
    }

    None
}

/// Read and deserialize a TOML file
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    Ok(toml::from_str(&text)?)
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the configured level. `default_directive` is used when neither is
/// usable (e.g. `"tapedeck_player=info"`).
pub fn init_tracing(level: Option<&str>, default_directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| match level {
            Some(level) => tracing_subscriber::EnvFilter::try_new(level),
            None => tracing_subscriber::EnvFilter::try_new(default_directive),
        })
        .unwrap_or_else(|_| default_directive.into());

    // A second init (e.g. in tests) is harmless
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
