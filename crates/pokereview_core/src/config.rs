//! Runtime settings read from the process environment.
//!
//! # Responsibility
//! - Resolve database location, logging and seeding switches in one place.
//!
//! # Invariants
//! - Resolution is a pure function of a key lookup; only [`CatalogConfig::from_env`]
//!   touches the real environment.
//! - Unset or blank variables fall back to defaults; malformed values are errors.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "POKEREVIEW_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "POKEREVIEW_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "POKEREVIEW_LOG_DIR";
pub const ENV_SEED: &str = "POKEREVIEW_SEED";

/// Resolved catalog settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// SQLite file; `None` selects an in-memory database.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Rolling log directory; `None` leaves file logging off.
    pub log_dir: Option<PathBuf>,
    /// Write the sample catalog into an empty store on startup.
    pub seed: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            seed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    RelativeLogDir(PathBuf),
    InvalidFlag { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativeLogDir(path) => write!(
                f,
                "{ENV_LOG_DIR} must be an absolute path, got `{}`",
                path.display()
            ),
            Self::InvalidFlag { key, value } => {
                write!(f, "{key} expects 1|true|yes|0|false|no, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

impl CatalogConfig {
    /// Reads settings from `POKEREVIEW_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        config.db_path = read(ENV_DB_PATH).map(PathBuf::from);
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR).map(PathBuf::from) {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir));
            }
            config.log_dir = Some(dir);
        }
        if let Some(flag) = read(ENV_SEED) {
            config.seed = parse_flag(ENV_SEED, &flag)?;
        }
        Ok(config)
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}
