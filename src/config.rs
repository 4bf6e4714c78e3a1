//! Runtime configuration.
//!
//! Settings come from a JSON file (the path in `HOSPITAL_DESK_CONFIG`, else
//! `hospital-desk.json` in the working directory when it exists) and fall back
//! to defaults field by field. `HOSPITAL_DESK_DB` overrides the database path.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "HOSPITAL_DESK_CONFIG";
pub const DB_ENV: &str = "HOSPITAL_DESK_DB";
const DEFAULT_CONFIG_FILE: &str = "hospital-desk.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Answers rejected before a prompt gives up.
    pub max_attempts: u32,
    /// Bcrypt hash of the admin password. Unset means the default password.
    pub admin_password_hash: Option<String>,
    /// Populate an empty `rooms` table on start-up.
    pub seed_rooms: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("hospital.db"),
            max_attempts: 5,
            admin_password_hash: None,
            seed_rooms: true,
        }
    }
}

impl Config {
    /// Loads configuration from the environment and the optional config file.
    pub fn load() -> Result<Self> {
        Self::load_with_fallback(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Like [`Config::load`], reading `fallback` when `HOSPITAL_DESK_CONFIG`
    /// is unset.
    fn load_with_fallback(fallback: &Path) -> Result<Self> {
        let mut config = match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None if fallback.exists() => Self::from_file(fallback)?,
            None => Self::default(),
        };

        if let Some(db) = env::var_os(DB_ENV) {
            config.database_path = PathBuf::from(db);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            bail!("max_attempts must be at least 1");
        }
        Ok(())
    }
}
