// ABOUTME: Configuration management for the automation helpers
// ABOUTME: Named database profiles and formatting defaults in a JSON file

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::strings::DEFAULT_RANDOM_LENGTH;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Config directory not found")]
    NoDirFound,
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),
    #[error("Cannot remove the last profile")]
    LastProfile,
}

/// Which engine a profile points at
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    Sqlite,
    SqlServer,
}

/// A named database target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionProfile {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub db_type: DatabaseType,
    /// SQLite database file
    #[serde(default)]
    pub path: Option<String>,
    /// ADO.NET connection string; takes precedence over host/port/credentials
    #[serde(default)]
    pub connection_string: Option<String>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default = "default_true")]
    pub trust_certificate: bool,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    1433
}

fn default_true() -> bool {
    true
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            db_type: DatabaseType::Sqlite,
            path: Some("test.db".to_string()),
            connection_string: None,
            host: default_host(),
            port: default_port(),
            username: "sa".to_string(),
            password: String::new(),
            database: None,
            trust_certificate: true,
        }
    }
}

/// Formatting defaults used when a command does not pass its own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default = "default_random_length")]
    pub random_length: usize,
}

fn default_date_format() -> String {
    crate::datetime::DEFAULT_DATE_FORMAT.to_string()
}

fn default_timestamp_format() -> String {
    crate::datetime::DEFAULT_TIMESTAMP_FORMAT.to_string()
}

fn default_random_length() -> usize {
    DEFAULT_RANDOM_LENGTH
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            timestamp_format: default_timestamp_format(),
            random_length: default_random_length(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_active_profile")]
    pub active_profile: String,
    #[serde(default)]
    pub profiles: HashMap<String, ConnectionProfile>,
    #[serde(default)]
    pub preferences: Preferences,
}

fn default_version() -> u32 {
    1
}

fn default_active_profile() -> String {
    "default".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert("default".to_string(), ConnectionProfile::default());

        Self {
            version: 1,
            active_profile: "default".to_string(),
            profiles,
            preferences: Preferences::default(),
        }
    }
}

impl AppConfig {
    /// Get the config file path based on OS
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoDirFound)?;
        let app_dir = config_dir.join("Automation Kit");
        Ok(app_dir.join("config.json"))
    }

    /// Load config from the default location, creating it if missing
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from a file, or write and return the default if it does not exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("Creating default config at {}", path.display());
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the active connection profile
    pub fn active_profile(&self) -> Result<&ConnectionProfile, ConfigError> {
        self.profile(&self.active_profile)
    }

    pub fn profile(&self, key: &str) -> Result<&ConnectionProfile, ConfigError> {
        self.profiles
            .get(key)
            .ok_or_else(|| ConfigError::ProfileNotFound(key.to_string()))
    }

    /// Add or update a profile
    pub fn set_profile(&mut self, key: String, profile: ConnectionProfile) {
        self.profiles.insert(key, profile);
    }

    /// Remove a profile (cannot remove if it's the only one)
    pub fn remove_profile(&mut self, key: &str) -> Result<(), ConfigError> {
        if !self.profiles.contains_key(key) {
            return Err(ConfigError::ProfileNotFound(key.to_string()));
        }
        if self.profiles.len() <= 1 {
            return Err(ConfigError::LastProfile);
        }
        self.profiles.remove(key);

        // Removed the active one: fall back to the first remaining key in sorted order
        if self.active_profile == key {
            if let Some(first_key) = self.profiles.keys().min() {
                self.active_profile = first_key.clone();
            }
        }
        Ok(())
    }

    /// Copy for display, with passwords masked in every profile
    pub fn redacted(&self) -> AppConfig {
        let mut config = self.clone();
        for profile in config.profiles.values_mut() {
            if !profile.password.is_empty() {
                profile.password = MASK.to_string();
            }
            if let Some(conn) = profile.connection_string.as_mut() {
                *conn = redact_connection_string(conn);
            }
        }
        config
    }
}

const MASK: &str = "********";

/// Mask the `password` / `pwd` value of an ADO.NET connection string
fn redact_connection_string(conn: &str) -> String {
    conn.split(';')
        .map(|part| match part.split_once('=') {
            Some((key, _))
                if matches!(key.trim().to_ascii_lowercase().as_str(), "password" | "pwd") =>
            {
                format!("{}={}", key, MASK)
            }
            _ => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join(";")
}
