//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files, merging
//! configurations with proper precedence rules, and reading `RC_*`
//! environment overrides.

use crate::domain::canonicalize_domain_name;
use crate::error::CheckError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Listener settings for the check endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerSection>,

    /// Check bridge settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<CheckSection>,

    /// Reference engine tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineConfig>,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ServerSection {
    /// Listen address, e.g. "0.0.0.0"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Listen port
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// `[check]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CheckSection {
    /// Registrar client id the endpoint acts as
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Label used for every engine transaction id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trid_label: Option<String>,

    /// Managed zones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<String>>,
}

/// `[engine]` section: tables for the reference engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Registered names and the reason reported for them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered: Option<HashMap<String, String>>,

    /// Reserved names and the reason reported for them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved: Option<HashMap<String, String>>,

    /// Premium names and their fee class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium: Option<HashMap<String, String>>,

    /// Fail every flow with "Command is not implemented"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unimplemented: Option<bool>,
}

/// Configuration discovery and loading functionality.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Whether to log which files were picked up
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The parsed configuration or an error if reading, parsing or
    /// validation fails.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, CheckError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CheckError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            CheckError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;

        // Validate the loaded configuration
        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is lowest, then the global file in `$HOME`, then the local
    /// file in the working directory. Files that fail to load are skipped
    /// with a warning.
    pub fn discover_and_load(&self) -> Result<FileConfig, CheckError> {
        let mut merged_config = FileConfig::default();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    if self.verbose {
                        info!(path = %path.display(), "Loaded configuration file");
                    }
                    merged_config = self.merge_configs(merged_config, config);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping configuration file"),
            }
        }

        Ok(merged_config)
    }

    /// Get the local configuration file path.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./registry-check.toml", "./.registry-check.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Get the global configuration file path in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".registry-check.toml", "registry-check.toml"]
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Get the XDG configuration file path.
    ///
    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("registry-check").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations with proper precedence.
    ///
    /// Values from `higher` take precedence over values from `lower`. Engine
    /// tables merge by name.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            server: match (lower.server, higher.server) {
                (Some(mut lower_server), Some(higher_server)) => {
                    if higher_server.address.is_some() {
                        lower_server.address = higher_server.address;
                    }
                    if higher_server.port.is_some() {
                        lower_server.port = higher_server.port;
                    }
                    Some(lower_server)
                }
                (lower_server, higher_server) => higher_server.or(lower_server),
            },
            check: match (lower.check, higher.check) {
                (Some(mut lower_check), Some(higher_check)) => {
                    if higher_check.client_id.is_some() {
                        lower_check.client_id = higher_check.client_id;
                    }
                    if higher_check.trid_label.is_some() {
                        lower_check.trid_label = higher_check.trid_label;
                    }
                    if higher_check.zones.is_some() {
                        lower_check.zones = higher_check.zones;
                    }
                    Some(lower_check)
                }
                (lower_check, higher_check) => higher_check.or(lower_check),
            },
            engine: match (lower.engine, higher.engine) {
                (Some(lower_engine), Some(higher_engine)) => Some(EngineConfig {
                    registered: merge_tables(lower_engine.registered, higher_engine.registered),
                    reserved: merge_tables(lower_engine.reserved, higher_engine.reserved),
                    premium: merge_tables(lower_engine.premium, higher_engine.premium),
                    unimplemented: higher_engine.unimplemented.or(lower_engine.unimplemented),
                }),
                (lower_engine, higher_engine) => higher_engine.or(lower_engine),
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), CheckError> {
        if let Some(server) = &config.server {
            if server.port == Some(0) {
                return Err(CheckError::config("Port must be between 1 and 65535"));
            }
            if let Some(address) = &server.address {
                if address.parse::<std::net::IpAddr>().is_err() {
                    return Err(CheckError::config(format!(
                        "Invalid listen address '{}'",
                        address
                    )));
                }
            }
        }

        if let Some(check) = &config.check {
            if let Some(client_id) = &check.client_id {
                if client_id.trim().is_empty() {
                    return Err(CheckError::config("Client id cannot be empty"));
                }
            }
            if let Some(label) = &check.trid_label {
                if label.trim().is_empty() {
                    return Err(CheckError::config("Transaction id label cannot be empty"));
                }
            }
            if let Some(zones) = &check.zones {
                validate_zones(zones)?;
            }
        }

        Ok(())
    }
}

/// Check zone names: non-empty, no whitespace, no leading or trailing dot,
/// and valid as a domain name once canonicalized.
pub fn validate_zones(zones: &[String]) -> Result<(), CheckError> {
    if zones.is_empty() {
        return Err(CheckError::config("At least one managed zone is required"));
    }

    for zone in zones {
        if zone.is_empty()
            || zone.chars().any(char::is_whitespace)
            || zone.starts_with('.')
            || zone.ends_with('.')
            || canonicalize_domain_name(zone).is_err()
        {
            return Err(CheckError::config(format!("Invalid zone '{}'", zone)));
        }
    }

    Ok(())
}

fn merge_tables(
    lower: Option<HashMap<String, String>>,
    higher: Option<HashMap<String, String>>,
) -> Option<HashMap<String, String>> {
    match (lower, higher) {
        (Some(mut lower_table), Some(higher_table)) => {
            lower_table.extend(higher_table);
            Some(lower_table)
        }
        (lower_table, higher_table) => higher_table.or(lower_table),
    }
}

/// Environment variable configuration.
///
/// This represents configuration values that can be set via RC_* environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub address: Option<String>,
    pub port: Option<u16>,
    pub client_id: Option<String>,
    pub trid_label: Option<String>,
    pub zones: Option<Vec<String>>,
}

/// Load configuration from environment variables.
///
/// Parses all RC_* environment variables. Invalid values are logged as
/// warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    env_config_from(|key| env::var(key).ok())
}

/// Same as [`load_env_config`] with an explicit variable source.
pub fn env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    // RC_ADDRESS - listen address
    if let Some(address) = lookup("RC_ADDRESS") {
        if address.parse::<std::net::IpAddr>().is_ok() {
            env_config.address = Some(address);
        } else {
            warn!(value = %address, "Ignoring invalid RC_ADDRESS");
        }
    }

    // RC_PORT - listen port
    if let Some(val) = lookup("RC_PORT") {
        match val.parse::<u16>() {
            Ok(port) if port > 0 => env_config.port = Some(port),
            _ => warn!(value = %val, "Ignoring invalid RC_PORT, must be 1-65535"),
        }
    }

    // RC_CLIENT_ID - registrar client id
    if let Some(client_id) = lookup("RC_CLIENT_ID") {
        if !client_id.trim().is_empty() {
            env_config.client_id = Some(client_id.trim().to_string());
        }
    }

    // RC_TRID_LABEL - transaction id label
    if let Some(label) = lookup("RC_TRID_LABEL") {
        if !label.trim().is_empty() {
            env_config.trid_label = Some(label.trim().to_string());
        }
    }

    // RC_ZONES - comma-separated zone list
    if let Some(zone_str) = lookup("RC_ZONES") {
        let zones: Vec<String> = zone_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        match validate_zones(&zones) {
            Ok(()) => env_config.zones = Some(zones),
            Err(e) => warn!(value = %zone_str, error = %e, "Ignoring invalid RC_ZONES"),
        }
    }

    env_config
}
