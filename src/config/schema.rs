//! Configuration schema types
//!
//! This module defines the configuration structure for Quire.

use crate::config::SecretString;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main Quire configuration
///
/// This is the root configuration structure that maps to the TOML file. It
/// is built once at startup and handed to every component that needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuireConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export output settings
    pub export: ExportConfig,

    /// Backing corpus settings
    pub corpus: CorpusConfig,

    /// Calendar generation settings
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// CDN cache invalidation settings
    #[serde(default)]
    pub cdn: CdnConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl QuireConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        self.corpus.validate()?;
        self.calendar.validate()?;
        self.cdn.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Export output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Base directory of the output area; artifacts go under `{export_path}/{schema_version}`
    pub export_path: String,

    /// Bundle format version, part of every published path
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Write minified JSON instead of 4-space indented JSON
    #[serde(default)]
    pub minify_json: bool,

    /// Number of works exported concurrently
    #[serde(default = "default_parallel_works")]
    pub parallel_works: usize,

    /// Pre-release bundle directories that receive catalog artifacts only
    #[serde(default)]
    pub sources_paths: Vec<String>,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.export_path.trim().is_empty() {
            return Err("export.export_path cannot be empty".to_string());
        }

        if self.schema_version == 0 {
            return Err("export.schema_version must be > 0".to_string());
        }

        if self.parallel_works == 0 || self.parallel_works > 64 {
            return Err(format!(
                "export.parallel_works must be between 1 and 64, got {}",
                self.parallel_works
            ));
        }

        if self.sources_paths.iter().any(|p| p.trim().is_empty()) {
            return Err("export.sources_paths cannot contain empty paths".to_string());
        }

        Ok(())
    }

    /// Versioned output root, `{export_path}/{schema_version}`
    pub fn output_root(&self) -> PathBuf {
        PathBuf::from(&self.export_path).join(self.schema_version.to_string())
    }
}

/// Backing corpus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Path of the JSON corpus snapshot
    pub snapshot_path: String,
}

impl CorpusConfig {
    fn validate(&self) -> Result<(), String> {
        if self.snapshot_path.trim().is_empty() {
            return Err("corpus.snapshot_path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Calendar generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Number of days after yesterday covered by the calendar
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
}

impl CalendarConfig {
    fn validate(&self) -> Result<(), String> {
        if self.horizon_days == 0 || self.horizon_days > 3650 {
            return Err(format!(
                "calendar.horizon_days must be between 1 and 3650, got {}",
                self.horizon_days
            ));
        }
        Ok(())
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
        }
    }
}

/// CDN cache invalidation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdnConfig {
    /// Send purge requests after every watermark write
    #[serde(default)]
    pub enabled: bool,

    /// Public URL prefix under which the output area is served
    #[serde(default)]
    pub public_base_url: String,

    /// Base URL of the purge API
    #[serde(default = "default_cdn_api_base_url")]
    pub api_base_url: String,

    /// Zone whose cache is purged
    #[serde(default)]
    pub zone_id: Option<String>,

    /// Account email sent with every purge request
    #[serde(default)]
    pub email: Option<String>,

    /// API key, stored securely in memory and zeroized on drop
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_cdn_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl CdnConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == 0 {
            return Err("cdn.timeout_seconds must be > 0".to_string());
        }

        if !self.enabled {
            return Ok(());
        }

        url::Url::parse(&self.public_base_url).map_err(|e| {
            format!(
                "Invalid cdn.public_base_url '{}': {}",
                self.public_base_url, e
            )
        })?;
        url::Url::parse(&self.api_base_url)
            .map_err(|e| format!("Invalid cdn.api_base_url '{}': {}", self.api_base_url, e))?;

        if self.zone_id.as_deref().map_or(true, |z| z.trim().is_empty()) {
            return Err("CDN purge enabled but cdn.zone_id not provided".to_string());
        }
        if self.email.as_deref().map_or(true, |e| e.trim().is_empty()) {
            return Err("CDN purge enabled but cdn.email not provided".to_string());
        }
        match &self.token {
            Some(token) if !token.expose_secret().is_empty() => {}
            _ => return Err("CDN purge enabled but cdn.token not provided".to_string()),
        }

        Ok(())
    }
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            public_base_url: String::new(),
            api_base_url: default_cdn_api_base_url(),
            zone_id: None,
            email: None,
            token: None,
            timeout_seconds: default_cdn_timeout_seconds(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".to_string());
        }

        Ok(())
    }

    /// Console-only logging, used before the configuration file is known
    pub fn console_only() -> Self {
        Self {
            local_enabled: false,
            ..Default::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_schema_version() -> u32 {
    4
}

fn default_parallel_works() -> usize {
    4
}

fn default_horizon_days() -> u32 {
    1000
}

fn default_cdn_api_base_url() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

fn default_cdn_timeout_seconds() -> u64 {
    30
}

fn default_local_path() -> String {
    "/var/log/quire".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn export_config() -> ExportConfig {
        ExportConfig {
            export_path: "/tmp/export".to_string(),
            schema_version: 4,
            minify_json: false,
            parallel_works: 4,
            sources_paths: vec![],
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_export_config_validation() {
        let mut config = export_config();
        assert!(config.validate().is_ok());

        config.parallel_works = 0;
        assert!(config.validate().is_err());

        config.parallel_works = 65;
        assert!(config.validate().is_err());

        config.parallel_works = 8;
        config.schema_version = 0;
        assert!(config.validate().is_err());

        config.schema_version = 4;
        config.sources_paths = vec!["  ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_root_includes_schema_version() {
        let config = export_config();
        assert_eq!(config.output_root(), PathBuf::from("/tmp/export/4"));
    }

    #[test]
    fn test_calendar_config_validation() {
        assert!(CalendarConfig::default().validate().is_ok());
        assert!(CalendarConfig { horizon_days: 0 }.validate().is_err());
    }

    #[test]
    fn test_cdn_config_disabled_needs_nothing() {
        assert!(CdnConfig::default().validate().is_ok());
    }

    #[test]
    fn test_cdn_config_enabled_requires_credentials() {
        let mut config = CdnConfig {
            enabled: true,
            public_base_url: "https://cdn.example.com/static/ios-export".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.zone_id = Some("zone".to_string());
        config.email = Some("ops@example.com".to_string());
        assert!(config.validate().unwrap_err().contains("cdn.token"));

        config.token = Some(secret_string("key".to_string()));
        assert!(config.validate().is_ok());

        config.public_base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());

        let console = LoggingConfig::console_only();
        assert!(!console.local_enabled);
    }
}
