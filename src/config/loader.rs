//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::QuireConfig;
use super::secret::secret_string;
use crate::domain::errors::QuireError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into `QuireConfig`
/// 4. Applies environment variable overrides (`QUIRE_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a [`QuireError::Configuration`] if the file cannot be read or
/// parsed, a referenced variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use quire::config::loader::load_config;
///
/// let config = load_config("quire.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<QuireConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(QuireError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        QuireError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: QuireConfig = toml::from_str(&contents)
        .map_err(|e| QuireError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        QuireError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are passed through untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| QuireError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(QuireError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using the `QUIRE_*` prefix
///
/// Environment variables follow the pattern `QUIRE_<SECTION>_<KEY>`, for
/// example `QUIRE_EXPORT_EXPORT_PATH` or `QUIRE_CDN_TOKEN`. Values that do
/// not parse are ignored.
fn apply_env_overrides(config: &mut QuireConfig) {
    if let Ok(val) = std::env::var("QUIRE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("QUIRE_EXPORT_EXPORT_PATH") {
        config.export.export_path = val;
    }
    if let Ok(val) = std::env::var("QUIRE_EXPORT_SCHEMA_VERSION") {
        if let Ok(version) = val.parse() {
            config.export.schema_version = version;
        }
    }
    if let Ok(val) = std::env::var("QUIRE_EXPORT_MINIFY_JSON") {
        config.export.minify_json = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("QUIRE_EXPORT_PARALLEL_WORKS") {
        if let Ok(parallel) = val.parse() {
            config.export.parallel_works = parallel;
        }
    }
    if let Ok(val) = std::env::var("QUIRE_EXPORT_SOURCES_PATHS") {
        config.export.sources_paths = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Ok(val) = std::env::var("QUIRE_CORPUS_SNAPSHOT_PATH") {
        config.corpus.snapshot_path = val;
    }

    if let Ok(val) = std::env::var("QUIRE_CALENDAR_HORIZON_DAYS") {
        if let Ok(days) = val.parse() {
            config.calendar.horizon_days = days;
        }
    }

    if let Ok(val) = std::env::var("QUIRE_CDN_ENABLED") {
        config.cdn.enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("QUIRE_CDN_PUBLIC_BASE_URL") {
        config.cdn.public_base_url = val;
    }
    if let Ok(val) = std::env::var("QUIRE_CDN_API_BASE_URL") {
        config.cdn.api_base_url = val;
    }
    if let Ok(val) = std::env::var("QUIRE_CDN_ZONE_ID") {
        config.cdn.zone_id = Some(val);
    }
    if let Ok(val) = std::env::var("QUIRE_CDN_EMAIL") {
        config.cdn.email = Some(val);
    }
    if let Ok(val) = std::env::var("QUIRE_CDN_TOKEN") {
        config.cdn.token = Some(secret_string(val));
    }

    if let Ok(val) = std::env::var("QUIRE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("QUIRE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("QUIRE_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}
