//! Configuration management for Quire.
//!
//! Quire uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `QUIRE_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`ExportConfig`] - Output area, schema version, JSON style, parallelism
//! - [`CorpusConfig`] - Location of the corpus snapshot
//! - [`CalendarConfig`] - Calendar horizon
//! - [`CdnConfig`] - Cache purge endpoint and credentials
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [export]
//! export_path = "/srv/static/ios-export"
//! schema_version = 4
//! parallel_works = 8
//!
//! [corpus]
//! snapshot_path = "/srv/data/corpus.json"
//!
//! [cdn]
//! enabled = true
//! public_base_url = "https://static.example.org/ios-export"
//! zone_id = "${QUIRE_CDN_ZONE}"
//! email = "ops@example.org"
//! token = "${QUIRE_CDN_KEY}"
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use quire::config::load_config;
//!
//! # fn example() {
//! match load_config("quire.toml") {
//!     Ok(config) => println!("Exporting to {}", config.export.output_root().display()),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, CalendarConfig, CdnConfig, CorpusConfig, ExportConfig, LoggingConfig,
    QuireConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
