//! Configuration for a driver check.
//!
//! Settings come from, in increasing priority:
//! 1. Built-in defaults
//! 2. A YAML settings file (`--config` or `DRIVERCHECK_CONFIG`)
//! 3. Command-line flags and their environment variables
//!
//! # Example
//!
//! ```
//! use drivercheck::config::{Settings, SettingsOverrides};
//!
//! let overrides = SettingsOverrides {
//!     origin: Some("http://127.0.0.1:8080".to_string()),
//!     timeout_secs: None,
//! };
//! let settings = Settings::load(None, &overrides).unwrap();
//! assert_eq!(settings.origin, "http://127.0.0.1:8080");
//! assert_eq!(settings.timeout_secs, 30);
//! ```

pub mod settings;

pub use settings::{
    Settings, SettingsOverrides, DEFAULT_ENDPOINT, DEFAULT_ORIGIN, DEFAULT_TIMEOUT_SECS,
};
