//! Settings file loading.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DriverCheckError, Result};
use crate::inventory::{DeviceFilter, DEFAULT_DEVICE_FILTER};

/// Default catalog origin.
pub const DEFAULT_ORIGIN: &str = "https://www.nvidia.com";

/// Default driver-lookup endpoint path.
pub const DEFAULT_ENDPOINT: &str = "/Download/processDriver.aspx";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Tunable parts of a driver check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Scheme and host of the catalog, also used to resolve download links.
    pub origin: String,
    /// Path of the driver-lookup endpoint.
    pub endpoint: String,
    /// Device name pattern in WQL `LIKE` syntax.
    pub device_filter: String,
    /// Catalog request timeout.
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            device_filter: DEFAULT_DEVICE_FILTER.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Values given on the command line or in the environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub origin: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Load settings from an optional YAML file, then apply overrides.
    ///
    /// Without a file the built-in defaults are used.
    pub fn load(path: Option<&Path>, overrides: &SettingsOverrides) -> Result<Self> {
        let settings = match path {
            Some(path) => Self::load_file(path)?,
            None => Self::default(),
        };
        let settings = settings.with_overrides(overrides);
        settings.validate(path.unwrap_or_else(|| Path::new("<defaults>")))?;
        Ok(settings)
    }

    /// Read and parse a settings file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| DriverCheckError::SettingsError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    /// Parse YAML settings. An empty document yields the defaults.
    pub fn parse(content: &str, source_path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| DriverCheckError::SettingsError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Self {
        if let Some(origin) = &overrides.origin {
            self.origin = origin.clone();
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        self
    }

    fn validate(&self, source_path: &Path) -> Result<()> {
        let invalid = |message: String| DriverCheckError::SettingsError {
            path: source_path.to_path_buf(),
            message,
        };

        if !(self.origin.starts_with("https://") || self.origin.starts_with("http://")) {
            return Err(invalid(format!(
                "origin must be an http(s) URL, got '{}'",
                self.origin
            )));
        }
        if !self.endpoint.starts_with('/') {
            return Err(invalid(format!(
                "endpoint must start with '/', got '{}'",
                self.endpoint
            )));
        }
        if self.device_filter.is_empty() {
            return Err(invalid("device_filter must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn device_filter(&self) -> DeviceFilter {
        DeviceFilter::new(self.device_filter.clone())
    }
}
