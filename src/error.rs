//! Error types for driver check operations.
//!
//! This module defines [`DriverCheckError`], the error type returned by every
//! pipeline stage, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Each stage returns its own variant; nothing is recovered locally
//! - Use `anyhow::Error` (via `DriverCheckError::Other`) for unexpected errors
//! - Only `main` turns an error into an exit code and a message

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for driver check operations.
#[derive(Debug, Error)]
pub enum DriverCheckError {
    /// The host OS or Windows release has no entry in the catalog's OS table.
    #[error("Unsupported platform: {detail}")]
    UnsupportedPlatform { detail: String },

    /// A registry key could not be opened or a required value could not be read.
    #[error("Registry access failed for {key}: {message}")]
    RegistryAccessError { key: String, message: String },

    /// The device inventory returned no matching graphics device.
    #[error("No devices matching '{filter}' found")]
    NoMatchingDevice { filter: String },

    /// Matching devices report different driver versions.
    #[error("Driver version mismatch: {found} - {expected}")]
    VersionMismatch { expected: String, found: String },

    /// The device inventory query itself failed.
    #[error("Device inventory query failed: {message}")]
    InventoryQueryError { message: String },

    /// The catalog request failed in transport or returned an error status.
    #[error("Network error fetching {url}: {message}")]
    NetworkError { url: String, message: String },

    /// The catalog page lacks the version cell or the download link.
    #[error("Malformed catalog response: {message}")]
    MalformedCatalogResponse { message: String },

    /// A version string could not be reduced to the `MMM.mm` form.
    #[error("Malformed version string: '{value}'")]
    MalformedVersionString { value: String },

    /// The default browser could not be launched.
    #[error("Failed to open {url} in default browser: {message}")]
    BrowserLaunchError { url: String, message: String },

    /// The settings file could not be read or parsed.
    #[error("Failed to load settings from {path}: {message}")]
    SettingsError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for driver check operations.
pub type Result<T> = std::result::Result<T, DriverCheckError>;
