//! drivercheck - is the installed NVIDIA GeForce driver the latest release?
//!
//! A check runs four stages in order and stops at the first failure:
//!
//! 1. [`platform`] derives the catalog's OS, architecture and driver branch
//!    codes from the Windows configuration store.
//! 2. [`inventory`] finds the installed graphics driver and canonicalizes its
//!    version.
//! 3. [`catalog`] asks the vendor's lookup endpoint for the latest release.
//! 4. [`decision`] compares the two versions.
//!
//! [`check::DriverCheck`] wires the stages together. The configuration store,
//! device inventory and catalog are traits, so every stage can run against
//! fakes.
//!
//! # Example
//!
//! ```
//! use drivercheck::version::CanonicalVersion;
//!
//! let installed = CanonicalVersion::from_driver_version("31.0.15.1694").unwrap();
//! let available = CanonicalVersion::from_catalog_text("516.94 WHQL").unwrap();
//! assert_eq!(installed, available);
//! ```

pub mod browser;
pub mod catalog;
pub mod check;
pub mod cli;
pub mod config;
pub mod decision;
pub mod error;
pub mod host;
pub mod inventory;
pub mod platform;
pub mod ui;
pub mod version;

pub use error::{DriverCheckError, Result};
