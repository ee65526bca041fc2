//! Canonical driver version strings.
//!
//! The installed driver reports a Windows-style version such as
//! `31.0.15.1694`, while the catalog shows the marketing version
//! `516.94 WHQL`. Both reduce to the fixed `MMM.mm` form, which is what
//! gets compared.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{DriverCheckError, Result};

/// Number of digits that make up a canonical version.
const CANONICAL_DIGITS: usize = 5;

/// Length of a canonical version including the separator.
const CANONICAL_LEN: usize = 6;

static CANONICAL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}\.\d{2}$").expect("valid canonical version regex"));

/// A driver version in `MMM.mm` form.
///
/// Only equality is defined. Two versions that differ are just different;
/// nothing here says which one is newer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalVersion(String);

impl CanonicalVersion {
    /// Canonicalize a raw installed-driver version.
    ///
    /// All `.` separators are removed and the last five digits are split
    /// 3/2: `31.0.15.1694` becomes `516.94`. Already canonical input maps
    /// to itself.
    pub fn from_driver_version(raw: &str) -> Result<Self> {
        let digits: String = raw.chars().filter(|c| *c != '.').collect();

        if digits.len() < CANONICAL_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DriverCheckError::MalformedVersionString {
                value: raw.to_string(),
            });
        }

        let len = digits.len();
        Ok(Self(format!(
            "{}.{}",
            &digits[len - 5..len - 2],
            &digits[len - 2..]
        )))
    }

    /// Canonicalize the version text shown in the catalog.
    ///
    /// The catalog prints the canonical form first, optionally followed by
    /// a label such as `WHQL`, so the first six characters are taken.
    pub fn from_catalog_text(text: &str) -> Result<Self> {
        let prefix: String = text.trim().chars().take(CANONICAL_LEN).collect();

        if !CANONICAL_SHAPE.is_match(&prefix) {
            return Err(DriverCheckError::MalformedVersionString {
                value: text.to_string(),
            });
        }

        Ok(Self(prefix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_version_takes_last_five_digits() {
        let v = CanonicalVersion::from_driver_version("31.0.15.1694").unwrap();
        assert_eq!(v.as_str(), "516.94");
    }

    #[test]
    fn driver_version_with_leading_zero_minor() {
        let v = CanonicalVersion::from_driver_version("31.0.15.2802").unwrap();
        assert_eq!(v.as_str(), "528.02");
    }

    #[test]
    fn canonical_input_is_unchanged() {
        let v = CanonicalVersion::from_driver_version("516.94").unwrap();
        assert_eq!(v.as_str(), "516.94");
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let once = CanonicalVersion::from_driver_version("30.0.14.7141").unwrap();
        let twice = CanonicalVersion::from_driver_version(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn short_digit_run_is_rejected() {
        let err = CanonicalVersion::from_driver_version("528.2").unwrap_err();
        assert!(matches!(
            err,
            DriverCheckError::MalformedVersionString { value } if value == "528.2"
        ));
    }

    #[test]
    fn non_digit_driver_version_is_rejected() {
        assert!(CanonicalVersion::from_driver_version("31.0.15.abcd").is_err());
        assert!(CanonicalVersion::from_driver_version("").is_err());
    }

    #[test]
    fn catalog_text_drops_trailing_label() {
        let v = CanonicalVersion::from_catalog_text("  528.02 WHQL \n").unwrap();
        assert_eq!(v.as_str(), "528.02");
    }

    #[test]
    fn catalog_text_without_label() {
        let v = CanonicalVersion::from_catalog_text("516.94").unwrap();
        assert_eq!(v.as_str(), "516.94");
    }

    #[test]
    fn catalog_text_too_short_is_rejected() {
        assert!(CanonicalVersion::from_catalog_text("516.9").is_err());
    }

    #[test]
    fn catalog_text_wrong_shape_is_rejected() {
        assert!(CanonicalVersion::from_catalog_text("Version 516.94").is_err());
    }

    #[test]
    fn display_matches_inner_string() {
        let v = CanonicalVersion::from_catalog_text("531.41 WHQL").unwrap();
        assert_eq!(v.to_string(), "531.41");
    }

    #[test]
    fn serializes_as_plain_string() {
        let v = CanonicalVersion::from_catalog_text("531.41").unwrap();
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"531.41\"");
    }
}
