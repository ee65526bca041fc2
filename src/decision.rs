//! Installed-versus-available decision.

use serde::Serialize;

use crate::catalog::RemoteRelease;
use crate::error::Result;
use crate::inventory::InstalledDriver;
use crate::version::CanonicalVersion;

/// Outcome of comparing the installed driver with the catalog.
///
/// Versions are compared for equality only, so `Outdated` means
/// "different from the catalog", which includes an installed driver that
/// is newer than the listed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Decision {
    /// The installed version is the listed one.
    UpToDate { version: CanonicalVersion },
    /// The listed version differs from the installed one.
    Outdated {
        installed: CanonicalVersion,
        available: CanonicalVersion,
        download_url: String,
    },
}

impl Decision {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Self::UpToDate { .. })
    }
}

/// Compare the installed driver with the latest release.
pub fn decide(installed: &InstalledDriver, remote: &RemoteRelease) -> Result<Decision> {
    let available = CanonicalVersion::from_catalog_text(&remote.version_text)?;

    if installed.canonical == available {
        Ok(Decision::UpToDate { version: available })
    } else {
        Ok(Decision::Outdated {
            installed: installed.canonical.clone(),
            available,
            download_url: remote.download_url.clone(),
        })
    }
}
