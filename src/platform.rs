//! Platform identity for the driver catalog query.
//!
//! The catalog identifies the host by an `osid` code, a 64-bit flag baked
//! into that code, and a `dtcid` flag telling DCH drivers apart from the
//! legacy packaging. All three come from the registry and the process
//! architecture.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{DriverCheckError, Result};

/// Registry key holding the Windows release information.
pub const WINDOWS_VERSION_KEY: &str = r"SOFTWARE\Microsoft\Windows NT\CurrentVersion";

/// Registry key of the NVIDIA display driver service.
pub const DRIVER_SERVICE_KEY: &str = r"SYSTEM\CurrentControlSet\Services\nvlddmkm";

const CURRENT_VERSION_VALUE: &str = "CurrentVersion";
const MAJOR_VERSION_VALUE: &str = "CurrentMajorVersionNumber";
const DCH_VALUE: &str = "DCHUVen";

/// Typed read access to the host configuration store.
///
/// Implementations return `Ok(None)` when the key or the value does not
/// exist and an error only when the store itself could not be queried.
pub trait ConfigStore {
    /// Read a string value.
    fn read_string(&self, key: &str, name: &str) -> Result<Option<String>>;

    /// Read a 32-bit integer value.
    fn read_u32(&self, key: &str, name: &str) -> Result<Option<u32>>;
}

/// Matches a Windows release against one row of the OS table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsMatcher {
    /// `CurrentMajorVersionNumber` equals the given value.
    MajorVersion(u32),
    /// `CurrentVersion` equals the given string.
    VersionString(&'static str),
}

impl OsMatcher {
    fn matches(&self, release: &WindowsRelease) -> bool {
        match self {
            Self::MajorVersion(major) => release.major_version == Some(*major),
            Self::VersionString(version) => release.current_version == *version,
        }
    }
}

/// Catalog OS codes for 32-bit hosts, evaluated top to bottom.
///
/// The 64-bit code is always the 32-bit code plus one.
pub const OS_CODE_TABLE: &[(OsMatcher, u32)] = &[
    (OsMatcher::MajorVersion(10), 56),
    (OsMatcher::VersionString("6.3"), 40),
    (OsMatcher::VersionString("6.1"), 18),
];

/// Windows release values read from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowsRelease {
    /// `CurrentVersion`, e.g. `6.3` (Windows 10 and 11 still report 6.3).
    pub current_version: String,
    /// `CurrentMajorVersionNumber`; absent before Windows 10.
    pub major_version: Option<u32>,
}

/// Process architecture as far as the catalog cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    X64,
    Other,
}

impl Architecture {
    /// Architecture this binary was built for.
    pub fn current() -> Self {
        Self::from_arch(std::env::consts::ARCH)
    }

    /// Map a `std::env::consts::ARCH` value.
    pub fn from_arch(arch: &str) -> Self {
        if arch == "x86_64" {
            Self::X64
        } else {
            Self::Other
        }
    }

    pub fn flag(&self) -> u8 {
        match self {
            Self::X64 => 1,
            Self::Other => 0,
        }
    }
}

/// Platform identity codes sent to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformProfile {
    /// Vendor OS code (`osid`).
    pub os_code: u32,
    /// 1 on 64-bit hosts.
    pub arch_flag: u8,
    /// 1 when a DCH driver is installed (`dtcid`).
    pub branch_flag: u8,
}

/// Fail unless running on Windows.
pub fn ensure_supported_os(os: &str) -> Result<()> {
    if os == "windows" {
        Ok(())
    } else {
        Err(DriverCheckError::UnsupportedPlatform {
            detail: format!("OS is not Windows ({})", os),
        })
    }
}

/// Look up the 32-bit catalog OS code for a Windows release.
pub fn os_code_base(release: &WindowsRelease) -> Option<u32> {
    OS_CODE_TABLE
        .iter()
        .find(|(matcher, _)| matcher.matches(release))
        .map(|(_, base)| *base)
}

/// Derives the [`PlatformProfile`] from the configuration store.
pub struct PlatformProfiler<'a> {
    store: &'a dyn ConfigStore,
    arch: Architecture,
}

impl<'a> PlatformProfiler<'a> {
    /// Create a profiler for the current process architecture.
    pub fn new(store: &'a dyn ConfigStore) -> Self {
        Self::with_architecture(store, Architecture::current())
    }

    /// Create a profiler with an explicit architecture.
    pub fn with_architecture(store: &'a dyn ConfigStore, arch: Architecture) -> Self {
        Self { store, arch }
    }

    /// Resolve the platform profile.
    pub fn resolve(&self) -> Result<PlatformProfile> {
        let release = self.windows_release()?;
        debug!(
            "Windows release: CurrentVersion={} major={:?}",
            release.current_version, release.major_version
        );

        let base = os_code_base(&release).ok_or_else(|| DriverCheckError::UnsupportedPlatform {
            detail: format!(
                "unsupported Windows version {} (major {})",
                release.current_version,
                release
                    .major_version
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            ),
        })?;

        let arch_flag = self.arch.flag();
        let profile = PlatformProfile {
            os_code: base + u32::from(arch_flag),
            arch_flag,
            branch_flag: self.branch_flag(),
        };
        debug!("Platform profile: {:?}", profile);
        Ok(profile)
    }

    fn windows_release(&self) -> Result<WindowsRelease> {
        let current_version = self
            .store
            .read_string(WINDOWS_VERSION_KEY, CURRENT_VERSION_VALUE)?
            .ok_or_else(|| DriverCheckError::RegistryAccessError {
                key: WINDOWS_VERSION_KEY.to_string(),
                message: format!("value {} not found", CURRENT_VERSION_VALUE),
            })?;
        let major_version = self
            .store
            .read_u32(WINDOWS_VERSION_KEY, MAJOR_VERSION_VALUE)?;

        Ok(WindowsRelease {
            current_version,
            major_version,
        })
    }

    /// Missing service key or value means a legacy (non-DCH) driver.
    fn branch_flag(&self) -> u8 {
        match self.store.read_u32(DRIVER_SERVICE_KEY, DCH_VALUE) {
            Ok(Some(value)) if value != 0 => 1,
            Ok(_) => 0,
            Err(e) => {
                warn!("Could not read DCH flag, assuming legacy driver: {}", e);
                0
            }
        }
    }
}

#[cfg(windows)]
pub use self::registry::RegistryStore;

#[cfg(windows)]
mod registry {
    use std::io;

    use winreg::enums::HKEY_LOCAL_MACHINE;
    use winreg::types::FromRegValue;
    use winreg::RegKey;

    use super::ConfigStore;
    use crate::error::{DriverCheckError, Result};

    /// [`ConfigStore`] backed by `HKEY_LOCAL_MACHINE`.
    pub struct RegistryStore {
        root: RegKey,
    }

    impl RegistryStore {
        pub fn local_machine() -> Self {
            Self {
                root: RegKey::predef(HKEY_LOCAL_MACHINE),
            }
        }

        fn read<T: FromRegValue>(&self, key: &str, name: &str) -> Result<Option<T>> {
            let access_error = |e: io::Error| DriverCheckError::RegistryAccessError {
                key: key.to_string(),
                message: e.to_string(),
            };

            let subkey = match self.root.open_subkey(key) {
                Ok(subkey) => subkey,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(access_error(e)),
            };

            match subkey.get_value::<T, _>(name) {
                Ok(value) => Ok(Some(value)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(access_error(e)),
            }
        }
    }

    impl ConfigStore for RegistryStore {
        fn read_string(&self, key: &str, name: &str) -> Result<Option<String>> {
            self.read(key, name)
        }

        fn read_u32(&self, key: &str, name: &str) -> Result<Option<u32>> {
            self.read(key, name)
        }
    }
}
