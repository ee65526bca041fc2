//! Installed driver discovery.
//!
//! Graphics devices are read from the host's device inventory and reduced
//! to a single [`InstalledDriver`]. One machine has one driver install, so
//! every matching device must report the same raw version.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{DriverCheckError, Result};
use crate::version::CanonicalVersion;

/// Default device name pattern (WQL `LIKE` syntax).
pub const DEFAULT_DEVICE_FILTER: &str = "NVIDIA GeForce%";

/// A graphics device as reported by the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    /// Display name, e.g. `NVIDIA GeForce RTX 3080`.
    pub name: String,
    /// Windows driver version, e.g. `31.0.15.1694`.
    pub raw_version: String,
}

/// Device name pattern in WQL `LIKE` syntax, where `%` matches any run of
/// characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFilter(String);

impl DeviceFilter {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn pattern(&self) -> &str {
        &self.0
    }

    /// WQL query selecting the signed drivers of matching devices.
    pub fn wql(&self) -> String {
        format!(
            "SELECT DeviceName, DriverVersion FROM Win32_PnPSignedDriver WHERE DeviceName LIKE '{}'",
            self.0.replace('\\', "\\\\").replace('\'', "\\'")
        )
    }

    /// Evaluate the pattern locally, for inventories that cannot filter.
    ///
    /// Only `%` is treated as a wildcard; `_` and `[...]` match literally.
    pub fn matches(&self, name: &str) -> bool {
        let parts: Vec<&str> = self.0.split('%').collect();
        let (first, rest) = match parts.split_first() {
            Some(split) => split,
            None => return name.is_empty(),
        };

        let Some(mut remaining) = name.strip_prefix(first) else {
            return false;
        };

        // No wildcard at all: exact match.
        let Some((last, middle)) = rest.split_last() else {
            return remaining.is_empty();
        };
        for part in middle {
            match remaining.find(part) {
                Some(pos) => remaining = &remaining[pos + part.len()..],
                None => return false,
            }
        }
        remaining.ends_with(last)
    }
}

impl Default for DeviceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_FILTER)
    }
}

/// Source of device records.
pub trait DeviceInventory {
    /// Return every device whose name matches `filter`.
    fn query(&self, filter: &DeviceFilter) -> Result<Vec<Device>>;
}

/// The resolved device and its canonical driver version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledDriver {
    pub device: Device,
    pub canonical: CanonicalVersion,
}

/// Resolve the installed driver from the inventory.
///
/// Fails when nothing matches, when matching devices disagree on the raw
/// version, or when that version cannot be canonicalized.
pub fn resolve_installed(
    inventory: &dyn DeviceInventory,
    filter: &DeviceFilter,
) -> Result<InstalledDriver> {
    let devices = inventory.query(filter)?;
    debug!(
        "Inventory returned {} device(s) for '{}'",
        devices.len(),
        filter.pattern()
    );

    let first = devices
        .first()
        .ok_or_else(|| DriverCheckError::NoMatchingDevice {
            filter: filter.pattern().to_string(),
        })?;

    if let Some(other) = devices.iter().find(|d| d.raw_version != first.raw_version) {
        return Err(DriverCheckError::VersionMismatch {
            expected: first.raw_version.clone(),
            found: other.raw_version.clone(),
        });
    }

    let canonical = CanonicalVersion::from_driver_version(&first.raw_version)?;
    info!(
        "Installed driver {} ({}) on {}",
        canonical, first.raw_version, first.name
    );

    Ok(InstalledDriver {
        device: first.clone(),
        canonical,
    })
}

#[cfg(windows)]
pub use self::wmi_inventory::WmiInventory;

#[cfg(windows)]
mod wmi_inventory {
    use serde::Deserialize;
    use wmi::{COMLibrary, WMIConnection};

    use super::{Device, DeviceFilter, DeviceInventory};
    use crate::error::{DriverCheckError, Result};

    #[derive(Deserialize, Debug)]
    #[serde(rename = "Win32_PnPSignedDriver")]
    #[serde(rename_all = "PascalCase")]
    struct PnpSignedDriver {
        device_name: Option<String>,
        driver_version: Option<String>,
    }

    /// [`DeviceInventory`] backed by WMI.
    pub struct WmiInventory {
        connection: WMIConnection,
    }

    impl WmiInventory {
        /// Connect to the local `ROOT\CIMV2` namespace.
        pub fn connect() -> Result<Self> {
            let com = COMLibrary::new().map_err(query_error)?;
            let connection = WMIConnection::new(com).map_err(query_error)?;
            Ok(Self { connection })
        }
    }

    impl DeviceInventory for WmiInventory {
        fn query(&self, filter: &DeviceFilter) -> Result<Vec<Device>> {
            let rows: Vec<PnpSignedDriver> = self
                .connection
                .raw_query(filter.wql())
                .map_err(query_error)?;

            Ok(rows
                .into_iter()
                .filter_map(|row| {
                    Some(Device {
                        name: row.device_name?,
                        raw_version: row.driver_version.unwrap_or_default(),
                    })
                })
                .collect())
        }
    }

    fn query_error(e: wmi::WMIError) -> DriverCheckError {
        DriverCheckError::InventoryQueryError {
            message: e.to_string(),
        }
    }
}
