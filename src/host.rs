//! Access to the real host collaborators.
//!
//! On Windows the configuration store is the registry and the device
//! inventory is WMI. Everywhere else a check fails before touching either.

use crate::error::Result;
use crate::inventory::DeviceInventory;
use crate::platform::{ensure_supported_os, ConfigStore};

/// Run `f` with the host's configuration store and device inventory.
pub fn with_host<T, F>(f: F) -> Result<T>
where
    F: FnOnce(&dyn ConfigStore, &dyn DeviceInventory) -> Result<T>,
{
    ensure_supported_os(std::env::consts::OS)?;
    run_on_host(f)
}

#[cfg(windows)]
fn run_on_host<T, F>(f: F) -> Result<T>
where
    F: FnOnce(&dyn ConfigStore, &dyn DeviceInventory) -> Result<T>,
{
    use crate::inventory::WmiInventory;
    use crate::platform::RegistryStore;

    let store = RegistryStore::local_machine();
    let inventory = WmiInventory::connect()?;
    f(&store, &inventory)
}

#[cfg(not(windows))]
fn run_on_host<T, F>(_f: F) -> Result<T>
where
    F: FnOnce(&dyn ConfigStore, &dyn DeviceInventory) -> Result<T>,
{
    Err(crate::error::DriverCheckError::UnsupportedPlatform {
        detail: format!("OS is not Windows ({})", std::env::consts::OS),
    })
}
