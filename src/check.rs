//! The driver check pipeline.
//!
//! Stages run in a fixed order, each consuming the previous one's output:
//!
//! 1. platform profile from the configuration store
//! 2. installed driver from the device inventory
//! 3. latest release from the catalog
//! 4. decision
//!
//! The first failing stage ends the run; its error is returned unchanged.

use serde::Serialize;
use tracing::info;

use crate::catalog::{DeviceClass, ReleaseCatalog, RemoteRelease};
use crate::decision::{decide, Decision};
use crate::error::Result;
use crate::inventory::{resolve_installed, DeviceFilter, DeviceInventory, InstalledDriver};
use crate::platform::{Architecture, ConfigStore, PlatformProfile, PlatformProfiler};

/// Everything a completed check found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub profile: PlatformProfile,
    pub installed: InstalledDriver,
    pub device_class: DeviceClass,
    pub release: RemoteRelease,
    pub decision: Decision,
}

/// Local findings, gathered without contacting the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalReport {
    pub profile: PlatformProfile,
    pub installed: InstalledDriver,
    pub device_class: DeviceClass,
}

/// Wires the collaborators of one driver check together.
pub struct DriverCheck<'a> {
    store: &'a dyn ConfigStore,
    inventory: &'a dyn DeviceInventory,
    filter: DeviceFilter,
    arch: Architecture,
}

impl<'a> DriverCheck<'a> {
    pub fn new(
        store: &'a dyn ConfigStore,
        inventory: &'a dyn DeviceInventory,
        filter: DeviceFilter,
    ) -> Self {
        Self {
            store,
            inventory,
            filter,
            arch: Architecture::current(),
        }
    }

    /// Override the process architecture.
    pub fn with_architecture(mut self, arch: Architecture) -> Self {
        self.arch = arch;
        self
    }

    /// Run the local stages only.
    pub fn inspect(&self) -> Result<LocalReport> {
        let profile = PlatformProfiler::with_architecture(self.store, self.arch).resolve()?;
        let installed = resolve_installed(self.inventory, &self.filter)?;
        let device_class = DeviceClass::from_device_name(&installed.device.name);

        Ok(LocalReport {
            profile,
            installed,
            device_class,
        })
    }

    /// Run every stage against `catalog`.
    pub fn run(&self, catalog: &dyn ReleaseCatalog) -> Result<CheckReport> {
        let local = self.inspect()?;
        let release = catalog.latest_release(&local.installed.device.name, &local.profile)?;
        let decision = decide(&local.installed, &release)?;
        info!("Decision: {:?}", decision);

        Ok(CheckReport {
            profile: local.profile,
            installed: local.installed,
            device_class: local.device_class,
            release,
            decision,
        })
    }
}
