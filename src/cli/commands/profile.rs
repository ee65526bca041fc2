//! `drivercheck profile` - show local findings without going online.

use crate::check::{DriverCheck, LocalReport};
use crate::cli::args::ProfileArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::host;
use crate::inventory::DeviceInventory;
use crate::platform::ConfigStore;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The profile command implementation.
pub struct ProfileCommand {
    settings: Settings,
    args: ProfileArgs,
}

impl ProfileCommand {
    pub fn new(settings: Settings, args: ProfileArgs) -> Self {
        Self { settings, args }
    }

    pub fn inspect_with(
        &self,
        store: &dyn ConfigStore,
        inventory: &dyn DeviceInventory,
    ) -> Result<LocalReport> {
        DriverCheck::new(store, inventory, self.settings.device_filter()).inspect()
    }

    pub fn present(
        &self,
        report: &LocalReport,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        if self.args.json {
            let json = serde_json::to_string_pretty(report).map_err(anyhow::Error::from)?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        let params = report.device_class.params();
        let lines = [
            ("Device", report.installed.device.name.clone()),
            ("Driver", report.installed.device.raw_version.clone()),
            ("Version", report.installed.canonical.to_string()),
            ("Class", format!("{:?}", report.device_class)),
            ("osid", report.profile.os_code.to_string()),
            ("is64", report.profile.arch_flag.to_string()),
            ("dtcid", report.profile.branch_flag.to_string()),
            ("psid", params.product_series_id.to_string()),
            ("pfid", params.product_family_id.to_string()),
        ];
        for (key, value) in lines {
            ui.message(&format!("{:<8} {}", format!("{}:", key), value));
        }

        Ok(CommandResult::success())
    }
}

impl Command for ProfileCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = host::with_host(|store, inventory| self.inspect_with(store, inventory))?;
        self.present(&report, ui)
    }
}
