//! `drivercheck check` - compare the installed driver with the catalog.

use crate::browser::{BrowserLauncher, Launcher};
use crate::catalog::{CatalogClient, ReleaseCatalog};
use crate::check::{CheckReport, DriverCheck};
use crate::cli::args::CheckArgs;
use crate::config::Settings;
use crate::decision::Decision;
use crate::error::Result;
use crate::host;
use crate::inventory::DeviceInventory;
use crate::platform::ConfigStore;
use crate::ui::{Prompt, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Key of the open-download-page prompt.
pub const OPEN_DOWNLOAD_PROMPT: &str = "open_download";

/// The check command implementation.
pub struct CheckCommand {
    settings: Settings,
    args: CheckArgs,
}

impl CheckCommand {
    pub fn new(settings: Settings, args: CheckArgs) -> Self {
        Self { settings, args }
    }

    /// Run the pipeline with explicit collaborators.
    ///
    /// JSON runs show no progress, so stdout carries the document only.
    pub fn run_with(
        &self,
        store: &dyn ConfigStore,
        inventory: &dyn DeviceInventory,
        catalog: &dyn ReleaseCatalog,
        ui: &mut dyn UserInterface,
    ) -> Result<CheckReport> {
        let check = DriverCheck::new(store, inventory, self.settings.device_filter());
        if self.args.json {
            return check.run(catalog);
        }

        let mut spinner = ui.start_spinner("Checking for driver updates...");
        let result = check.run(catalog);
        match &result {
            Ok(report) => spinner.finish_success(&format!(
                "Catalog lists {}",
                report.release.version_text
            )),
            Err(_) => spinner.finish_error("Driver check failed"),
        }
        result
    }

    /// Show the outcome and carry out the chosen action.
    pub fn present(
        &self,
        report: &CheckReport,
        ui: &mut dyn UserInterface,
        launcher: &dyn Launcher,
    ) -> Result<CommandResult> {
        if self.args.json {
            let json = serde_json::to_string_pretty(report).map_err(anyhow::Error::from)?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        if ui.output_mode().shows_details() {
            ui.message(&format!(
                "Device: {} (driver {})",
                report.installed.device.name, report.installed.device.raw_version
            ));
            ui.message(&format!(
                "Platform: osid={} dtcid={}",
                report.profile.os_code, report.profile.branch_flag
            ));
        }

        match &report.decision {
            Decision::UpToDate { .. } => {
                ui.success("Driver up to date!");
            }
            Decision::Outdated {
                installed,
                available,
                download_url,
            } => {
                ui.warning("A different driver version is available");
                ui.message(&format!("Current: {}\nNew: {}", installed, available));

                if self.args.non_interactive || !ui.is_interactive() {
                    ui.message(&format!("Download: {}", download_url));
                    return Ok(CommandResult::success());
                }

                let prompt = Prompt::new(
                    OPEN_DOWNLOAD_PROMPT,
                    "Do you want to open the download page?",
                    true,
                );
                if ui.confirm(&prompt)? {
                    launcher.open(download_url)?;
                }
            }
        }

        Ok(CommandResult::success())
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let catalog = CatalogClient::from_settings(&self.settings)?;
        let report =
            host::with_host(|store, inventory| self.run_with(store, inventory, &catalog, ui))?;
        self.present(&report, ui, &BrowserLauncher)
    }
}
