//! Opening download pages.

use crate::error::{DriverCheckError, Result};

/// Opens URLs outside the process.
pub trait Launcher {
    fn open(&self, url: &str) -> Result<()>;
}

/// Opens URLs in the user's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserLauncher;

impl Launcher for BrowserLauncher {
    fn open(&self, url: &str) -> Result<()> {
        open::that(url).map_err(|e| DriverCheckError::BrowserLaunchError {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
