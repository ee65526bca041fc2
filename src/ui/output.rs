//! Output verbosity.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show details such as the raw driver version and query URL.
    Verbose,
    /// Show progress and the result.
    #[default]
    Normal,
    /// Show the result only.
    Quiet,
}

impl OutputMode {
    /// Check if this mode shows details.
    pub fn shows_details(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows progress spinners.
    pub fn shows_spinners(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }
}
