//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::SettingsOverrides;
use crate::ui::OutputMode;

/// Check whether the installed NVIDIA GeForce driver is the latest release.
#[derive(Debug, Parser)]
#[command(name = "drivercheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a YAML settings file
    #[arg(short, long, global = true, env = "DRIVERCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Catalog origin (scheme and host)
    #[arg(long, global = true, env = "DRIVERCHECK_ORIGIN", value_name = "URL")]
    pub origin: Option<String>,

    /// Catalog request timeout in seconds
    #[arg(
        long = "timeout",
        global = true,
        env = "DRIVERCHECK_TIMEOUT_SECS",
        value_name = "SECS"
    )]
    pub timeout_secs: Option<u64>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }

    pub fn settings_overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            origin: self.origin.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Whether the run may prompt the user.
    pub fn wants_prompts(&self) -> bool {
        match &self.command {
            Some(Commands::Check(args)) => !args.non_interactive && !args.json,
            Some(Commands::Profile(_)) => false,
            None => true,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare the installed driver with the latest release (default)
    Check(CheckArgs),

    /// Show the platform profile and installed driver without going online
    Profile(ProfileArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Never prompt; print the download link instead
    #[arg(long)]
    pub non_interactive: bool,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `profile` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ProfileArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
