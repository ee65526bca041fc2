//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{CheckArgs, Cli, Commands};
use crate::config::Settings;
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// Errors are returned, never printed; the caller reports them.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Process exit code.
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self { exit_code: 0 }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    settings: Settings,
}

impl CommandDispatcher {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Check(args)) => {
                let cmd = super::check::CheckCommand::new(self.settings.clone(), args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Profile(args)) => {
                let cmd = super::profile::ProfileCommand::new(self.settings.clone(), args.clone());
                cmd.execute(ui)
            }
            None => {
                let cmd =
                    super::check::CheckCommand::new(self.settings.clone(), CheckArgs::default());
                cmd.execute(ui)
            }
        }
    }
}
