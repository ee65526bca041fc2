//! Command-line interface for drivercheck.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{CheckArgs, Cli, Commands, ProfileArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
