//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Running without a subcommand
//! performs a `check`.

pub mod check;
pub mod dispatcher;
pub mod profile;

pub use check::CheckCommand;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use profile::ProfileCommand;
