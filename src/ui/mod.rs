//! Terminal user interface.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for scripted or piped usage
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use drivercheck::ui::{create_ui, OutputMode};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.success("Driver up to date!");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::prompt_confirm;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, DriverCheckTheme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Always shown.
    fn error(&mut self, msg: &str);

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &Prompt) -> Result<bool>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}

/// A yes/no question.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for lookup in tests).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// Answer used when the user just presses enter.
    pub default: bool,
}

impl Prompt {
    pub fn new(key: &str, question: &str, default: bool) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_new_copies_fields() {
        let prompt = Prompt::new("open_download", "Open it?", true);
        assert_eq!(prompt.key, "open_download");
        assert_eq!(prompt.question, "Open it?");
        assert!(prompt.default);
    }
}
