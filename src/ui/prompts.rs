//! Interactive prompts.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::error::{DriverCheckError, Result};

use super::Prompt;

/// Convert dialoguer errors to DriverCheckError.
fn map_dialoguer_err(e: dialoguer::Error) -> DriverCheckError {
    DriverCheckError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Ask a yes/no question on the terminal.
pub fn prompt_confirm(prompt: &Prompt, term: &Term) -> Result<bool> {
    Confirm::with_theme(&prompt_theme())
        .with_prompt(&prompt.question)
        .default(prompt.default)
        .interact_on(term)
        .map_err(map_dialoguer_err)
}
