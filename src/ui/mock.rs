//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. Confirm prompts can be answered in
//! advance by key.
//!
//! # Example
//!
//! ```
//! use drivercheck::ui::{MockUI, Prompt, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_confirm_response("open_download", true);
//!
//! let prompt = Prompt::new("open_download", "Open the download page?", false);
//! assert!(ui.confirm(&prompt).unwrap());
//! assert_eq!(ui.prompts_shown(), ["open_download"]);
//! ```

use std::collections::HashMap;

use crate::error::Result;

use super::{OutputMode, Prompt, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    spinners: Vec<String>,
    confirm_responses: HashMap<String, bool>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    /// Create a new interactive MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            interactive: true,
            ..Default::default()
        }
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Self::new()
        }
    }

    /// Answer the confirm prompt with this key.
    ///
    /// Unanswered prompts fall back to the prompt's default.
    pub fn set_confirm_response(&mut self, key: &str, response: bool) {
        self.confirm_responses.insert(key.to_string(), response);
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Get all prompts that were shown (by key).
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Check if a message containing `msg` was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a success containing `msg` was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a warning containing `msg` was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if an error containing `msg` was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        self.prompts_shown.push(prompt.key.clone());
        Ok(self
            .confirm_responses
            .get(&prompt.key)
            .copied()
            .unwrap_or(prompt.default))
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner::new())
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Mock spinner handle that records how it finished.
#[derive(Debug, Default)]
pub struct MockSpinner {
    finished: Option<String>,
}

impl MockSpinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finished(&self) -> Option<&str> {
        self.finished.as_deref()
    }
}

impl SpinnerHandle for MockSpinner {
    fn finish_success(&mut self, msg: &str) {
        self.finished = Some(format!("success: {}", msg));
    }

    fn finish_error(&mut self, msg: &str) {
        self.finished = Some(format!("error: {}", msg));
    }
}
