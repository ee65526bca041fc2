//! Non-interactive UI for scripted or piped runs.

use crate::error::Result;

use super::{OutputMode, Prompt, SpinnerHandle, UserInterface};

/// UI implementation that never blocks on input.
///
/// Prompts resolve to "no", so a non-interactive run never opens a
/// browser. Results go to stdout; progress, errors and warnings go to
/// stderr so piped output stays clean.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&mut self, msg: &str) {
        println!("✓ {}", msg);
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("⚠ {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        tracing::debug!("Answering '{}' with no (non-interactive)", prompt.key);
        Ok(false)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_details() {
            eprintln!("  {}", message);
        }
        Box::new(NoopSpinner)
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that does nothing (for non-interactive mode).
struct NoopSpinner;

impl SpinnerHandle for NoopSpinner {
    fn finish_success(&mut self, _msg: &str) {}

    fn finish_error(&mut self, _msg: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_answers_no() {
        let mut ui = NonInteractiveUI::new(OutputMode::Normal);
        let prompt = Prompt::new("open_download", "Open?", true);
        assert!(!ui.confirm(&prompt).unwrap());
    }

    #[test]
    fn is_never_interactive() {
        let ui = NonInteractiveUI::new(OutputMode::Verbose);
        assert!(!ui.is_interactive());
        assert_eq!(ui.output_mode(), OutputMode::Verbose);
    }

    #[test]
    fn spinner_is_noop() {
        let mut ui = NonInteractiveUI::new(OutputMode::Quiet);
        let mut spinner = ui.start_spinner("Querying catalog");
        spinner.finish_success("done");
    }
}
