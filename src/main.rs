//! drivercheck CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use drivercheck::cli::{Cli, CommandDispatcher};
use drivercheck::config::Settings;
use drivercheck::ui::create_ui;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("drivercheck=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("drivercheck=info"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("drivercheck starting with args: {:?}", cli);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    // Prompts need a person at the terminal.
    let is_interactive = cli.wants_prompts() && console::user_attended();
    let mut ui = create_ui(is_interactive, cli.output_mode());

    let settings = match Settings::load(cli.config.as_deref(), &cli.settings_overrides()) {
        Ok(settings) => settings,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            return ExitCode::from(1);
        }
    };

    let dispatcher = CommandDispatcher::new(settings);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
