//! netver CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use netver::cli::{Cli, CommandDispatcher};
use netver::ui::{should_use_colors, Console, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr; stdout carries results.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("netver=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("netver=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("netver starting with args: {:?}", cli);

    let colors = !cli.no_color && should_use_colors();
    if !colors {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    let console = Console::new(OutputMode::from_quiet(cli.quiet), colors);

    match CommandDispatcher::new().dispatch(&cli, &console) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            console.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
