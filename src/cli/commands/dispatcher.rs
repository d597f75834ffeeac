//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::Console;

use super::catalog::CatalogCommand;
use super::completions::CompletionsCommand;
use super::detect::DetectCommand;
use super::resolve::ResolveCommand;
use super::scrape::ScrapeCommand;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, writing results and status to `console`.
    fn execute(&self, console: &Console) -> Result<CommandResult>;
}

/// Result of command execution.
///
/// Failures travel as errors; a returned result always succeeded.
#[derive(Debug)]
pub struct CommandResult {
    /// Exit code to use.
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self { exit_code: 0 }
    }
}

/// Dispatches CLI commands to their implementations.
#[derive(Debug, Default)]
pub struct CommandDispatcher;

impl CommandDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Route the CLI subcommand to its implementation and execute it.
    pub fn dispatch(&self, cli: &Cli, console: &Console) -> Result<CommandResult> {
        match &cli.command {
            Commands::Scrape(args) => ScrapeCommand::new(args.clone()).execute(console),
            Commands::Resolve(args) => ResolveCommand::new(args.clone()).execute(console),
            Commands::Detect(args) => DetectCommand::new(args.clone()).execute(console),
            Commands::Catalog(args) => CatalogCommand::new(args.clone()).execute(console),
            Commands::Completions(args) => CompletionsCommand::new(args.clone()).execute(console),
        }
    }
}
