//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`netver resolve`, `netver scrape`)
//! - Shared initialization logic
//! - Consistent global flag handling

pub mod catalog;
pub mod completions;
pub mod detect;
pub mod dispatcher;
pub mod resolve;
pub mod scrape;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

use std::borrow::Cow;
use std::path::Path;

use crate::catalog::BuildCatalog;
use crate::detect::RuntimeIdentity;
use crate::error::Result;
use crate::ui::Console;

/// The catalog at `path`, or the built-in one.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<Cow<'static, BuildCatalog>> {
    match path {
        Some(path) => {
            tracing::debug!("Loading catalog from {}", path.display());
            Ok(Cow::Owned(BuildCatalog::load(path)?))
        }
        None => Ok(Cow::Borrowed(BuildCatalog::embedded()?)),
    }
}

/// Print a resolved identity as a line or as JSON.
pub(crate) fn print_identity(console: &Console, identity: &RuntimeIdentity, json: bool) -> Result<()> {
    if json {
        console.println(&serde_json::to_string_pretty(identity).map_err(anyhow::Error::from)?);
    } else {
        console.println(&console.theme().highlight.apply_to(identity).to_string());
    }
    Ok(())
}
