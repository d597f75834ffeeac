//! The `netver detect` command.

use std::time::Duration;

use serde_json::json;

use crate::cli::args::DetectArgs;
use crate::detect::Resolver;
use crate::error::Result;
use crate::inventory::probe::run_probe;
use crate::ui::Console;

use super::dispatcher::{Command, CommandResult};
use super::{load_catalog, print_identity};

/// Runs the probe under a runtime and resolves what it printed.
pub struct DetectCommand {
    args: DetectArgs,
}

impl DetectCommand {
    pub fn new(args: DetectArgs) -> Self {
        Self { args }
    }
}

impl Command for DetectCommand {
    fn execute(&self, console: &Console) -> Result<CommandResult> {
        let output = run_probe(
            &self.args.dotnet,
            &self.args.probe,
            Duration::from_secs(self.args.timeout),
        )?;
        tracing::debug!("Probe reported {:?}", output);

        let catalog = load_catalog(self.args.catalog.as_deref())?;
        let identity = Resolver::new(&catalog).resolve(&output.signals())?;

        if self.args.json {
            let report = json!({
                "identity": identity,
                "build": output.build,
                "informational_version": output.informational_version,
                "description": output.description,
            });
            console.println(
                &serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?,
            );
        } else {
            let theme = console.theme();
            console.status(&theme.format_key_value("Description", &output.description, 11));
            console.status(&theme.format_key_value(
                "Build",
                &theme.build.apply_to(output.build).to_string(),
                11,
            ));
            print_identity(console, &identity, false)?;
        }
        Ok(CommandResult::success())
    }
}
