//! The `netver scrape` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::anyhow;

use crate::cli::args::ScrapeArgs;
use crate::error::Result;
use crate::inventory::{InventoryBuilder, InventoryOptions, Platform};
use crate::ui::Console;

use super::dispatcher::{Command, CommandResult};

/// Builds the catalog from published runtimes.
pub struct ScrapeCommand {
    args: ScrapeArgs,
}

impl ScrapeCommand {
    pub fn new(args: ScrapeArgs) -> Self {
        Self { args }
    }

    /// Resolve flags, environment and defaults into builder options.
    pub fn options(&self, show_progress: bool) -> Result<InventoryOptions> {
        let args = &self.args;
        let dotnets_root: PathBuf = match &args.dotnets_path {
            Some(path) => path.clone(),
            None => InventoryOptions::default_dotnets_root().ok_or_else(|| {
                anyhow!("Cannot find a home directory; pass --dotnets-path or set NETVER_DOTNETS_PATH")
            })?,
        };

        let mut options = InventoryOptions::new(dotnets_root, args.probe_root.clone());
        if let Some(rid) = &args.rid {
            options.platform = Platform::new(rid.clone());
        }
        options.channel = args.channel.clone();
        options.offline = args.offline;
        options.probe_assembly = args.probe_assembly.clone();
        options.jobs = args.jobs;
        options.index_url = args.index_url.clone();
        options.download_timeout = Duration::from_secs(args.download_timeout);
        options.probe_timeout = Duration::from_secs(args.probe_timeout);
        options.show_progress = show_progress;
        Ok(options)
    }
}

impl Command for ScrapeCommand {
    fn execute(&self, console: &Console) -> Result<CommandResult> {
        let options = self.options(console.mode().shows_status())?;
        console.status(&format!(
            "Scraping {} runtimes into {}",
            options.platform,
            options.dotnets_root.display()
        ));

        let catalog = InventoryBuilder::new(options)?.build()?;
        if catalog.is_empty() {
            console.warning("No runtime builds were found");
        }

        match &self.args.output {
            Some(path) => {
                catalog.save(path)?;
                console.success(&format!(
                    "Wrote {} builds to {}",
                    catalog.len(),
                    path.display()
                ));
            }
            None => console.print(&catalog.to_json_pretty()?),
        }
        Ok(CommandResult::success())
    }
}
