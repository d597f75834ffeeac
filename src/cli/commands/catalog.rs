//! The `netver catalog` command.

use crate::catalog::{BuildCatalog, BuildRecord, BuildResolution};
use crate::cli::args::CatalogArgs;
use crate::error::Result;
use crate::ui::{Console, NetverTheme};

use super::dispatcher::{Command, CommandResult};
use super::load_catalog;

/// Lists the catalog, or exports it or its schema as JSON.
pub struct CatalogCommand {
    args: CatalogArgs,
}

impl CatalogCommand {
    pub fn new(args: CatalogArgs) -> Self {
        Self { args }
    }
}

impl Command for CatalogCommand {
    fn execute(&self, console: &Console) -> Result<CommandResult> {
        if self.args.schema {
            let schema = serde_json::to_string_pretty(&BuildCatalog::json_schema())
                .map_err(anyhow::Error::from)?;
            console.println(&schema);
            return Ok(CommandResult::success());
        }

        let catalog = load_catalog(self.args.catalog.as_deref())?;
        if self.args.json {
            console.print(&catalog.to_json_pretty()?);
            return Ok(CommandResult::success());
        }

        let theme = console.theme();
        console.status(&theme.format_header(&format!(
            "{} builds, {} shared by several releases",
            catalog.len(),
            catalog.records().iter().filter(|r| r.is_ambiguous()).count()
        )));
        for record in catalog.records() {
            for line in format_record(record, theme) {
                console.println(&line);
            }
        }
        Ok(CommandResult::success())
    }
}

/// One line per direct record; a line per commit for shared builds.
fn format_record(record: &BuildRecord, theme: &NetverTheme) -> Vec<String> {
    let build = format!("{:<16}", record.build().to_string());
    match record.resolution() {
        BuildResolution::Direct(version) => {
            vec![format!("{} {}", theme.build.apply_to(build), version)]
        }
        BuildResolution::ByCommit(commits) => commits
            .iter()
            .map(|c| {
                format!(
                    "{} {:<8} {}",
                    theme.build.apply_to(&build),
                    c.version.to_string(),
                    theme.dim.apply_to(&c.commit)
                )
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CommitVersion;
    use crate::version::Version;

    #[test]
    fn direct_record_is_one_line() {
        let record = BuildRecord::direct(
            Version::with_revision(4, 6, 26919, 2),
            Version::with_build(2, 1, 5),
        );
        let lines = format_record(&record, &NetverTheme::plain());
        assert_eq!(lines, ["4.6.26919.2      2.1.5"]);
    }

    #[test]
    fn shared_record_lists_commits() {
        let record = BuildRecord::by_commit(
            Version::with_revision(4, 6, 26328, 1),
            vec![
                CommitVersion {
                    commit: "abc".into(),
                    version: Version::with_build(1, 0, 11),
                },
                CommitVersion {
                    commit: "def".into(),
                    version: Version::with_build(2, 0, 7),
                },
            ],
        )
        .unwrap();

        let lines = format_record(&record, &NetverTheme::plain());
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("1.0.11   abc"));
        assert!(lines[1].contains("2.0.7"));
    }
}
