//! The `netver resolve` command.

use crate::cli::args::ResolveArgs;
use crate::detect::registry::read_installed_legacy_release_code;
use crate::detect::{Resolver, StaticSignals};
use crate::error::{NetverError, Result};
use crate::ui::Console;

use super::dispatcher::{Command, CommandResult};
use super::{load_catalog, print_identity};

/// Resolves a runtime identity from signals given on the command line.
pub struct ResolveCommand {
    args: ResolveArgs,
}

impl ResolveCommand {
    pub fn new(args: ResolveArgs) -> Self {
        Self { args }
    }

    /// Signals from the signals file, overridden by flags.
    ///
    /// Without any description or release code the installed .NET
    /// Framework release code is read, where there is one.
    pub fn signals(&self) -> Result<StaticSignals> {
        let args = &self.args;
        let mut signals = match &args.signals {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                serde_json::from_str(&content).map_err(|e| NetverError::Other(anyhow::anyhow!(
                    "Invalid signals file {}: {}",
                    path.display(),
                    e
                )))?
            }
            None => StaticSignals::default(),
        };

        if let Some(description) = &args.description {
            signals.framework_description = Some(description.clone());
        }
        if let Some(version) = args.environment_version {
            signals.environment_version = Some(version);
        }
        if let Some(build) = args.build_id {
            signals.corelib_file_version = Some(build);
        }
        if let Some(informational) = &args.informational_version {
            signals.corelib_informational_version = Some(informational.clone());
        }
        if args.mono {
            signals = signals.with_alternative_runtime(args.mono_display_name.clone());
        }
        if let Some(release) = args.legacy_release {
            signals.legacy_release_code = Some(release);
        }

        if signals.framework_description.is_none()
            && signals.alternative_runtime.is_none()
            && signals.legacy_release_code.is_none()
        {
            signals.legacy_release_code = read_installed_legacy_release_code();
        }

        Ok(signals)
    }
}

impl Command for ResolveCommand {
    fn execute(&self, console: &Console) -> Result<CommandResult> {
        let signals = self.signals()?;
        tracing::debug!("Resolving {:?}", signals);

        let catalog = load_catalog(self.args.catalog.as_deref())?;
        let identity = Resolver::new(&catalog).resolve(&signals)?;
        print_identity(console, &identity, self.args.json)?;
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Version;
    use tempfile::TempDir;

    #[test]
    fn flags_become_signals() {
        let command = ResolveCommand::new(ResolveArgs {
            description: Some(".NET Core 4.6.26919.02".into()),
            environment_version: Some("4.0.30319.42000".parse().unwrap()),
            build_id: Some("4.6.26919.02".parse().unwrap()),
            ..Default::default()
        });

        let signals = command.signals().unwrap();
        assert_eq!(
            signals.corelib_file_version,
            Some(Version::with_revision(4, 6, 26919, 2))
        );
        let identity = Resolver::embedded().unwrap().resolve(&signals).unwrap();
        assert_eq!(identity.to_string(), ".NET Core 2.1.5");
    }

    #[test]
    fn flags_override_signals_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("signals.json");
        std::fs::write(
            &path,
            r#"{"framework_description": ".NET 6.0.0", "legacy_release_code": 1}"#,
        )
        .unwrap();

        let command = ResolveCommand::new(ResolveArgs {
            signals: Some(path),
            description: Some(".NET 8.0.1".into()),
            ..Default::default()
        });

        let signals = command.signals().unwrap();
        assert_eq!(signals.framework_description.as_deref(), Some(".NET 8.0.1"));
        assert_eq!(signals.legacy_release_code, Some(1));
    }

    #[test]
    fn mono_flag_sets_alternative_runtime() {
        let command = ResolveCommand::new(ResolveArgs {
            mono: true,
            mono_display_name: Some("6.12.0.122 (tarball)".into()),
            ..Default::default()
        });
        let identity = Resolver::embedded()
            .unwrap()
            .resolve(&command.signals().unwrap())
            .unwrap();
        assert_eq!(identity.to_string(), "Mono 6.12.0.122");
    }

    #[test]
    fn bad_signals_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("signals.json");
        std::fs::write(&path, r#"{"unknown_field": 1}"#).unwrap();

        let command = ResolveCommand::new(ResolveArgs {
            signals: Some(path),
            ..Default::default()
        });
        assert!(command.signals().unwrap_err().to_string().contains("Invalid signals file"));
    }
}
