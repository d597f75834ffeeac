//! The runtime identification decision procedure.

use std::sync::LazyLock;

use regex::Regex;

use super::legacy::framework_version_for_release;
use super::signals::{HostProfile, SignalSource};
use super::{RuntimeFamily, RuntimeIdentity};
use crate::catalog::BuildCatalog;
use crate::error::{NetverError, Result};
use crate::version::Version;

const DOT_NET_PREFIX: &str = ".NET ";
const FRAMEWORK_PREFIX: &str = ".NET Framework";
const CORE_PREFIX: &str = ".NET Core";
const NATIVE_PREFIX: &str = ".NET Native";
const MONO_PREFIX: &str = "Mono ";

static DOT_NET_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.NET (\d+(?:\.\d+){1,3})").unwrap());

/// Turns live signals into a [`RuntimeIdentity`].
///
/// Resolution is a pure function of the catalog and the signals: calling
/// [`Resolver::resolve`] twice with the same inputs gives the same answer.
/// Inputs that do not look like any known runtime resolve to
/// [`RuntimeFamily::Unknown`]; inputs that look like a known runtime but
/// cannot be pinned to a version are errors, never guesses.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'c> {
    catalog: &'c BuildCatalog,
}

impl<'c> Resolver<'c> {
    pub fn new(catalog: &'c BuildCatalog) -> Self {
        Self { catalog }
    }

    /// Identify the runtime the signals came from.
    pub fn resolve(&self, signals: &dyn SignalSource) -> Result<RuntimeIdentity> {
        let description = match HostProfile::of(signals) {
            HostProfile::ReflectionOnly => return self.resolve_framework_or_mono(signals),
            HostProfile::DescriptionAware => signals.framework_description().unwrap_or_default(),
        };

        if let Some(rest) = description.strip_prefix(DOT_NET_PREFIX) {
            if rest.starts_with(|c: char| c.is_ascii_digit()) {
                let version = signals
                    .environment_version()
                    .or_else(|| version_after_dot_net(&description))
                    .ok_or(NetverError::MissingSignal {
                        signal: "environment version",
                    })?;
                return Ok(RuntimeIdentity::new(RuntimeFamily::UnifiedRuntime, version));
            }
            if description.starts_with(FRAMEWORK_PREFIX) {
                return self.resolve_framework_or_mono(signals);
            }
            if description.starts_with(CORE_PREFIX) {
                return self.resolve_core(signals);
            }
            if description.starts_with(NATIVE_PREFIX) {
                return Err(NetverError::UnsupportedRuntime { description });
            }
            return Ok(RuntimeIdentity::unknown());
        }

        if let Some(rest) = description.strip_prefix(MONO_PREFIX) {
            let version = rest
                .split_whitespace()
                .next()
                .and_then(|token| token.parse().ok());
            return Ok(RuntimeIdentity::mono(version));
        }

        tracing::debug!("Unrecognized framework description: {:?}", description);
        Ok(RuntimeIdentity::unknown())
    }

    /// .NET Framework or Mono, told apart by Mono's marker type.
    fn resolve_framework_or_mono(&self, signals: &dyn SignalSource) -> Result<RuntimeIdentity> {
        if let Some(mono) = signals.alternative_runtime() {
            let version = mono
                .display_name
                .as_deref()
                .and_then(|name| name.split_whitespace().next())
                .and_then(|token| token.parse().ok());
            return Ok(RuntimeIdentity::mono(version));
        }

        let release = signals
            .legacy_release_code()
            .ok_or(NetverError::MissingLegacyReleaseKey)?;
        let version = framework_version_for_release(release)?;
        Ok(RuntimeIdentity::new(RuntimeFamily::LegacyFramework, version))
    }

    /// .NET Core: direct from `Environment.Version` from 3.0 on, otherwise
    /// through the build catalog.
    fn resolve_core(&self, signals: &dyn SignalSource) -> Result<RuntimeIdentity> {
        if let Some(version) = signals.environment_version() {
            // Before 3.0 the compatibility shim reports 4.0.30319.x; the
            // product line skipped major version 4.
            if version.major() >= 3 && version.major() != 4 {
                return Ok(RuntimeIdentity::new(RuntimeFamily::ModularRuntime, version));
            }
        }

        let build = signals
            .corelib_file_version()
            .ok_or(NetverError::MissingSignal {
                signal: "core library file version",
            })?;
        let record = self
            .catalog
            .get(&build)
            .ok_or(NetverError::UnknownBuild { build })?;

        if !record.is_ambiguous() {
            if let Some(version) = record.version_for(None) {
                return Ok(RuntimeIdentity::new(RuntimeFamily::ModularRuntime, version));
            }
        }

        let informational =
            signals
                .corelib_informational_version()
                .ok_or(NetverError::MissingSignal {
                    signal: "core library informational version",
                })?;
        let commit = informational.rsplit(' ').next().unwrap_or_default();
        record
            .version_for(Some(commit))
            .map(|version| RuntimeIdentity::new(RuntimeFamily::ModularRuntime, version))
            .ok_or_else(|| NetverError::UnknownCommit {
                build,
                commit: commit.to_string(),
            })
    }
}

impl Resolver<'static> {
    /// A resolver over the catalog compiled into this binary.
    pub fn embedded() -> Result<Self> {
        Ok(Self::new(BuildCatalog::embedded()?))
    }
}

fn version_after_dot_net(description: &str) -> Option<Version> {
    DOT_NET_VERSION
        .captures(description)
        .and_then(|caps| caps[1].parse().ok())
}
