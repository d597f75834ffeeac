//! Live runtime signals.
//!
//! The resolver never talks to a runtime directly. Everything it knows comes
//! through a [`SignalSource`], which lets the same decision procedure run
//! against probe output, values typed on the command line, or fakes in
//! tests.

use serde::{Deserialize, Serialize};

use crate::version::Version;

/// Mono's marker type, visible to reflection when running on Mono.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeRuntime {
    /// Result of `Mono.Runtime.GetDisplayName()`, e.g.
    /// `6.12.0.122 (tarball Mon Feb 22 17:33:28 UTC 2021)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Source of the strings and numbers a runtime reports about itself.
pub trait SignalSource {
    /// `RuntimeInformation.FrameworkDescription`; absent on hosts that
    /// predate the API.
    fn framework_description(&self) -> Option<String>;

    /// `Environment.Version`.
    fn environment_version(&self) -> Option<Version>;

    /// File version of the core library (the internal build identifier).
    fn corelib_file_version(&self) -> Option<Version>;

    /// Informational version of the core library; ends in a commit hash.
    fn corelib_informational_version(&self) -> Option<String>;

    /// Present when the `Mono.Runtime` type is loaded.
    fn alternative_runtime(&self) -> Option<AlternativeRuntime>;

    /// `Release` value of the installed .NET Framework 4.x registry key.
    fn legacy_release_code(&self) -> Option<u32>;
}

/// Which detection strategy a host supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostProfile {
    /// The host exposes a framework description string.
    DescriptionAware,
    /// Only reflection and the registry are available.
    ReflectionOnly,
}

impl HostProfile {
    /// Pick the strategy for a signal source.
    pub fn of(signals: &dyn SignalSource) -> Self {
        if signals.framework_description().is_some() {
            Self::DescriptionAware
        } else {
            Self::ReflectionOnly
        }
    }
}

/// Signals held in memory.
///
/// Deserializable so a signals file can be passed to `netver resolve`.
///
/// # Example
///
/// ```
/// use netver::detect::{Resolver, RuntimeFamily, StaticSignals};
///
/// let signals = StaticSignals::default().with_description("Mono 6.12.0.122 (tarball)");
/// let resolver = Resolver::embedded().unwrap();
/// let identity = resolver.resolve(&signals).unwrap();
/// assert_eq!(identity.family(), RuntimeFamily::AlternativeImplementation);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticSignals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_version: Option<Version>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corelib_file_version: Option<Version>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corelib_informational_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_runtime: Option<AlternativeRuntime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_release_code: Option<u32>,
}

impl StaticSignals {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.framework_description = Some(description.into());
        self
    }

    pub fn with_environment_version(mut self, version: Version) -> Self {
        self.environment_version = Some(version);
        self
    }

    pub fn with_corelib(mut self, file_version: Version, informational: impl Into<String>) -> Self {
        self.corelib_file_version = Some(file_version);
        self.corelib_informational_version = Some(informational.into());
        self
    }

    pub fn with_alternative_runtime(mut self, display_name: Option<String>) -> Self {
        self.alternative_runtime = Some(AlternativeRuntime { display_name });
        self
    }

    pub fn with_legacy_release_code(mut self, release: u32) -> Self {
        self.legacy_release_code = Some(release);
        self
    }
}

impl SignalSource for StaticSignals {
    fn framework_description(&self) -> Option<String> {
        self.framework_description.clone()
    }

    fn environment_version(&self) -> Option<Version> {
        self.environment_version
    }

    fn corelib_file_version(&self) -> Option<Version> {
        self.corelib_file_version
    }

    fn corelib_informational_version(&self) -> Option<String> {
        self.corelib_informational_version.clone()
    }

    fn alternative_runtime(&self) -> Option<AlternativeRuntime> {
        self.alternative_runtime.clone()
    }

    fn legacy_release_code(&self) -> Option<u32> {
        self.legacy_release_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_follows_description_availability() {
        let bare = StaticSignals::default();
        assert_eq!(HostProfile::of(&bare), HostProfile::ReflectionOnly);

        let described = StaticSignals::default().with_description(".NET 8.0.1");
        assert_eq!(HostProfile::of(&described), HostProfile::DescriptionAware);
    }

    #[test]
    fn deserializes_partial_signals_file() {
        let json = r#"{
            "framework_description": ".NET Core 2.1.5",
            "environment_version": "4.0.30319.42000",
            "corelib_file_version": "4.6.26919.2"
        }"#;
        let signals: StaticSignals = serde_json::from_str(json).unwrap();
        assert_eq!(
            signals.corelib_file_version(),
            Some("4.6.26919.2".parse().unwrap())
        );
        assert!(signals.corelib_informational_version().is_none());
        assert!(signals.alternative_runtime().is_none());
    }

    #[test]
    fn rejects_misspelled_fields() {
        let json = r#"{"framework_descripton": ".NET 8.0.1"}"#;
        assert!(serde_json::from_str::<StaticSignals>(json).is_err());
    }
}
