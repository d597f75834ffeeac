//! Runtime identification.
//!
//! - [`Resolver`] - decision procedure from live signals to a [`RuntimeIdentity`]
//! - [`SignalSource`] - where the live signals come from
//! - [`IdentityCache`] - compute-once holder for a process's identity
//! - [`legacy`] - .NET Framework release-code bands
//! - [`registry`] - reading the installed .NET Framework release code

pub mod legacy;
pub mod registry;
pub mod resolver;
pub mod signals;

pub use resolver::Resolver;
pub use signals::{AlternativeRuntime, HostProfile, SignalSource, StaticSignals};

use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

use crate::error::Result;
use crate::version::Version;

/// Implementation lineage of a .NET runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeFamily {
    Unknown,
    /// .NET Framework 4.x.
    LegacyFramework,
    /// .NET Core 1.0 through 3.1.
    ModularRuntime,
    /// .NET 5 and later.
    UnifiedRuntime,
    /// .NET Native.
    EmbeddedCompatible,
    /// Mono.
    AlternativeImplementation,
}

impl RuntimeFamily {
    /// Product name as printed to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::LegacyFramework => ".NET Framework",
            Self::ModularRuntime => ".NET Core",
            Self::UnifiedRuntime => ".NET",
            Self::EmbeddedCompatible => ".NET Native",
            Self::AlternativeImplementation => "Mono",
        }
    }
}

impl fmt::Display for RuntimeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The resolved runtime family and version.
///
/// `version` is `None` for [`RuntimeFamily::Unknown`], and for Mono when the
/// runtime does not expose a parseable version. Every other family always
/// carries a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RuntimeIdentity {
    family: RuntimeFamily,
    version: Option<Version>,
}

impl RuntimeIdentity {
    /// An identified runtime.
    pub(crate) fn new(family: RuntimeFamily, version: Version) -> Self {
        debug_assert!(family != RuntimeFamily::Unknown);
        Self {
            family,
            version: Some(version),
        }
    }

    /// Mono, whose version is not always available.
    pub(crate) fn mono(version: Option<Version>) -> Self {
        Self {
            family: RuntimeFamily::AlternativeImplementation,
            version,
        }
    }

    /// A runtime nothing matched.
    pub fn unknown() -> Self {
        Self {
            family: RuntimeFamily::Unknown,
            version: None,
        }
    }

    pub fn family(&self) -> RuntimeFamily {
        self.family
    }

    pub fn version(&self) -> Option<Version> {
        self.version
    }
}

impl fmt::Display for RuntimeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            Some(version) if self.family != RuntimeFamily::Unknown => {
                write!(f, "{} {}", self.family, version)
            }
            _ => write!(f, "{}", self.family),
        }
    }
}

/// Holds a process's runtime identity once it has been resolved.
///
/// Callers racing on an empty cache may each run the resolver, but only the
/// first value published is ever handed out, and nothing is recomputed once
/// a value is present. Failed resolutions publish nothing.
///
/// # Example
///
/// ```
/// use netver::detect::{IdentityCache, Resolver, StaticSignals};
///
/// let cache = IdentityCache::new();
/// let resolver = Resolver::embedded().unwrap();
/// let signals = StaticSignals::default().with_description("Mono 6.12.0.122");
/// let identity = cache.get_or_resolve(&resolver, &signals).unwrap();
/// assert_eq!(identity.to_string(), "Mono 6.12.0.122");
/// assert!(cache.get().is_some());
/// ```
#[derive(Debug, Default)]
pub struct IdentityCache {
    cell: OnceLock<RuntimeIdentity>,
}

impl IdentityCache {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// The cache shared by the whole process.
    pub fn global() -> &'static IdentityCache {
        static GLOBAL: IdentityCache = IdentityCache::new();
        &GLOBAL
    }

    /// The published identity, if any.
    pub fn get(&self) -> Option<&RuntimeIdentity> {
        self.cell.get()
    }

    /// Return the published identity, resolving and publishing one first if
    /// the cache is empty.
    pub fn get_or_resolve(
        &self,
        resolver: &Resolver<'_>,
        signals: &dyn SignalSource,
    ) -> Result<&RuntimeIdentity> {
        if let Some(identity) = self.cell.get() {
            return Ok(identity);
        }
        let resolved = resolver.resolve(signals)?;
        Ok(self.cell.get_or_init(|| resolved))
    }
}
