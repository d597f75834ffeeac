//! Error types for netver operations.
//!
//! This module defines [`NetverError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Resolution failures are finite and each has its own variant; the
//!   resolver never guesses a version when one of them occurs
//! - Cataloging failures are attributed to one unit of work and collected
//!   into [`NetverError::StageFailed`] so sibling failures are not hidden
//! - Use `anyhow::Error` (via `NetverError::Other`) for unexpected errors

use std::fmt::Write as _;
use std::path::PathBuf;
use thiserror::Error;

use crate::version::Version;

/// Core error type for netver operations.
#[derive(Debug, Error)]
pub enum NetverError {
    /// The live build identifier is not in the catalog.
    #[error("Build {build} is not in the .NET Core build catalog")]
    UnknownBuild { build: Version },

    /// An ambiguous build's commit hash matched none of the catalog entries.
    #[error("Build {build} with commit '{commit}' is not in the .NET Core build catalog")]
    UnknownCommit { build: Version, commit: String },

    /// The runtime family is recognized but detection is not implemented.
    #[error("Runtime '{description}' is not supported yet")]
    UnsupportedRuntime { description: String },

    /// The installed .NET Framework release code predates every known band.
    #[error("Unrecognized .NET Framework release code: {release}")]
    UnrecognizedLegacyRelease { release: u32 },

    /// The .NET Framework release registry key could not be read.
    #[error("Missing registry key for the .NET Framework installation")]
    MissingLegacyReleaseKey,

    /// A signal required by the current resolution step was not available.
    #[error("Required runtime signal is unavailable: {signal}")]
    MissingSignal { signal: &'static str },

    /// The persisted catalog could not be parsed.
    #[error("Failed to parse build catalog {source_name}: {message}")]
    CatalogParse {
        source_name: String,
        message: String,
    },

    /// The catalog parsed but breaks a structural rule.
    #[error("Invalid build catalog: {message}")]
    CatalogInvalid { message: String },

    /// A downloaded file does not match its published digest.
    #[error("For file {path}, expected hash {expected} but got {actual}")]
    DigestMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// The published digest has a length no supported algorithm produces.
    #[error("Unexpected hash length {length} for digest '{digest}'")]
    UnsupportedDigest { digest: String, length: usize },

    /// No runtime archive was published for the requested platform.
    #[error("Could not find a {rid} runtime archive for version {version}. Found these files: {found}")]
    NoMatchingArchive {
        version: String,
        rid: String,
        found: String,
    },

    /// More than one runtime archive matched the requested platform.
    #[error("Found {count} {rid} runtime archives for version {version}")]
    AmbiguousArchive {
        version: String,
        rid: String,
        count: usize,
    },

    /// Two releases ship the same runtime version with different contents.
    #[error("Hash mismatch between releases of runtime {version}")]
    ConflictingRuntimeDigest { version: Version },

    /// Fetching a URL failed.
    #[error("Failed to download {url}: {message}")]
    Download { url: String, message: String },

    /// Unpacking an archive failed.
    #[error("Failed to extract {archive}: {message}")]
    Extract { archive: PathBuf, message: String },

    /// The probe program exited unsuccessfully.
    #[error("Probe under {runtime} failed with exit code {code:?}")]
    ProbeFailed { runtime: PathBuf, code: Option<i32> },

    /// The probe program ran but printed something unexpected.
    #[error("Probe under {runtime} printed unexpected output: {message}")]
    ProbeOutput { runtime: PathBuf, message: String },

    /// The probe program did not finish before its deadline.
    #[error("Probe under {runtime} timed out after {seconds}s")]
    ProbeTimeout { runtime: PathBuf, seconds: u64 },

    /// One or more units of an inventory stage failed.
    #[error("{stage} failed for {} unit(s):{}", .failures.len(), format_failures(.failures))]
    StageFailed {
        stage: &'static str,
        failures: Vec<UnitFailure>,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A failed unit of work inside an inventory stage.
#[derive(Debug)]
pub struct UnitFailure {
    /// What the unit was (usually a runtime version).
    pub unit: String,
    /// Why it failed.
    pub error: NetverError,
}

fn format_failures(failures: &[UnitFailure]) -> String {
    let mut out = String::new();
    for failure in failures {
        let _ = write!(out, "\n  {}: {}", failure.unit, failure.error);
    }
    out
}

/// Result type alias for netver operations.
pub type Result<T> = std::result::Result<T, NetverError>;
