//! Runtime identifiers (RIDs) and what they imply about archives.

use std::fmt;

use super::extract::ArchiveFormat;

/// A .NET runtime identifier such as `linux-x64` or `win-x86`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    rid: String,
}

impl Platform {
    pub fn new(rid: impl Into<String>) -> Self {
        Self { rid: rid.into() }
    }

    /// The RID of the machine netver is running on.
    pub fn host() -> Self {
        let os = match std::env::consts::OS {
            "windows" => "win",
            "macos" => "osx",
            other => other,
        };
        let arch = match std::env::consts::ARCH {
            "x86_64" => "x64",
            "aarch64" => "arm64",
            other => other,
        };
        Self::new(format!("{}-{}", os, arch))
    }

    pub fn rid(&self) -> &str {
        &self.rid
    }

    pub fn is_windows(&self) -> bool {
        self.rid.starts_with("win-")
    }

    /// Runtime archives are zips on Windows and gzipped tarballs elsewhere.
    pub fn archive_format(&self) -> ArchiveFormat {
        if self.is_windows() {
            ArchiveFormat::Zip
        } else {
            ArchiveFormat::TarGz
        }
    }

    pub fn archive_extension(&self) -> &'static str {
        self.archive_format().extension()
    }

    /// Name of the `dotnet` host executable.
    pub fn host_executable(&self) -> &'static str {
        if self.is_windows() {
            "dotnet.exe"
        } else {
            "dotnet"
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rid)
    }
}
