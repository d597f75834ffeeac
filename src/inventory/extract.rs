//! Unpacking runtime archives.
//!
//! A directory is only considered extracted once a completion marker has
//! been written after a successful unpack. A non-empty directory without the
//! marker is left over from an interrupted run and is cleared first.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{NetverError, Result};

/// File written into a runtime directory once extraction finished.
pub const COMPLETION_MARKER: &str = ".netver-extracted";

/// Container format of a runtime archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Zip => ".zip",
            Self::TarGz => ".tar.gz",
        }
    }
}

/// What [`Extractor::extract`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    AlreadyExtracted,
    Extracted,
}

/// Unpacks archives of one format into per-runtime directories.
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    format: ArchiveFormat,
}

impl Extractor {
    pub fn new(format: ArchiveFormat) -> Self {
        Self { format }
    }

    /// Whether `dest` holds a completed extraction.
    pub fn is_extracted(dest: &Path) -> bool {
        dest.join(COMPLETION_MARKER).is_file()
    }

    /// Unpack `archive` into `dest` unless that already happened.
    pub fn extract(&self, archive: &Path, dest: &Path) -> Result<ExtractOutcome> {
        if Self::is_extracted(dest) {
            tracing::debug!("{} already extracted", dest.display());
            return Ok(ExtractOutcome::AlreadyExtracted);
        }

        if dest.exists() && dest.read_dir()?.next().is_some() {
            tracing::warn!("Clearing incomplete extraction in {}", dest.display());
            std::fs::remove_dir_all(dest)?;
        }
        std::fs::create_dir_all(dest)?;

        tracing::info!("Extracting {}", archive.display());
        self.unpack(archive, dest).map_err(|message| NetverError::Extract {
            archive: archive.to_path_buf(),
            message,
        })?;

        std::fs::write(dest.join(COMPLETION_MARKER), "")?;
        Ok(ExtractOutcome::Extracted)
    }

    fn unpack(&self, archive: &Path, dest: &Path) -> std::result::Result<(), String> {
        let file = File::open(archive).map_err(|e| e.to_string())?;
        match self.format {
            ArchiveFormat::Zip => {
                let mut zip = zip::ZipArchive::new(BufReader::new(file)).map_err(|e| e.to_string())?;
                zip.extract(dest).map_err(|e| e.to_string())
            }
            ArchiveFormat::TarGz => {
                let mut tar = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
                tar.set_preserve_permissions(true);
                tar.unpack(dest).map_err(|e| e.to_string())
            }
        }
    }
}
