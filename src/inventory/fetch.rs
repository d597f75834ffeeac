//! Downloading runtime archives.
//!
//! A download is skipped when a file already at its destination passes
//! digest verification; a file that fails verification is deleted and
//! fetched again. Bodies stream into `<destination>.part` and are renamed
//! onto the destination only once complete and verified, so a file at the
//! destination is never a truncated download. A freshly downloaded file
//! that still fails verification is deleted and reported as
//! [`NetverError::DigestMismatch`].

use anyhow::Context;
use reqwest::blocking::Client;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{NetverError, Result};
use crate::version::Version;

use super::stage::WorkerPool;
use super::verify::{verify_or_delete, Verification};

/// Moves the bytes behind a URL into a writer.
pub trait Transport: Send + Sync {
    /// Stream the body at `url` into `out`, returning the byte count.
    fn fetch_to(&self, url: &str, out: &mut dyn Write) -> Result<u64>;
}

/// [`Transport`] over HTTP(S).
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("netver")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn fetch_to(&self, url: &str, out: &mut dyn Write) -> Result<u64> {
        let download_error = |message: String| NetverError::Download {
            url: url.to_string(),
            message,
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| download_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(download_error(format!("HTTP {}", response.status())));
        }

        std::io::copy(&mut response, out).map_err(|e| download_error(e.to_string()))
    }
}

/// One archive to bring onto local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDownload {
    pub version: Version,
    pub url: String,
    pub expected_digest: Option<String>,
    pub destination: PathBuf,
}

/// What [`Fetcher::ensure`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    AlreadyPresent,
    Downloaded { bytes: u64 },
}

/// Ensures verified archives exist at their destinations.
pub struct Fetcher {
    transport: Box<dyn Transport>,
}

impl Fetcher {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// A fetcher downloading over HTTP with the given per-file timeout.
    pub fn http(timeout: Duration) -> Result<Self> {
        Ok(Self::new(Box::new(HttpTransport::with_timeout(timeout)?)))
    }

    /// Make sure `pending.destination` holds a file matching the published
    /// digest, downloading it if needed.
    pub fn ensure(&self, pending: &PendingDownload) -> Result<FetchOutcome> {
        let expected = pending.expected_digest.as_deref();
        let destination = &pending.destination;

        if destination.exists() {
            if verify_or_delete(destination, expected)?.is_ok() {
                tracing::debug!("{} already downloaded", destination.display());
                return Ok(FetchOutcome::AlreadyPresent);
            }
            tracing::info!("Re-downloading {} after digest mismatch", pending.version);
        }

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let partial = partial_path(destination);
        tracing::info!("Downloading runtime {} from {}", pending.version, pending.url);
        let bytes = match self.download(&pending.url, &partial) {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = std::fs::remove_file(&partial);
                return Err(e);
            }
        };

        if let Verification::Mismatched { actual } = verify_or_delete(&partial, expected)? {
            return Err(NetverError::DigestMismatch {
                path: destination.clone(),
                expected: expected.unwrap_or_default().to_string(),
                actual,
            });
        }

        std::fs::rename(&partial, destination)?;
        Ok(FetchOutcome::Downloaded { bytes })
    }

    /// [`ensure`](Self::ensure) every download on `pool`.
    pub fn ensure_all(
        &self,
        pool: &WorkerPool,
        pending: &[PendingDownload],
    ) -> Result<Vec<FetchOutcome>> {
        pool.run("download", pending, |p| p.version.to_string(), |p| self.ensure(p))
    }

    fn download(&self, url: &str, partial: &Path) -> Result<u64> {
        let file = File::create(partial)?;
        let mut writer = BufWriter::new(file);
        let bytes = self.transport.fetch_to(url, &mut writer)?;
        writer.flush()?;
        Ok(bytes)
    }
}

/// `<destination>.part`, where an in-flight download lives.
pub fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}
