//! Building the catalog from published runtimes.
//!
//! The builder walks every pre-3.0 .NET Core release, downloads and
//! verifies its runtime archive, extracts it, runs a probe program under it
//! and groups what the probes report into a [`BuildCatalog`].
//!
//! - [`source`] - release metadata
//! - [`select`] - picking one archive per runtime version
//! - [`fetch`] / [`verify`] - downloading with digest checks
//! - [`extract`] - unpacking with a completion marker
//! - [`probe`] - running the probe program
//! - [`group`] - turning probe results into records
//! - [`stage`] - bounded parallel execution with aggregated failures
//!
//! On disk, everything for one platform lives under `<root>/<rid>/`:
//! archives in `downloads/`, runtimes in `extracted/<runtime version>/`.

pub mod extract;
pub mod fetch;
pub mod group;
pub mod platform;
pub mod probe;
pub mod select;
pub mod source;
pub mod stage;
pub mod verify;

pub use extract::{ArchiveFormat, ExtractOutcome, Extractor};
pub use fetch::{FetchOutcome, Fetcher, HttpTransport, PendingDownload, Transport};
pub use group::catalog_from_discovered;
pub use platform::Platform;
pub use probe::{BuildProbe, DiscoveredBuild, ProbeOutput, ProbeRunner};
pub use select::SelectedRuntime;
pub use source::{HttpReleaseSource, ReleaseSource, DEFAULT_INDEX_URL};
pub use stage::WorkerPool;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::BuildCatalog;
use crate::error::Result;
use crate::version::Version;

/// Resolved configuration for one inventory run.
#[derive(Debug, Clone)]
pub struct InventoryOptions {
    /// Root for downloads and extracted runtimes.
    pub dotnets_root: PathBuf,
    pub platform: Platform,
    /// Only walk this channel, e.g. `2.1`.
    pub channel: Option<String>,
    /// Skip discovery, download and extraction; probe what is on disk.
    pub offline: bool,
    /// Directory holding `netcoreappX.Y/<probe assembly>` builds.
    pub probe_root: PathBuf,
    pub probe_assembly: String,
    /// Worker count; 0 means one per CPU.
    pub jobs: usize,
    pub index_url: String,
    pub download_timeout: Duration,
    pub probe_timeout: Duration,
    pub show_progress: bool,
}

impl InventoryOptions {
    /// Options for the host platform with default timeouts.
    pub fn new(dotnets_root: impl Into<PathBuf>, probe_root: impl Into<PathBuf>) -> Self {
        Self {
            dotnets_root: dotnets_root.into(),
            platform: Platform::host(),
            channel: None,
            offline: false,
            probe_root: probe_root.into(),
            probe_assembly: probe::DEFAULT_PROBE_ASSEMBLY.to_string(),
            jobs: 0,
            index_url: DEFAULT_INDEX_URL.to_string(),
            download_timeout: Duration::from_secs(600),
            probe_timeout: probe::DEFAULT_PROBE_TIMEOUT,
            show_progress: false,
        }
    }

    /// `~/dotnets`, if there is a home directory.
    pub fn default_dotnets_root() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join("dotnets"))
    }
}

/// Where one platform's downloads and runtimes live.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    platform_root: PathBuf,
}

impl StorageLayout {
    pub fn new(dotnets_root: &Path, platform: &Platform) -> Self {
        Self {
            platform_root: dotnets_root.join(platform.rid()),
        }
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.platform_root.join("downloads")
    }

    pub fn extracted_dir(&self) -> PathBuf {
        self.platform_root.join("extracted")
    }

    pub fn archive_path(&self, file_name: &str) -> PathBuf {
        self.downloads_dir().join(file_name)
    }

    pub fn runtime_dir(&self, version: Version) -> PathBuf {
        self.extracted_dir().join(version.to_string())
    }

    /// Runtime directories with a completed extraction, by version.
    pub fn extracted_runtimes(&self) -> Result<Vec<(Version, PathBuf)>> {
        let dir = self.extracted_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut runtimes = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            let Some(version) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.parse::<Version>().ok())
            else {
                tracing::debug!("Ignoring {}", path.display());
                continue;
            };
            if !Extractor::is_extracted(&path) {
                tracing::warn!("Skipping incomplete extraction {}", path.display());
                continue;
            }
            runtimes.push((version, path));
        }
        runtimes.sort();
        Ok(runtimes)
    }
}

/// Produces a [`BuildCatalog`] from published runtimes.
pub struct InventoryBuilder {
    options: InventoryOptions,
    layout: StorageLayout,
    pool: WorkerPool,
    source: Box<dyn ReleaseSource>,
    fetcher: Fetcher,
    probe: Box<dyn BuildProbe>,
}

impl InventoryBuilder {
    /// A builder using HTTP for metadata and downloads and the real probe.
    pub fn new(options: InventoryOptions) -> Result<Self> {
        let source = HttpReleaseSource::new(options.index_url.clone())?;
        let fetcher = Fetcher::http(options.download_timeout)?;
        let probe = ProbeRunner::new(options.probe_root.clone(), options.platform.clone())
            .with_assembly(options.probe_assembly.clone())
            .with_timeout(options.probe_timeout);

        Ok(Self {
            layout: StorageLayout::new(&options.dotnets_root, &options.platform),
            pool: WorkerPool::new(options.jobs, options.show_progress)?,
            source: Box::new(source),
            fetcher,
            probe: Box::new(probe),
            options,
        })
    }

    pub fn with_source(mut self, source: Box<dyn ReleaseSource>) -> Self {
        self.source = source;
        self
    }

    pub fn with_transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.fetcher = Fetcher::new(transport);
        self
    }

    pub fn with_probe(mut self, probe: Box<dyn BuildProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Run every stage and return the grouped catalog.
    pub fn build(&self) -> Result<BuildCatalog> {
        let targets = if self.options.offline {
            tracing::info!("Offline: probing runtimes already extracted");
            self.extracted_in_channel()?
        } else {
            let runtimes = self.discover()?;
            self.download(&runtimes)?;
            self.extract(&runtimes)?;
            runtimes
                .iter()
                .map(|runtime| (runtime.version, self.layout.runtime_dir(runtime.version)))
                .collect()
        };

        let builds = self.probe_all(&targets)?;
        let catalog = catalog_from_discovered(builds)?;
        tracing::info!("Catalog has {} build(s)", catalog.len());
        Ok(catalog)
    }

    /// Select one archive per pre-3.0 runtime version.
    pub fn discover(&self) -> Result<Vec<SelectedRuntime>> {
        let runtimes = select::enumerate_runtimes(
            self.source.as_ref(),
            &self.options.platform,
            self.options.channel.as_deref(),
        )?;
        tracing::info!(
            "Found {} runtime(s) for {}",
            runtimes.len(),
            self.options.platform
        );
        Ok(runtimes)
    }

    pub fn download(&self, runtimes: &[SelectedRuntime]) -> Result<Vec<FetchOutcome>> {
        let pending: Vec<PendingDownload> = runtimes
            .iter()
            .map(|runtime| PendingDownload {
                version: runtime.version,
                url: runtime.file.url.clone(),
                expected_digest: runtime.file.hash.clone(),
                destination: self.layout.archive_path(runtime.file.file_name()),
            })
            .collect();
        self.fetcher.ensure_all(&self.pool, &pending)
    }

    pub fn extract(&self, runtimes: &[SelectedRuntime]) -> Result<Vec<ExtractOutcome>> {
        let extractor = Extractor::new(self.options.platform.archive_format());
        self.pool.run(
            "extract",
            runtimes,
            |runtime| runtime.version.to_string(),
            |runtime| {
                extractor.extract(
                    &self.layout.archive_path(runtime.file.file_name()),
                    &self.layout.runtime_dir(runtime.version),
                )
            },
        )
    }

    /// Completed runtime directories, limited to the requested channel.
    fn extracted_in_channel(&self) -> Result<Vec<(Version, PathBuf)>> {
        let mut runtimes = self.layout.extracted_runtimes()?;
        if let Some(channel) = self.options.channel.as_deref() {
            runtimes.retain(|(version, _)| {
                format!("{}.{}", version.major(), version.minor()) == channel
            });
        }
        Ok(runtimes)
    }

    /// Probe each runtime directory; results come back in runtime version order.
    pub fn probe_all(&self, runtimes: &[(Version, PathBuf)]) -> Result<Vec<DiscoveredBuild>> {
        let mut builds = self.pool.run(
            "probe",
            runtimes,
            |(version, _)| version.to_string(),
            |(version, dir)| self.probe.probe(dir, *version),
        )?;
        builds.sort_by_key(|b| b.runtime_version);
        Ok(builds)
    }
}
