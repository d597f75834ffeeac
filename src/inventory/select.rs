//! Choosing which runtime archives to download.
//!
//! Selection is pure: it only looks at release metadata and never touches the
//! network or the filesystem, so every rule here is testable in isolation.

use std::collections::BTreeMap;

use crate::error::{NetverError, Result, UnitFailure};
use crate::version::Version;

use super::platform::Platform;
use super::source::{ProductRelease, ReleaseChannel, ReleaseFile, ReleaseSource};

/// First major version that reports its own version at run time and so
/// never needs a catalog entry.
pub const CUTOVER_MAJOR: u32 = 3;

/// Rebuilt only for ASP.NET Core; its runtime archive duplicates 2.0.7 under
/// a different hash.
const ASPNET_ONLY_REBUILD: &str = "2.0.8";

/// Published without a runtime archive for any RID.
const RELEASE_WITHOUT_ARCHIVES: &str = "1.0.2";

/// A runtime archive chosen for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedRuntime {
    pub version: Version,
    pub file: ReleaseFile,
}

/// Enumerate pre-cutover channels from `source` and select their runtimes.
///
/// `channel` restricts the walk to one channel version such as `2.1`.
pub fn enumerate_runtimes(
    source: &dyn ReleaseSource,
    platform: &Platform,
    channel: Option<&str>,
) -> Result<Vec<SelectedRuntime>> {
    let channels: Vec<ReleaseChannel> = source
        .channels()?
        .into_iter()
        .filter(|c| is_pre_cutover(c))
        .filter(|c| channel.is_none_or(|wanted| c.channel_version == wanted))
        .collect();

    tracing::debug!(
        "Selected channels: {}",
        channels
            .iter()
            .map(|c| c.channel_version.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut releases = Vec::new();
    for channel in &channels {
        releases.extend(source.releases(channel)?);
    }

    select_runtimes(&releases, platform)
}

fn is_pre_cutover(channel: &ReleaseChannel) -> bool {
    match channel.major() {
        Some(major) => major < CUTOVER_MAJOR,
        None => {
            tracing::warn!(
                "Skipping channel with non-numeric version '{}'",
                channel.channel_version
            );
            false
        }
    }
}

/// Pick one archive per distinct runtime version for `platform`.
///
/// Prerelease runtimes and releases without a runtime are skipped. When
/// several releases ship the same runtime version their archives must carry
/// the same digest. Every problem across all releases is reported together
/// in a single [`NetverError::StageFailed`].
pub fn select_runtimes(
    releases: &[ProductRelease],
    platform: &Platform,
) -> Result<Vec<SelectedRuntime>> {
    let mut selected: BTreeMap<Version, ReleaseFile> = BTreeMap::new();
    let mut failures = Vec::new();

    for release in releases {
        let Some(runtime) = &release.runtime else {
            continue;
        };
        if runtime.is_prerelease() || release.release_version == ASPNET_ONLY_REBUILD {
            continue;
        }

        let version: Version = match runtime.version.parse() {
            Ok(version) => version,
            Err(e) => {
                failures.push(UnitFailure {
                    unit: release.release_version.clone(),
                    error: NetverError::Other(e.into()),
                });
                continue;
            }
        };

        let file = match archive_for(&release.release_version, &runtime.files, platform) {
            Ok(Some(file)) => file,
            Ok(None) => continue,
            Err(error) => {
                failures.push(UnitFailure {
                    unit: release.release_version.clone(),
                    error,
                });
                continue;
            }
        };

        match selected.get(&version) {
            Some(existing) if existing.hash != file.hash => failures.push(UnitFailure {
                unit: release.release_version.clone(),
                error: NetverError::ConflictingRuntimeDigest { version },
            }),
            Some(_) => {}
            None => {
                selected.insert(version, file.clone());
            }
        }
    }

    if !failures.is_empty() {
        return Err(NetverError::StageFailed {
            stage: "select",
            failures,
        });
    }

    Ok(selected
        .into_iter()
        .map(|(version, file)| SelectedRuntime { version, file })
        .collect())
}

/// The one archive of a release matching the platform's RID and archive
/// extension. `Ok(None)` means the release is known to ship none.
fn archive_for(
    release_version: &str,
    files: &[ReleaseFile],
    platform: &Platform,
) -> Result<Option<ReleaseFile>> {
    let extension = platform.archive_extension();
    let matches: Vec<&ReleaseFile> = files
        .iter()
        .filter(|f| f.rid.as_deref() == Some(platform.rid()) && f.file_name().ends_with(extension))
        .collect();

    match matches.as_slice() {
        [file] => Ok(Some((*file).clone())),
        [] if release_version == RELEASE_WITHOUT_ARCHIVES => {
            tracing::debug!("Release {} ships no runtime archives", release_version);
            Ok(None)
        }
        [] => Err(NetverError::NoMatchingArchive {
            version: release_version.to_string(),
            rid: platform.rid().to_string(),
            found: files
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }),
        many => Err(NetverError::AmbiguousArchive {
            version: release_version.to_string(),
            rid: platform.rid().to_string(),
            count: many.len(),
        }),
    }
}
