//! Grouping discovered builds into a catalog.

use std::collections::{BTreeMap, HashSet};

use crate::catalog::{BuildCatalog, BuildRecord, CommitVersion};
use crate::error::{NetverError, Result};
use crate::version::Version;

use super::probe::DiscoveredBuild;

/// Group `builds` by build identifier.
///
/// A build seen under one runtime becomes a direct record; a build shared
/// by several runtimes becomes a commit list ordered by runtime version.
/// Repeated commits within a group are kept, and the lowest runtime version
/// listed for them is the one the resolver reports.
pub fn catalog_from_discovered(builds: Vec<DiscoveredBuild>) -> Result<BuildCatalog> {
    let mut groups: BTreeMap<Version, Vec<DiscoveredBuild>> = BTreeMap::new();
    for build in builds {
        groups.entry(build.build).or_default().push(build);
    }

    let mut records = Vec::with_capacity(groups.len());
    for (build, mut group) in groups {
        if let [only] = group.as_slice() {
            records.push(BuildRecord::direct(build, only.runtime_version));
            continue;
        }

        group.sort_by_key(|b| b.runtime_version);
        let mut seen = HashSet::new();
        for entry in &group {
            if !seen.insert(entry.commit()) {
                tracing::warn!(
                    "Build {} has commit {} under more than one runtime ({})",
                    build,
                    entry.commit(),
                    entry.runtime_version
                );
            }
        }

        let commits = group
            .iter()
            .map(|b| CommitVersion {
                commit: b.commit().to_string(),
                version: b.runtime_version,
            })
            .collect();
        let record = BuildRecord::by_commit(build, commits).ok_or_else(|| {
            NetverError::CatalogInvalid {
                message: format!("build {} has no runtimes", build),
            }
        })?;
        records.push(record);
    }

    BuildCatalog::new(records)
}
