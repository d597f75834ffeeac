//! Catalog rows.

use std::borrow::Cow;

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};

use crate::version::Version;

/// One public release built from an ambiguous build identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CommitVersion {
    /// Source commit hash, the last token of the informational version.
    pub commit: String,
    /// Public .NET Core version built from that commit.
    pub version: Version,
}

/// How a build identifier maps to a public version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildResolution {
    /// The build identifier belongs to exactly one release.
    Direct(Version),
    /// Several releases share the build identifier; the commit hash decides.
    ByCommit(Vec<CommitVersion>),
}

/// One row of the catalog, keyed by the core library's file version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBuildRecord", into = "RawBuildRecord")]
pub struct BuildRecord {
    build: Version,
    resolution: BuildResolution,
}

impl BuildRecord {
    /// A build identifier that names a single release.
    pub fn direct(build: Version, version: Version) -> Self {
        Self {
            build,
            resolution: BuildResolution::Direct(version),
        }
    }

    /// A build identifier shared by several releases.
    ///
    /// Returns `None` when `commits` is empty.
    pub fn by_commit(build: Version, commits: Vec<CommitVersion>) -> Option<Self> {
        if commits.is_empty() {
            return None;
        }
        Some(Self {
            build,
            resolution: BuildResolution::ByCommit(commits),
        })
    }

    pub fn build(&self) -> Version {
        self.build
    }

    pub fn resolution(&self) -> &BuildResolution {
        &self.resolution
    }

    /// Look up the public version for a commit hash.
    ///
    /// Direct records ignore the commit. For ambiguous records the first
    /// matching entry wins, so a hash that appears twice always resolves to
    /// the entry listed first.
    pub fn version_for(&self, commit: Option<&str>) -> Option<Version> {
        match &self.resolution {
            BuildResolution::Direct(version) => Some(*version),
            BuildResolution::ByCommit(commits) => {
                let commit = commit?;
                commits
                    .iter()
                    .find(|entry| entry.commit == commit)
                    .map(|entry| entry.version)
            }
        }
    }

    /// Whether the commit hash is needed to resolve this build.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self.resolution, BuildResolution::ByCommit(_))
    }
}

impl JsonSchema for BuildRecord {
    fn schema_name() -> Cow<'static, str> {
        "BuildRecord".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        RawBuildRecord::json_schema(generator)
    }
}

/// On-disk form of a [`BuildRecord`]: exactly one of `version` / `commits`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
struct RawBuildRecord {
    /// Internal build identifier (System.Private.CoreLib file version).
    build: Version,
    /// Public version, when the build identifier is unique.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<Version>,
    /// Commit hash to public version, when the build identifier is shared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    commits: Option<Vec<CommitVersion>>,
}

impl TryFrom<RawBuildRecord> for BuildRecord {
    type Error = String;

    fn try_from(raw: RawBuildRecord) -> Result<Self, Self::Error> {
        match (raw.version, raw.commits) {
            (Some(version), None) => Ok(BuildRecord::direct(raw.build, version)),
            (None, Some(commits)) => BuildRecord::by_commit(raw.build, commits)
                .ok_or_else(|| format!("build {} has an empty commit list", raw.build)),
            (Some(_), Some(_)) => Err(format!(
                "build {} has both a version and a commit list",
                raw.build
            )),
            (None, None) => Err(format!(
                "build {} has neither a version nor a commit list",
                raw.build
            )),
        }
    }
}

impl From<BuildRecord> for RawBuildRecord {
    fn from(record: BuildRecord) -> Self {
        let (version, commits) = match record.resolution {
            BuildResolution::Direct(version) => (Some(version), None),
            BuildResolution::ByCommit(commits) => (None, Some(commits)),
        };
        Self {
            build: record.build,
            version,
            commits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn direct_record_ignores_commit() {
        let record = BuildRecord::direct(v("4.6.26919.2"), v("2.1.5"));
        assert_eq!(record.version_for(None), Some(v("2.1.5")));
        assert_eq!(record.version_for(Some("anything")), Some(v("2.1.5")));
        assert!(!record.is_ambiguous());
    }

    #[test]
    fn ambiguous_record_needs_matching_commit() {
        let record = BuildRecord::by_commit(
            v("4.6.26011.1"),
            vec![
                CommitVersion {
                    commit: "f2153aa".into(),
                    version: v("1.0.9"),
                },
                CommitVersion {
                    commit: "43a8539".into(),
                    version: v("1.1.6"),
                },
            ],
        )
        .unwrap();
        assert!(record.is_ambiguous());
        assert_eq!(record.version_for(Some("43a8539")), Some(v("1.1.6")));
        assert_eq!(record.version_for(Some("0000000")), None);
        assert_eq!(record.version_for(None), None);
    }

    #[test]
    fn empty_commit_list_is_rejected() {
        assert!(BuildRecord::by_commit(v("4.6.1.0"), Vec::new()).is_none());
    }

    #[test]
    fn serializes_direct_record_without_commits() {
        let record = BuildRecord::direct(v("4.6.1.0"), v("2.0.0"));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"build":"4.6.1.0","version":"2.0.0"}"#);
    }

    #[test]
    fn deserialize_rejects_both_or_neither() {
        let both = r#"{"build":"4.6.1.0","version":"2.0.0","commits":[{"commit":"a","version":"1.0.0"}]}"#;
        let err = serde_json::from_str::<BuildRecord>(both).unwrap_err();
        assert!(err.to_string().contains("both"));

        let neither = r#"{"build":"4.6.1.0"}"#;
        let err = serde_json::from_str::<BuildRecord>(neither).unwrap_err();
        assert!(err.to_string().contains("neither"));

        let empty = r#"{"build":"4.6.1.0","commits":[]}"#;
        assert!(serde_json::from_str::<BuildRecord>(empty).is_err());
    }

    #[test]
    fn deserialize_rejects_unknown_fields() {
        let json = r#"{"build":"4.6.1.0","version":"2.0.0","extra":1}"#;
        assert!(serde_json::from_str::<BuildRecord>(json).is_err());
    }
}
