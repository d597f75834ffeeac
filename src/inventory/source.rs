//! .NET release metadata.
//!
//! Microsoft publishes a `releases-index.json` listing every product channel
//! ("1.0", "2.1", ...) and, per channel, a `releases.json` with every release
//! and the files it shipped. Only the fields the inventory needs are
//! modelled; everything else in the documents is ignored.

use anyhow::Context;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{NetverError, Result};

/// Where the public release metadata index lives.
pub const DEFAULT_INDEX_URL: &str =
    "https://dotnetcli.blob.core.windows.net/dotnet/release-metadata/releases-index.json";

/// One product channel from the release index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseChannel {
    /// e.g. `2.1`.
    pub channel_version: String,
    /// URL of the channel's `releases.json`.
    #[serde(rename = "releases.json")]
    pub releases_json: String,
}

impl ReleaseChannel {
    /// Major version of the channel, if the channel version is numeric.
    pub fn major(&self) -> Option<u32> {
        self.channel_version.split('.').next()?.parse().ok()
    }
}

/// One public release of a channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProductRelease {
    /// Public release version, e.g. `2.1.5`.
    pub release_version: String,
    /// The runtime shipped with the release; absent for SDK-only releases.
    #[serde(default)]
    pub runtime: Option<RuntimeRelease>,
}

/// The runtime component of a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuntimeRelease {
    /// Runtime version; prerelease versions carry a `-` suffix.
    pub version: String,
    #[serde(default)]
    pub files: Vec<ReleaseFile>,
}

impl RuntimeRelease {
    pub fn is_prerelease(&self) -> bool {
        self.version.contains('-')
    }
}

/// One downloadable file of a runtime release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseFile {
    pub name: String,
    #[serde(default)]
    pub rid: Option<String>,
    pub url: String,
    /// Hex SHA-256 or SHA-512; older releases sometimes omit it.
    #[serde(default)]
    pub hash: Option<String>,
}

impl ReleaseFile {
    /// File name to store the download under: the last URL segment, which
    /// unlike `name` includes the version.
    pub fn file_name(&self) -> &str {
        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        match path.rsplit('/').next() {
            Some(segment) if !segment.is_empty() => segment,
            _ => &self.name,
        }
    }
}

/// Read access to published release metadata.
pub trait ReleaseSource: Send + Sync {
    /// Every product channel.
    fn channels(&self) -> Result<Vec<ReleaseChannel>>;

    /// Every release of one channel, newest first as published.
    fn releases(&self, channel: &ReleaseChannel) -> Result<Vec<ProductRelease>>;
}

#[derive(Deserialize)]
struct ReleasesIndex {
    #[serde(rename = "releases-index")]
    releases_index: Vec<ReleaseChannel>,
}

#[derive(Deserialize)]
struct ChannelReleases {
    releases: Vec<ProductRelease>,
}

/// Reads release metadata over HTTP.
pub struct HttpReleaseSource {
    client: Client,
    index_url: String,
}

impl HttpReleaseSource {
    /// Create a source reading the given index with a 30-second timeout.
    pub fn new(index_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(index_url, Duration::from_secs(30))
    }

    pub fn with_timeout(index_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("netver")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            index_url: index_url.into(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let download_error = |message: String| NetverError::Download {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| download_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(download_error(format!("HTTP {}", response.status())));
        }

        response
            .json()
            .map_err(|e| download_error(format!("invalid release metadata: {}", e)))
    }
}

impl ReleaseSource for HttpReleaseSource {
    fn channels(&self) -> Result<Vec<ReleaseChannel>> {
        let index: ReleasesIndex = self.get_json(&self.index_url)?;
        Ok(index.releases_index)
    }

    fn releases(&self, channel: &ReleaseChannel) -> Result<Vec<ProductRelease>> {
        tracing::debug!("Fetching releases for channel {}", channel.channel_version);
        let releases: ChannelReleases = self.get_json(&channel.releases_json)?;
        Ok(releases.releases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const INDEX: &str = r#"{
        "releases-index": [
            {
                "channel-version": "2.1",
                "latest-release": "2.1.30",
                "product": ".NET Core",
                "releases.json": "RELEASES_URL"
            }
        ]
    }"#;

    const RELEASES: &str = r#"{
        "channel-version": "2.1",
        "releases": [
            {
                "release-version": "2.1.5",
                "release-date": "2018-10-02",
                "runtime": {
                    "version": "2.1.5",
                    "version-display": "2.1.5",
                    "files": [
                        {
                            "name": "dotnet-runtime-linux-x64.tar.gz",
                            "rid": "linux-x64",
                            "url": "https://download.example/2.1.5/dotnet-runtime-2.1.5-linux-x64.tar.gz",
                            "hash": "abcd"
                        },
                        {
                            "name": "dotnet-runtime-osx-x64.pkg",
                            "rid": "osx-x64",
                            "url": "https://download.example/2.1.5/dotnet-runtime-2.1.5-osx-x64.pkg"
                        }
                    ]
                }
            },
            {
                "release-version": "2.1.300",
                "runtime": null
            }
        ]
    }"#;

    #[test]
    fn reads_index_and_channel_releases() {
        let server = MockServer::start();
        let releases_url = server.url("/2.1/releases.json");

        server.mock(|when, then| {
            when.method(GET).path("/releases-index.json");
            then.status(200)
                .header("content-type", "application/json")
                .body(INDEX.replace("RELEASES_URL", &releases_url));
        });
        server.mock(|when, then| {
            when.method(GET).path("/2.1/releases.json");
            then.status(200)
                .header("content-type", "application/json")
                .body(RELEASES);
        });

        let source = HttpReleaseSource::new(server.url("/releases-index.json")).unwrap();
        let channels = source.channels().unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].major(), Some(2));

        let releases = source.releases(&channels[0]).unwrap();
        assert_eq!(releases.len(), 2);
        let runtime = releases[0].runtime.as_ref().unwrap();
        assert_eq!(runtime.files.len(), 2);
        assert_eq!(runtime.files[0].hash.as_deref(), Some("abcd"));
        assert!(runtime.files[1].hash.is_none());
        assert!(releases[1].runtime.is_none());
    }

    #[test]
    fn http_error_is_a_download_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/releases-index.json");
            then.status(503);
        });

        let source = HttpReleaseSource::new(server.url("/releases-index.json")).unwrap();
        let err = source.channels().unwrap_err();
        assert!(matches!(err, NetverError::Download { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn file_name_comes_from_url() {
        let file = ReleaseFile {
            name: "dotnet-runtime-linux-x64.tar.gz".into(),
            rid: Some("linux-x64".into()),
            url: "https://download.example/a/dotnet-runtime-2.1.5-linux-x64.tar.gz?sv=1".into(),
            hash: None,
        };
        assert_eq!(file.file_name(), "dotnet-runtime-2.1.5-linux-x64.tar.gz");

        let bare = ReleaseFile {
            url: "https://download.example/".into(),
            ..file
        };
        assert_eq!(bare.file_name(), "dotnet-runtime-linux-x64.tar.gz");
    }

    #[test]
    fn prerelease_runtime_detected_by_suffix() {
        let runtime = RuntimeRelease {
            version: "2.1.0-rc1".into(),
            files: Vec::new(),
        };
        assert!(runtime.is_prerelease());
    }
}
