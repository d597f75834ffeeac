//! The .NET Core build catalog.
//!
//! Before 3.0, .NET Core does not tell a running program its own version.
//! What it does expose is the file version of `System.Private.CoreLib`
//! (the "build identifier") and its informational version, whose last token
//! is a source commit hash. The catalog maps build identifiers back to
//! public release versions; where several releases share one build
//! identifier, the commit hash picks between them.
//!
//! The catalog is produced by the inventory builder and shipped as
//! `data/build_catalog.json`, embedded at compile time. The same JSON
//! format is what `netver scrape` writes, so a freshly scraped catalog can
//! be loaded with [`BuildCatalog::load`] without any code generation.

pub mod record;

pub use record::{BuildRecord, BuildResolution, CommitVersion};

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{NetverError, Result};
use crate::version::Version;

/// Embedded catalog produced by the last scrape.
const EMBEDDED_CATALOG: &str = include_str!("../../data/build_catalog.json");

/// Ordered, read-only table of build records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BuildCatalog {
    /// Records sorted by build identifier.
    records: Vec<BuildRecord>,
}

impl BuildCatalog {
    /// Build a catalog from records, sorting them by build identifier.
    ///
    /// Fails if two records share a build identifier.
    pub fn new(mut records: Vec<BuildRecord>) -> Result<Self> {
        records.sort_by_key(|r| r.build());
        let catalog = Self { records };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog compiled into this binary.
    pub fn embedded() -> Result<&'static BuildCatalog> {
        static EMBEDDED: OnceLock<BuildCatalog> = OnceLock::new();

        if let Some(catalog) = EMBEDDED.get() {
            return Ok(catalog);
        }
        let parsed = Self::from_json(EMBEDDED_CATALOG, "data/build_catalog.json")?;
        Ok(EMBEDDED.get_or_init(|| parsed))
    }

    /// Parse a catalog from its JSON form.
    pub fn from_json(json: &str, source_name: &str) -> Result<Self> {
        let catalog: BuildCatalog =
            serde_json::from_str(json).map_err(|e| NetverError::CatalogParse {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog file written by `netver scrape`.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json, &path.display().to_string())
    }

    /// Serialize to pretty JSON with a trailing newline.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self).map_err(anyhow::Error::from)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the catalog to a file.
    ///
    /// The JSON goes to `<path>.tmp` first and is renamed into place, so
    /// `path` never holds a partial catalog.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, self.to_json_pretty()?)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// JSON Schema for the persisted format.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(BuildCatalog)).unwrap_or_default()
    }

    /// Find the record for a build identifier.
    pub fn get(&self, build: &Version) -> Option<&BuildRecord> {
        self.records
            .binary_search_by_key(build, |r| r.build())
            .ok()
            .map(|index| &self.records[index])
    }

    /// All records in build-identifier order.
    pub fn records(&self) -> &[BuildRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn validate(&self) -> Result<()> {
        for pair in self.records.windows(2) {
            let (a, b) = (pair[0].build(), pair[1].build());
            if a == b {
                return Err(NetverError::CatalogInvalid {
                    message: format!("build {} appears more than once", a),
                });
            }
            if a > b {
                return Err(NetverError::CatalogInvalid {
                    message: format!("build {} is listed after {}", b, a),
                });
            }
        }
        Ok(())
    }
}
