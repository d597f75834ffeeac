//! Four-part .NET style version numbers.
//!
//! .NET versions have between two and four numeric components
//! (`major.minor[.build[.revision]]`). Unlike semver, a missing component is
//! meaningful: `2.1` sorts before `2.1.0`, and the internal build
//! identifiers in the catalog always carry all four parts.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A `major.minor[.build[.revision]]` version.
///
/// # Example
///
/// ```
/// use netver::Version;
///
/// let v: Version = "4.6.26919.2".parse().unwrap();
/// assert_eq!(v.major(), 4);
/// assert_eq!(v.to_string(), "4.6.26919.2");
/// assert!("2.1".parse::<Version>().unwrap() < "2.1.0".parse().unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u32,
    minor: u32,
    build: Option<u32>,
    revision: Option<u32>,
}

/// Error returned when a string is not a valid version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version '{input}': {reason}")]
pub struct ParseVersionError {
    input: String,
    reason: &'static str,
}

impl Version {
    /// A two-part version.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            build: None,
            revision: None,
        }
    }

    /// A three-part version.
    pub const fn with_build(major: u32, minor: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            build: Some(build),
            revision: None,
        }
    }

    /// A four-part version.
    pub const fn with_revision(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            build: Some(build),
            revision: Some(revision),
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn build(&self) -> Option<u32> {
        self.build
    }

    pub fn revision(&self) -> Option<u32> {
        self.revision
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{}", build)?;
            if let Some(revision) = self.revision {
                write!(f, ".{}", revision)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParseVersionError {
            input: s.to_string(),
            reason,
        };

        let parts: Vec<&str> = s.trim().split('.').collect();
        if !(2..=4).contains(&parts.len()) {
            return Err(err("expected 2 to 4 dot-separated components"));
        }

        let mut numbers = Vec::with_capacity(parts.len());
        for part in parts {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err("components must be non-negative integers"));
            }
            numbers.push(part.parse::<u32>().map_err(|_| err("component out of range"))?);
        }

        Ok(Self {
            major: numbers[0],
            minor: numbers[1],
            build: numbers.get(2).copied(),
            revision: numbers.get(3).copied(),
        })
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for Version {
    fn schema_name() -> Cow<'static, str> {
        "Version".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        schemars::json_schema!({
            "type": "string",
            "pattern": r"^\d+\.\d+(\.\d+(\.\d+)?)?$",
            "description": "major.minor[.build[.revision]]"
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_to_four_components() {
        assert_eq!("4.8".parse::<Version>().unwrap(), Version::new(4, 8));
        assert_eq!(
            "2.1.5".parse::<Version>().unwrap(),
            Version::with_build(2, 1, 5)
        );
        assert_eq!(
            "4.6.26328.1".parse::<Version>().unwrap(),
            Version::with_revision(4, 6, 26328, 1)
        );
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "4", "1.2.3.4.5", "1.x", "1..2", "-1.0", "2.1.0-rc1"] {
            assert!(bad.parse::<Version>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn display_keeps_component_count() {
        for s in ["4.8", "4.8.1", "4.0.30319.42000"] {
            assert_eq!(s.parse::<Version>().unwrap().to_string(), s);
        }
    }

    #[test]
    fn missing_components_sort_first() {
        let short: Version = "2.1".parse().unwrap();
        let long: Version = "2.1.0".parse().unwrap();
        assert!(short < long);
        assert!("1.0.9".parse::<Version>().unwrap() < "1.0.10".parse().unwrap());
        assert!("1.1.8".parse::<Version>().unwrap() < "2.0.7".parse().unwrap());
    }

    #[test]
    fn serializes_as_string() {
        let v = Version::with_build(2, 1, 5);
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"2.1.5\"");
        let back: Version = serde_json::from_str("\"2.1.5\"").unwrap();
        assert_eq!(back, v);
        assert!(serde_json::from_str::<Version>("\"nope\"").is_err());
    }

    #[test]
    fn error_mentions_input() {
        let err = "abc".parse::<Version>().unwrap_err();
        assert!(err.to_string().contains("abc"));
    }
}
