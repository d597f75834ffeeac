//! .NET Framework 4.x release codes.
//!
//! Every .NET Framework 4.x install updates the `Release` DWORD under
//! `NDP\v4\Full`. Codes grow monotonically with versions; a few versions
//! have a lower minimum on the OS release they shipped in-box with.

use crate::error::{NetverError, Result};
use crate::version::Version;

/// (minimum release code, version), highest first.
const RELEASE_BANDS: &[(u32, Version)] = &[
    (533320, Version::with_build(4, 8, 1)),
    (528040, Version::new(4, 8)),
    (461808, Version::with_build(4, 7, 2)),
    (461308, Version::with_build(4, 7, 1)),
    (460798, Version::new(4, 7)),
    (394802, Version::with_build(4, 6, 2)),
    (394254, Version::with_build(4, 6, 1)),
    // 4.6 outside Windows 10
    (393297, Version::new(4, 6)),
    (393295, Version::new(4, 6)),
    (379893, Version::with_build(4, 5, 2)),
    // 4.5.1 outside Windows 8.1
    (378758, Version::with_build(4, 5, 1)),
    (378675, Version::with_build(4, 5, 1)),
    (378389, Version::new(4, 5)),
];

/// Map an installed release code to its .NET Framework version.
pub fn framework_version_for_release(release: u32) -> Result<Version> {
    RELEASE_BANDS
        .iter()
        .find(|(minimum, _)| release >= *minimum)
        .map(|(_, version)| *version)
        .ok_or(NetverError::UnrecognizedLegacyRelease { release })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(release: u32) -> String {
        framework_version_for_release(release).unwrap().to_string()
    }

    #[test]
    fn bands_are_descending() {
        assert_eq!(RELEASE_BANDS.len(), 13);
        assert!(RELEASE_BANDS.windows(2).all(|w| w[0].0 > w[1].0));
    }

    #[test]
    fn exact_minimums_map_to_their_version() {
        assert_eq!(version(533320), "4.8.1");
        assert_eq!(version(528040), "4.8");
        assert_eq!(version(461808), "4.7.2");
        assert_eq!(version(461308), "4.7.1");
        assert_eq!(version(460798), "4.7");
        assert_eq!(version(394802), "4.6.2");
        assert_eq!(version(394254), "4.6.1");
        assert_eq!(version(393295), "4.6");
        assert_eq!(version(379893), "4.5.2");
        assert_eq!(version(378675), "4.5.1");
        assert_eq!(version(378389), "4.5");
    }

    #[test]
    fn codes_between_bands_round_down() {
        assert_eq!(version(528049), "4.8");
        assert_eq!(version(533325), "4.8.1");
        assert_eq!(version(461814), "4.7.2");
        assert_eq!(version(394271), "4.6.1");
        assert_eq!(version(378758), "4.5.1");
    }

    #[test]
    fn code_below_lowest_band_is_an_error() {
        let err = framework_version_for_release(378388).unwrap_err();
        assert!(matches!(
            err,
            NetverError::UnrecognizedLegacyRelease { release: 378388 }
        ));
    }
}
