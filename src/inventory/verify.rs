//! Digest verification of downloaded archives.

use sha2::{Digest, Sha256, Sha512};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{NetverError, Result};

/// Result of checking a file against a published digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// No digest was published, so the file was accepted as is.
    Unchecked,
    Matched,
    Mismatched { actual: String },
}

impl Verification {
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Mismatched { .. })
    }
}

/// Hash `path` with the algorithm implied by the length of `expected` and
/// compare case-insensitively.
///
/// 64 hex characters means SHA-256 and 128 means SHA-512; anything else is
/// [`NetverError::UnsupportedDigest`].
pub fn verify(path: &Path, expected: Option<&str>) -> Result<Verification> {
    let Some(expected) = expected.filter(|e| !e.is_empty()) else {
        tracing::debug!("No published digest for {}", path.display());
        return Ok(Verification::Unchecked);
    };

    let actual = match expected.len() {
        64 => hash_file::<Sha256>(path)?,
        128 => hash_file::<Sha512>(path)?,
        length => {
            return Err(NetverError::UnsupportedDigest {
                digest: expected.to_string(),
                length,
            })
        }
    };

    if actual.eq_ignore_ascii_case(expected) {
        Ok(Verification::Matched)
    } else {
        Ok(Verification::Mismatched { actual })
    }
}

/// Like [`verify`], but deletes the file when it does not match.
pub fn verify_or_delete(path: &Path, expected: Option<&str>) -> Result<Verification> {
    let verification = verify(path, expected)?;
    if !verification.is_ok() {
        tracing::warn!("Deleting {} after digest mismatch", path.display());
        std::fs::remove_file(path)?;
    }
    Ok(verification)
}

fn hash_file<D: Digest>(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = D::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(&hasher.finalize()[..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // sha256("hello world") and sha512("hello world")
    const SHA256_HELLO: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
    const SHA512_HELLO: &str = "309ecc489c12d6eb4cc40f50c902f2b4d0ed77ee511a7c7a9bcd3ca86d4cd86f989dd35bc5ff499670da34255b45b0cfd830e81f605dcf7dc5542e93ae9cd76f";

    fn hello(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, "hello world").unwrap();
        path
    }

    #[test]
    fn sha256_matches() {
        let dir = TempDir::new().unwrap();
        let path = hello(&dir);
        assert_eq!(verify(&path, Some(SHA256_HELLO)).unwrap(), Verification::Matched);
    }

    #[test]
    fn sha512_matches_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let path = hello(&dir);
        let upper = SHA512_HELLO.to_ascii_uppercase();
        assert_eq!(verify(&path, Some(&upper)).unwrap(), Verification::Matched);
    }

    #[test]
    fn mismatch_reports_actual_digest() {
        let dir = TempDir::new().unwrap();
        let path = hello(&dir);
        let wrong = "0".repeat(64);
        assert_eq!(
            verify(&path, Some(&wrong)).unwrap(),
            Verification::Mismatched {
                actual: SHA256_HELLO.to_string()
            }
        );
    }

    #[test]
    fn unsupported_length_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = hello(&dir);
        let err = verify(&path, Some("abc123")).unwrap_err();
        assert!(matches!(err, NetverError::UnsupportedDigest { length: 6, .. }));
    }

    #[test]
    fn missing_digest_is_unchecked() {
        let dir = TempDir::new().unwrap();
        let path = hello(&dir);
        assert_eq!(verify(&path, None).unwrap(), Verification::Unchecked);
        assert_eq!(verify(&path, Some("")).unwrap(), Verification::Unchecked);
    }

    #[test]
    fn mismatched_file_is_deleted() {
        let dir = TempDir::new().unwrap();
        let path = hello(&dir);
        let result = verify_or_delete(&path, Some(&"f".repeat(128))).unwrap();
        assert!(!result.is_ok());
        assert!(!path.exists());
    }

    #[test]
    fn matching_file_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = hello(&dir);
        assert!(verify_or_delete(&path, Some(SHA256_HELLO)).unwrap().is_ok());
        assert!(path.exists());
    }
}
