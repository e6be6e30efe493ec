//! SHA-256 checksum utilities
//!
//! Used by the blob store to fingerprint uploaded audio and by the auth
//! layer for salted credential digests.

use crate::error::{CommonError, Result};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Compute the hex-encoded SHA-256 digest of a byte slice.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute the hex-encoded SHA-256 digest of any readable source.
pub fn compute_checksum<R: Read>(reader: &mut R) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Compute the checksum of a file on disk.
pub fn compute_file_checksum(path: impl AsRef<Path>) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    compute_checksum(&mut file)
}

/// Verify that a file's checksum matches the expected digest.
pub fn verify_file_checksum(path: impl AsRef<Path>, expected: &str) -> Result<()> {
    let actual = compute_file_checksum(path)?;
    if actual == expected {
        Ok(())
    } else {
        Err(CommonError::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sha256_hex_known_vector() {
        let checksum = sha256_hex(b"Hello, World!");
        assert_eq!(
            checksum,
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }

    #[test]
    fn test_compute_checksum_matches_slice_digest() {
        let data = b"voice sample bytes";
        let mut cursor = std::io::Cursor::new(&data[..]);
        let streamed = compute_checksum(&mut cursor).unwrap();
        assert_eq!(streamed, sha256_hex(data));
    }

    #[test]
    fn test_verify_file_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"RIFF....").unwrap();
        drop(file);

        let expected = sha256_hex(b"RIFF....");
        assert!(verify_file_checksum(&path, &expected).is_ok());
        assert!(matches!(
            verify_file_checksum(&path, "deadbeef"),
            Err(CommonError::ChecksumMismatch { .. })
        ));
    }
}
