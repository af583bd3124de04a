// ─── Integrity ───
// SHA-1 verification of downloaded artifacts.

use std::path::Path;

use sha1::{Digest, Sha1};

use crate::core::error::{LauncherError, LauncherResult};

/// Lowercase hex SHA-1 of `bytes`.
pub fn sha1_hex(bytes: &[u8]) -> String {
    hex::encode(Sha1::digest(bytes))
}

/// Check `bytes` against an expected hex digest.
///
/// The comparison is done on the decoded digest, so the hex string may be
/// upper or lower case. A string that is not valid hex never matches.
pub fn verify(bytes: &[u8], expected_hex: &str) -> bool {
    match hex::decode(expected_hex.trim()) {
        Ok(expected) => Sha1::digest(bytes).as_slice() == expected.as_slice(),
        Err(_) => false,
    }
}

/// Verify a file on disk, failing with [`LauncherError::IntegrityViolation`]
/// on mismatch.
pub async fn verify_file(path: &Path, expected_hex: &str) -> LauncherResult<()> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| LauncherError::io(path, e))?;

    if verify(&bytes, expected_hex) {
        Ok(())
    } else {
        Err(LauncherError::IntegrityViolation {
            path: path.to_path_buf(),
            expected: expected_hex.to_ascii_lowercase(),
            actual: sha1_hex(&bytes),
        })
    }
}
