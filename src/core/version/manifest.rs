// ─── Version Manifest ───
// Handles fetching and parsing the Mojang version manifest v2.

use serde::Deserialize;
use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::HttpSource;

pub const VERSION_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// Top-level Mojang version manifest.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

/// A single entry in the manifest. Only the fields the bootstrap needs.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    /// Location of the per-version detail document.
    pub url: String,
}

impl VersionManifest {
    /// Fetch the version manifest from `url`.
    pub async fn fetch(source: &dyn HttpSource, url: &str) -> LauncherResult<Self> {
        info!("Fetching version manifest from {}", url);

        let raw = source
            .get_text(url)
            .await
            .map_err(|e| metadata_fetch_failed(url, e))?;

        let manifest: VersionManifest =
            serde_json::from_str(&raw).map_err(|e| LauncherError::MalformedMetadata {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Find a specific version entry by ID (e.g. "1.20.4").
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }
}

/// Transport problems while reading metadata are reported as
/// [`LauncherError::MetadataFetchFailed`]; everything else passes through.
pub(crate) fn metadata_fetch_failed(url: &str, error: LauncherError) -> LauncherError {
    match error {
        LauncherError::Transport { reason, .. } => LauncherError::MetadataFetchFailed {
            url: url.to_string(),
            reason,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::StubSource;

    #[test]
    fn deserialize_manifest_ignores_unknown_fields() {
        let json = r#"{
            "latest": { "release": "1.20.4", "snapshot": "24w03a" },
            "versions": [{
                "id": "1.20.4",
                "type": "release",
                "url": "https://example.com/1.20.4.json",
                "time": "2023-12-07T08:00:00+00:00",
                "releaseTime": "2023-12-07T08:00:00+00:00",
                "sha1": "abc123",
                "complianceLevel": 1
            }]
        }"#;
        let manifest: VersionManifest = serde_json::from_str(json).unwrap();
        let entry = manifest.find_version("1.20.4").unwrap();
        assert_eq!(entry.url, "https://example.com/1.20.4.json");
        assert!(manifest.find_version("1.20.5").is_none());
    }

    #[tokio::test]
    async fn unreachable_manifest_is_a_metadata_fetch_failure() {
        let source = StubSource::new();
        let err = VersionManifest::fetch(&source, "https://meta.example/index.json")
            .await
            .unwrap_err();
        match err {
            LauncherError::MetadataFetchFailed { url, .. } => {
                assert_eq!(url, "https://meta.example/index.json")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn garbage_manifest_is_malformed_metadata() {
        let source = StubSource::new().with_text("https://meta.example/index.json", "<html>");
        let err = VersionManifest::fetch(&source, "https://meta.example/index.json")
            .await
            .unwrap_err();
        assert!(matches!(err, LauncherError::MalformedMetadata { .. }));
    }
}
