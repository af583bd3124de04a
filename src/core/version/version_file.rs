// ─── Version File ───
// Reads the server download descriptor out of a Mojang version JSON.

use serde::Deserialize;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::HttpSource;

use super::manifest::metadata_fetch_failed;

/// The part of a version JSON the bootstrap reads. Every level is optional
/// so a missing field can be reported by name instead of as a parse error.
#[derive(Debug, Deserialize)]
pub struct VersionJson {
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
}

#[derive(Debug, Deserialize)]
pub struct VersionDownloads {
    #[serde(default)]
    pub server: Option<DownloadArtifact>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadArtifact {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
}

/// Where to get the server bundle and what it must hash to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub url: String,
    pub sha1: String,
}

impl VersionJson {
    /// Fetch and parse a version JSON from the given URL.
    pub async fn fetch(source: &dyn HttpSource, url: &str) -> LauncherResult<Self> {
        let raw = source
            .get_text(url)
            .await
            .map_err(|e| metadata_fetch_failed(url, e))?;
        Self::parse(&raw, url)
    }

    pub fn parse(raw: &str, url: &str) -> LauncherResult<Self> {
        serde_json::from_str(raw).map_err(|e| LauncherError::MalformedMetadata {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Extract `downloads.server.{url, sha1}`.
    pub fn server_download(&self, url: &str) -> LauncherResult<ArtifactDescriptor> {
        let missing = |field: &str| LauncherError::MalformedMetadata {
            url: url.to_string(),
            reason: format!("missing {field}"),
        };

        let server = self
            .downloads
            .as_ref()
            .and_then(|d| d.server.as_ref())
            .ok_or_else(|| missing("downloads.server"))?;

        let download_url = server
            .url
            .clone()
            .ok_or_else(|| missing("downloads.server.url"))?;
        let sha1 = server
            .sha1
            .clone()
            .ok_or_else(|| missing("downloads.server.sha1"))?;

        Ok(ArtifactDescriptor {
            url: download_url,
            sha1,
        })
    }
}
