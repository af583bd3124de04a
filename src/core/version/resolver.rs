use std::sync::Arc;

use tracing::info;

use super::manifest::{VersionManifest, VERSION_MANIFEST_URL};
use super::version_file::{ArtifactDescriptor, VersionJson};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::HttpSource;

/// Two-hop lookup: version manifest → version JSON → server download.
pub struct MetadataResolver {
    source: Arc<dyn HttpSource>,
    manifest_url: String,
}

impl MetadataResolver {
    pub fn new(source: Arc<dyn HttpSource>) -> Self {
        Self::with_manifest_url(source, VERSION_MANIFEST_URL)
    }

    pub fn with_manifest_url(source: Arc<dyn HttpSource>, manifest_url: impl Into<String>) -> Self {
        Self {
            source,
            manifest_url: manifest_url.into(),
        }
    }

    pub async fn resolve(&self, version_id: &str) -> LauncherResult<ArtifactDescriptor> {
        let manifest = VersionManifest::fetch(self.source.as_ref(), &self.manifest_url).await?;

        let entry = manifest
            .find_version(version_id)
            .ok_or_else(|| LauncherError::UnknownVersion(version_id.to_string()))?;

        let version = VersionJson::fetch(self.source.as_ref(), &entry.url).await?;
        let descriptor = version.server_download(&entry.url)?;

        info!("Resolved {} -> {}", version_id, descriptor.url);
        Ok(descriptor)
    }
}
