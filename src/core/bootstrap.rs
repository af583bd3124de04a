// ─── Bootstrap ───
// Config → libraries → server bundle → extraction → classpath.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::core::bundle::{ServerJar, BUNDLE_FILE_NAME};
use crate::core::config::ServerConfig;
use crate::core::downloader::{DownloadTask, Downloader};
use crate::core::error::LauncherResult;
use crate::core::http::HttpSource;
use crate::core::version::MetadataResolver;

pub const LIBRARIES_DIR: &str = "libraries";

/// Runs the download pipeline against one root directory.
pub struct Bootstrap {
    source: Arc<dyn HttpSource>,
}

impl Bootstrap {
    pub fn new(source: Arc<dyn HttpSource>) -> Self {
        Self { source }
    }

    /// Load the configuration for `root` and assemble the classpath.
    pub async fn download_classpath(&self, root: &Path) -> LauncherResult<Vec<PathBuf>> {
        let config = ServerConfig::load(&ServerConfig::locate(root)).await?;
        self.download_classpath_with(root, &config).await
    }

    /// Assemble the classpath: the bundle's own entries first, then the
    /// additional libraries in declaration order.
    pub async fn download_classpath_with(
        &self,
        root: &Path,
        config: &ServerConfig,
    ) -> LauncherResult<Vec<PathBuf>> {
        let downloader = Downloader::new(self.source.clone());
        let libraries_dir = root.join(LIBRARIES_DIR);

        let tasks: Vec<DownloadTask> = config
            .additional_libraries
            .iter()
            .map(|lib| DownloadTask::new(lib.download_url(), libraries_dir.join(lib.local_path())))
            .collect();
        let extra = downloader.fetch_all(&tasks).await?;

        let resolver =
            MetadataResolver::with_manifest_url(self.source.clone(), &config.version_manifest_url);
        let jar = ServerJar::ensure(
            &root.join(BUNDLE_FILE_NAME),
            &config.server_version,
            &resolver,
            &downloader,
        )
        .await?;

        let bundled = jar.unpack(root).await?;
        info!(
            "Classpath ready: {} bundled entries, {} additional libraries",
            bundled.len(),
            extra.len()
        );

        Ok(bundled
            .iter()
            .map(|entry| root.join(entry))
            .chain(extra)
            .collect())
    }
}
