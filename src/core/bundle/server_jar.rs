// ─── Server Jar ───
// Downloads, verifies and unpacks the Mojang server bundler.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::archive::MountedArchive;
use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::integrity;
use crate::core::version::MetadataResolver;

pub const BUNDLE_FILE_NAME: &str = "bundler.jar";
pub const CLASSPATH_ENTRY: &str = "META-INF/classpath-joined";
pub const LIBRARIES_PREFIX: &str = "META-INF/libraries";
pub const VERSIONS_PREFIX: &str = "META-INF/versions";

/// A verified server bundle on disk.
#[derive(Debug, Clone)]
pub struct ServerJar {
    path: PathBuf,
}

impl ServerJar {
    /// Make sure `path` holds a verified bundle for `version_id`.
    ///
    /// A missing bundle is resolved, downloaded and checked against the
    /// published SHA-1; its digest is then recorded in a `.sha1` sidecar.
    /// An existing bundle skips the metadata service and is re-checked
    /// against the sidecar when one is present. A bundle that fails either
    /// check is deleted.
    pub async fn ensure(
        path: &Path,
        version_id: &str,
        resolver: &MetadataResolver,
        downloader: &Downloader,
    ) -> LauncherResult<Self> {
        let sidecar = sidecar_path(path);

        if path.exists() {
            match tokio::fs::read_to_string(&sidecar).await {
                Ok(expected) => {
                    debug!("Re-verifying cached bundle {:?}", path);
                    verify_or_discard(path, expected.trim()).await?;
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!("Cached bundle {:?} has no recorded digest", path);
                }
                Err(e) => return Err(LauncherError::io(&sidecar, e)),
            }
            return Ok(Self {
                path: path.to_path_buf(),
            });
        }

        let descriptor = resolver.resolve(version_id).await?;
        info!("Downloading server bundle {}", version_id);
        downloader.fetch(&descriptor.url, path).await?;
        verify_or_discard(path, &descriptor.sha1).await?;

        tokio::fs::write(&sidecar, descriptor.sha1.to_ascii_lowercase())
            .await
            .map_err(|e| LauncherError::io(&sidecar, e))?;

        info!("Verified server bundle {:?}", path);
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extract the bundled libraries and versions under `root` and return
    /// the bundle's own classpath, relative to `root`.
    ///
    /// The archive stays mounted for the whole call and is released on
    /// every exit path.
    pub async fn unpack(&self, root: &Path) -> LauncherResult<Vec<String>> {
        let bundle = self.path.clone();
        let libraries_dir = root.join("libraries");
        let versions_dir = root.join("versions");

        tokio::task::spawn_blocking(move || -> LauncherResult<Vec<String>> {
            let mut archive = MountedArchive::mount(&bundle)?;
            archive.extract_subtree(LIBRARIES_PREFIX, &libraries_dir)?;
            archive.extract_subtree(VERSIONS_PREFIX, &versions_dir)?;
            let classpath = archive.read_text(CLASSPATH_ENTRY)?;
            archive.close();
            Ok(parse_classpath(&classpath))
        })
        .await?
    }
}

/// Split the `;`-joined classpath manifest, dropping blank segments.
pub fn parse_classpath(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from(BUNDLE_FILE_NAME));
    name.push(".sha1");
    path.with_file_name(name)
}

async fn verify_or_discard(path: &Path, expected: &str) -> LauncherResult<()> {
    if let Err(e) = integrity::verify_file(path, expected).await {
        warn!("Discarding bundle {:?}: {}", path, e);
        for stale in [path.to_path_buf(), sidecar_path(path)] {
            if let Err(remove) = tokio::fs::remove_file(&stale).await {
                if remove.kind() != std::io::ErrorKind::NotFound {
                    warn!("Could not remove {:?}: {}", stale, remove);
                }
            }
        }
        return Err(e);
    }
    Ok(())
}
