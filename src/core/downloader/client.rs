use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{debug, info, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::HttpSource;

/// A single file to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub url: String,
    pub dest: PathBuf,
}

impl DownloadTask {
    pub fn new(url: impl Into<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            dest: dest.into(),
        }
    }
}

/// Concurrent, idempotent downloader.
///
/// A destination that already exists is treated as cached and returned
/// without touching the network. New files are streamed into a sibling
/// `.part` file and renamed into place once complete, so an interrupted
/// transfer never shows up under the final name.
#[derive(Clone)]
pub struct Downloader {
    source: Arc<dyn HttpSource>,
}

impl Downloader {
    pub fn new(source: Arc<dyn HttpSource>) -> Self {
        Self { source }
    }

    // ── Single file download ────────────────────────────

    /// Fetch `url` into `dest`, returning `dest`.
    pub async fn fetch(&self, url: &str, dest: &Path) -> LauncherResult<PathBuf> {
        if tokio::fs::try_exists(dest)
            .await
            .map_err(|e| LauncherError::io(dest, e))?
        {
            debug!("Cached: {:?}", dest);
            return Ok(dest.to_path_buf());
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }

        let part = part_path(dest);
        if let Err(e) = self.source.download_to(url, &part).await {
            if let Err(cleanup) = tokio::fs::remove_file(&part).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!("Could not remove partial download {:?}: {}", part, cleanup);
                }
            }
            return Err(e);
        }

        tokio::fs::rename(&part, dest)
            .await
            .map_err(|e| LauncherError::io(dest, e))?;

        debug!("Downloaded: {} -> {:?}", url, dest);
        Ok(dest.to_path_buf())
    }

    pub async fn fetch_task(&self, task: &DownloadTask) -> LauncherResult<PathBuf> {
        self.fetch(&task.url, &task.dest).await
    }

    // ── Batch concurrent downloads ──────────────────────

    /// Run every task concurrently and return the destinations in input
    /// order. The first failure aborts the batch.
    ///
    /// Tasks sharing a destination are fetched once; every duplicate gets
    /// the same path back.
    pub async fn fetch_all(&self, tasks: &[DownloadTask]) -> LauncherResult<Vec<PathBuf>> {
        let mut unique: Vec<&DownloadTask> = Vec::new();
        let mut slot_of: HashMap<&Path, usize> = HashMap::new();
        let slots: Vec<usize> = tasks
            .iter()
            .map(|task| {
                *slot_of.entry(task.dest.as_path()).or_insert_with(|| {
                    unique.push(task);
                    unique.len() - 1
                })
            })
            .collect();

        info!(
            "Starting batch download: {} files ({} distinct)",
            tasks.len(),
            unique.len()
        );

        let fetched = try_join_all(unique.iter().map(|task| self.fetch_task(task))).await?;
        let paths: Vec<PathBuf> = slots.into_iter().map(|i| fetched[i].clone()).collect();

        info!("Batch download finished: {} files", paths.len());
        Ok(paths)
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("download"));
    name.push(".part");
    dest.with_file_name(name)
}
