// ─── Mounted Archive ───
// Read-only, path-addressed view over a zip file.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::core::error::{LauncherError, LauncherResult};

/// Counts from a single [`MountedArchive::extract_subtree`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    pub written: usize,
    pub skipped: usize,
}

/// An opened zip archive addressed by `/`-separated entry paths.
///
/// The handle owns the underlying file. It is released when the value is
/// dropped or explicitly [`close`](MountedArchive::close)d; both consume the
/// handle so it cannot be used afterwards.
pub struct MountedArchive {
    path: PathBuf,
    archive: ZipArchive<File>,
}

impl MountedArchive {
    pub fn mount(path: &Path) -> LauncherResult<Self> {
        let file = File::open(path).map_err(|e| LauncherError::io(path, e))?;
        let archive = ZipArchive::new(file).map_err(|e| LauncherError::MalformedArchive {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!("Mounted {:?} ({} entries)", path, archive.len());
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    /// Relative paths of every file entry under `prefix`, in archive order.
    pub fn list_entries(&self, prefix: &str) -> Vec<String> {
        let prefix = dir_prefix(prefix);
        self.archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .filter_map(|name| name.strip_prefix(prefix.as_str()))
            .filter(|rel| !rel.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Read a UTF-8 entry.
    pub fn read_text(&mut self, entry: &str) -> LauncherResult<String> {
        let mut file = self
            .archive
            .by_name(entry)
            .map_err(|e| malformed(&self.path, format!("{entry}: {e}")))?;

        let mut text = String::new();
        file.read_to_string(&mut text)
            .map_err(|e| malformed(&self.path, format!("{entry}: {e}")))?;
        Ok(text)
    }

    /// Copy every entry under `source_prefix` into `dest_root`, keeping the
    /// layout relative to the prefix. Files that already exist are left
    /// untouched; an entry that fails to copy leaves nothing behind.
    pub fn extract_subtree(
        &mut self,
        source_prefix: &str,
        dest_root: &Path,
    ) -> LauncherResult<ExtractSummary> {
        let prefix = dir_prefix(source_prefix);
        let prefix_path = Path::new(prefix.trim_end_matches('/'));
        let mut summary = ExtractSummary::default();

        for index in 0..self.archive.len() {
            let mut entry = self.archive.by_index(index)?;
            if !entry.name().starts_with(prefix.as_str()) {
                continue;
            }

            let enclosed = entry.enclosed_name().ok_or_else(|| {
                malformed(&self.path, format!("unsafe entry path {}", entry.name()))
            })?;
            let rel = relative_to(&enclosed, prefix_path)
                .ok_or_else(|| malformed(&self.path, format!("unsafe entry path {}", entry.name())))?;
            if rel.as_os_str().is_empty() {
                continue;
            }

            let out_path = dest_root.join(&rel);
            if entry.is_dir() {
                std::fs::create_dir_all(&out_path).map_err(|e| LauncherError::io(&out_path, e))?;
                continue;
            }

            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| LauncherError::io(parent, e))?;
            }

            if out_path
                .try_exists()
                .map_err(|e| LauncherError::io(&out_path, e))?
            {
                summary.skipped += 1;
                continue;
            }

            // Copied under a sibling name and renamed only once complete.
            let part = part_path(&out_path);
            let copied = File::create(&part).and_then(|mut out| std::io::copy(&mut entry, &mut out));
            if let Err(e) = copied {
                if let Err(cleanup) = std::fs::remove_file(&part) {
                    if cleanup.kind() != ErrorKind::NotFound {
                        warn!("Could not remove partial entry {:?}: {}", part, cleanup);
                    }
                }
                return Err(LauncherError::io(&out_path, e));
            }
            std::fs::rename(&part, &out_path).map_err(|e| LauncherError::io(&out_path, e))?;
            summary.written += 1;
        }

        debug!(
            "Extracted {} from {:?} into {:?}: {} written, {} skipped",
            source_prefix, self.path, dest_root, summary.written, summary.skipped
        );
        Ok(summary)
    }

    /// Release the archive.
    pub fn close(self) {
        debug!("Unmounted {:?}", self.path);
    }
}

fn dir_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

fn relative_to(path: &Path, prefix: &Path) -> Option<PathBuf> {
    let rel = path.strip_prefix(prefix).ok()?;
    rel.components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then(|| rel.to_path_buf())
}

fn malformed(path: &Path, reason: String) -> LauncherError {
    LauncherError::MalformedArchive {
        path: path.to_path_buf(),
        reason,
    }
}
