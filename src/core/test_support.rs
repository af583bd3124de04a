//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use zip::write::SimpleFileOptions;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::HttpSource;

struct Route {
    body: Vec<u8>,
    delay: Duration,
}

/// In-memory [`HttpSource`] that records every request it serves.
/// Unknown URLs answer like a 404.
#[derive(Default)]
pub(crate) struct StubSource {
    routes: HashMap<String, Route>,
    text_requests: Mutex<Vec<String>>,
    downloads: Mutex<Vec<String>>,
}

impl StubSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_body(self, url: &str, body: &[u8]) -> Self {
        self.with_delayed_body(url, body, Duration::ZERO)
    }

    pub(crate) fn with_text(self, url: &str, body: &str) -> Self {
        self.with_body(url, body.as_bytes())
    }

    pub(crate) fn with_delayed_body(mut self, url: &str, body: &[u8], delay: Duration) -> Self {
        self.routes.insert(
            url.to_string(),
            Route {
                body: body.to_vec(),
                delay,
            },
        );
        self
    }

    pub(crate) fn download_count(&self, url: &str) -> usize {
        self.downloads
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.as_str() == url)
            .count()
    }

    pub(crate) fn total_downloads(&self) -> usize {
        self.downloads.lock().unwrap().len()
    }

    pub(crate) fn text_requests(&self) -> Vec<String> {
        self.text_requests.lock().unwrap().clone()
    }

    fn route(&self, url: &str) -> LauncherResult<&Route> {
        self.routes
            .get(url)
            .ok_or_else(|| LauncherError::transport(url, "HTTP 404"))
    }
}

#[async_trait]
impl HttpSource for StubSource {
    async fn get_text(&self, url: &str) -> LauncherResult<String> {
        self.text_requests.lock().unwrap().push(url.to_string());
        let route = self.route(url)?;
        tokio::time::sleep(route.delay).await;
        String::from_utf8(route.body.clone()).map_err(|e| LauncherError::transport(url, e))
    }

    async fn download_to(&self, url: &str, dest: &Path) -> LauncherResult<()> {
        self.downloads.lock().unwrap().push(url.to_string());
        let route = self.route(url)?;
        tokio::time::sleep(route.delay).await;
        tokio::fs::write(dest, &route.body)
            .await
            .map_err(|e| LauncherError::io(dest, e))
    }
}

/// Build a zip archive in memory from `(name, contents)` pairs.
/// Names ending in `/` become directory entries.
pub(crate) fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    build_zip(entries, SimpleFileOptions::default())
}

/// Like [`zip_bytes`], but entries are stored uncompressed so their data
/// appears verbatim in the output.
pub(crate) fn zip_bytes_stored(entries: &[(&str, &[u8])]) -> Vec<u8> {
    build_zip(
        entries,
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored),
    )
}

fn build_zip(entries: &[(&str, &[u8])], options: SimpleFileOptions) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, contents) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents).unwrap();
        }
    }

    writer.finish().unwrap().into_inner()
}

pub(crate) fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, zip_bytes(entries)).unwrap();
}
