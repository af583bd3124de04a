use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::{Client, Response};
use tokio::io::AsyncWriteExt;

use crate::core::error::{LauncherError, LauncherResult};

const APP_USER_AGENT: &str = concat!("felis-server/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const READ_TIMEOUT: Duration = Duration::from_secs(60);

pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .connect_timeout(CONNECT_TIMEOUT)
        .read_timeout(READ_TIMEOUT)
        .build()
}

/// Transport seam used by the resolver and the downloader.
///
/// Failures are reported as [`LauncherError::Transport`] (network, TLS,
/// non-2xx status) or [`LauncherError::Io`] (writing the body).
#[async_trait]
pub trait HttpSource: Send + Sync {
    /// GET `url` and return the body as text.
    async fn get_text(&self, url: &str) -> LauncherResult<String>;

    /// GET `url` and stream the body into `dest`, truncating it first.
    async fn download_to(&self, url: &str, dest: &Path) -> LauncherResult<()>;
}

/// Production [`HttpSource`] backed by a shared `reqwest` client.
#[derive(Clone)]
pub struct ReqwestSource {
    client: Client,
}

impl ReqwestSource {
    pub fn new() -> LauncherResult<Self> {
        let client = build_http_client()
            .map_err(|e| LauncherError::transport("<client setup>", e))?;
        Ok(Self { client })
    }

    async fn send(&self, url: &str) -> LauncherResult<Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LauncherError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::transport(url, format!("HTTP {}", status.as_u16())));
        }
        Ok(response)
    }
}

#[async_trait]
impl HttpSource for ReqwestSource {
    async fn get_text(&self, url: &str) -> LauncherResult<String> {
        self.send(url)
            .await?
            .text()
            .await
            .map_err(|e| LauncherError::transport(url, e))
    }

    async fn download_to(&self, url: &str, dest: &Path) -> LauncherResult<()> {
        let response = self.send(url).await?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| LauncherError::io(dest, e))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| LauncherError::transport(url, e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| LauncherError::io(dest, e))?;
        }

        file.flush().await.map_err(|e| LauncherError::io(dest, e))?;
        Ok(())
    }
}
