// ─── Server Config ───
// The bootstrap's declarative input: `server.config.json`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::maven::Library;
use crate::core::version::VERSION_MANIFEST_URL;

pub const CONFIG_FILE_NAME: &str = "server.config.json";
/// Overrides the location of the configuration file.
pub const CONFIG_PATH_ENV: &str = "FELIS_SERVER_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub server_version: String,
    #[serde(default)]
    pub additional_libraries: Vec<Library>,
    #[serde(default = "default_manifest_url")]
    pub version_manifest_url: String,
}

fn default_manifest_url() -> String {
    VERSION_MANIFEST_URL.to_string()
}

impl ServerConfig {
    /// Where the configuration lives for a given root: `$FELIS_SERVER_CONFIG`
    /// if set, otherwise `<root>/server.config.json`.
    pub fn locate(root: &Path) -> PathBuf {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => root.join(CONFIG_FILE_NAME),
        }
    }

    pub async fn load(path: &Path) -> LauncherResult<Self> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LauncherError::ConfigurationMissing {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(LauncherError::io(path, e)),
        };

        let config = Self::parse(&raw, path)?;
        info!(
            "Loaded {:?}: server {}, {} additional libraries",
            path,
            config.server_version,
            config.additional_libraries.len()
        );
        Ok(config)
    }

    pub fn parse(raw: &str, path: &Path) -> LauncherResult<Self> {
        serde_json::from_str(raw).map_err(|source| LauncherError::InvalidConfiguration {
            path: path.to_path_buf(),
            source,
        })
    }
}
