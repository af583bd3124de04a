use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the bootstrap pipeline.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── Configuration ───────────────────────────────────
    #[error("Server configuration not found at {path:?}")]
    ConfigurationMissing { path: PathBuf },

    #[error("Invalid server configuration at {path:?}: {source}")]
    InvalidConfiguration {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid library coordinate: {0}")]
    InvalidCoordinate(String),

    // ── Metadata ────────────────────────────────────────
    #[error("Unknown version {0}")]
    UnknownVersion(String),

    #[error("Malformed metadata at {url}: {reason}")]
    MalformedMetadata { url: String, reason: String },

    #[error("Failed to fetch metadata from {url}: {reason}")]
    MetadataFetchFailed { url: String, reason: String },

    // ── Network ─────────────────────────────────────────
    #[error("Download failed for {url}: {reason}")]
    Transport { url: String, reason: String },

    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    IntegrityViolation {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── Archive ─────────────────────────────────────────
    #[error("Malformed archive {path:?}: {reason}")]
    MalformedArchive { path: PathBuf, reason: String },

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ── Launch ──────────────────────────────────────────
    #[error("Entry point {0} not found on the classpath")]
    EntryPointNotFound(String),

    #[error("Java execution failed: {0}")]
    JavaExecution(String),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl LauncherError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LauncherError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn transport(url: &str, reason: impl ToString) -> Self {
        LauncherError::Transport {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl From<tokio::task::JoinError> for LauncherError {
    fn from(error: tokio::task::JoinError) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source: std::io::Error::other(format!("blocking task failed: {error}")),
        }
    }
}
