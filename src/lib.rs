pub mod core;

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::core::bootstrap::Bootstrap;
use crate::core::error::LauncherResult;
use crate::core::http::ReqwestSource;
use crate::core::launch::{launch, LaunchConfig};

/// Initialize structured logging. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,felis_server=debug")),
        )
        .init();
}

/// Bootstrap the server rooted at `root` and run it to completion.
/// Returns the server's exit code.
pub async fn run(root: &Path) -> LauncherResult<i32> {
    tracing::info!("felis server bootstrap starting in {:?}", root);

    let source = Arc::new(ReqwestSource::new()?);
    let classpath = Bootstrap::new(source).download_classpath(root).await?;

    let root = root.to_path_buf();
    tokio::task::spawn_blocking(move || launch(classpath, LaunchConfig::default(), &root)).await?
}
