use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

pub const JAVA_HOME_ENV: &str = "JAVA_HOME";

fn java_exe() -> &'static str {
    if cfg!(windows) {
        "java.exe"
    } else {
        "java"
    }
}

/// Pick the Java binary: `$JAVA_HOME/bin/java` when it exists, otherwise
/// plain `java` resolved through `PATH` at spawn time.
pub fn find_java_binary() -> PathBuf {
    java_binary_for(std::env::var_os(JAVA_HOME_ENV).as_deref())
}

fn java_binary_for(java_home: Option<&OsStr>) -> PathBuf {
    if let Some(home) = java_home.filter(|h| !h.is_empty()) {
        let candidate = locate_java_binary(Path::new(home));
        if candidate.is_file() {
            debug!("Using Java from {}: {:?}", JAVA_HOME_ENV, candidate);
            return candidate;
        }
        debug!("{} has no usable binary at {:?}", JAVA_HOME_ENV, candidate);
    }

    PathBuf::from(java_exe())
}

fn locate_java_binary(runtime_root: &Path) -> PathBuf {
    let primary = runtime_root.join("bin").join(java_exe());
    if primary.exists() {
        return primary;
    }

    let mac_layout = runtime_root
        .join("Contents")
        .join("Home")
        .join("bin")
        .join(java_exe());
    if mac_layout.exists() {
        return mac_layout;
    }

    primary
}
