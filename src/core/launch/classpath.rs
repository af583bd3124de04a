// ─── Classpath ───
// Class lookup over an ordered classpath and the `-cp` string built from it.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::debug;

/// An isolated lookup scope over an ordered list of classpath entries.
///
/// A class resolves to the first entry (jar or directory) that contains
/// it; anything not found falls through to the parent scope, if any.
/// Entries that do not exist or cannot be read are skipped, the same way
/// the JVM treats them.
#[derive(Debug, Clone, Default)]
pub struct ClassScope {
    entries: Vec<PathBuf>,
    parent: Option<Box<ClassScope>>,
}

impl ClassScope {
    pub fn new(entries: Vec<PathBuf>) -> Self {
        Self {
            entries,
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: ClassScope) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Find the entry that provides `class_name` (e.g. `felis.MainKt`).
    pub fn locate(&self, class_name: &str) -> Option<PathBuf> {
        let resource = class_resource_name(class_name);

        self.entries
            .iter()
            .find(|entry| entry_contains(entry, &resource))
            .cloned()
            .or_else(|| self.parent.as_ref().and_then(|p| p.locate(class_name)))
    }

    /// The `-cp` value for this scope's own entries.
    pub fn to_classpath_string(&self) -> String {
        join_classpath(&self.entries)
    }
}

/// `felis.MainKt` → `felis/MainKt.class`
pub fn class_resource_name(class_name: &str) -> String {
    format!("{}.class", class_name.replace('.', "/"))
}

fn entry_contains(entry: &Path, resource: &str) -> bool {
    if entry.is_dir() {
        return entry.join(resource).is_file();
    }

    if !entry.is_file() {
        debug!("Classpath entry missing (skipping): {:?}", entry);
        return false;
    }

    let file = match File::open(entry) {
        Ok(file) => file,
        Err(e) => {
            debug!("Cannot open classpath entry {:?}: {}", entry, e);
            return false;
        }
    };

    match zip::ZipArchive::new(file) {
        Ok(archive) => archive.index_for_name(resource).is_some(),
        Err(e) => {
            debug!("Classpath entry {:?} is not a readable jar: {}", entry, e);
            false
        }
    }
}

/// Join classpath entries with the platform separator.
pub fn join_classpath(entries: &[PathBuf]) -> String {
    entries
        .iter()
        .map(|p| safe_path_str(p))
        .collect::<Vec<_>>()
        .join(get_classpath_separator())
}

/// Uses `;` on Windows, `:` on Linux/macOS.
pub fn get_classpath_separator() -> &'static str {
    if cfg!(target_os = "windows") {
        ";"
    } else {
        ":"
    }
}

pub fn safe_path_str(path: &Path) -> String {
    let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let text = resolved.to_string_lossy().to_string();

    #[cfg(target_os = "windows")]
    {
        // Java classpath handling can fail for Windows extended-length paths
        // (e.g. `\\?\C:\...`) and report `ClassNotFoundException` even when
        // jars exist.
        if let Some(stripped) = text.strip_prefix(r"\\?\") {
            return stripped.to_string();
        }
    }

    text
}
