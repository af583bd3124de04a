use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

use crate::core::error::{LauncherError, LauncherResult};

/// A parsed `groupId:artifactId:version` coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Coordinate {
    /// Parse a three-part coordinate.
    ///
    /// Each part (and each dotted group segment) must be a plain path
    /// segment, so the derived paths stay inside the libraries directory.
    ///
    /// # Examples
    /// ```
    /// use felis_server::core::maven::Coordinate;
    ///
    /// let c = Coordinate::parse("net.sf.jopt-simple:jopt-simple:5.0.4").unwrap();
    /// assert_eq!(c.group_id, "net.sf.jopt-simple");
    /// ```
    pub fn parse(coord: &str) -> LauncherResult<Self> {
        let parts: Vec<&str> = coord.split(':').collect();

        match parts.as_slice() {
            [group, artifact, version]
                if group.split('.').all(is_plain_segment)
                    && is_plain_segment(artifact)
                    && is_plain_segment(version) =>
            {
                Ok(Self {
                    group_id: group.to_string(),
                    artifact_id: artifact.to_string(),
                    version: version.to_string(),
                })
            }
            _ => Err(LauncherError::InvalidCoordinate(coord.to_string())),
        }
    }

    /// Group id as path segments (`net/sf/jopt-simple`).
    pub fn group_path(&self) -> String {
        self.group_id.replace('.', "/")
    }

    /// `artifactId-version.jar`
    pub fn file_name(&self) -> String {
        format!("{}-{}.jar", self.artifact_id, self.version)
    }

    /// Repository-relative location, always `/`-separated.
    pub fn repository_path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.group_path(),
            self.artifact_id,
            self.version,
            self.file_name()
        )
    }

    /// Local path relative to the libraries directory.
    ///
    /// Mirrors Maven's local repo layout:
    /// `<group_path>/<artifact_id>/<version>/<filename>`
    pub fn local_path(&self) -> PathBuf {
        self.group_id
            .split('.')
            .collect::<PathBuf>()
            .join(&self.artifact_id)
            .join(&self.version)
            .join(self.file_name())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

fn is_plain_segment(part: &str) -> bool {
    !part.is_empty() && part != "." && part != ".." && !part.contains(['/', '\\'])
}

/// An auxiliary library declared in the server configuration.
///
/// Deserialized from `{ "name": "group:artifact:version", "url": "<repo base>" }`;
/// the coordinate is validated while the configuration is read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawLibrary")]
pub struct Library {
    coordinate: Coordinate,
    base_url: String,
}

#[derive(Deserialize)]
struct RawLibrary {
    name: String,
    url: String,
}

impl TryFrom<RawLibrary> for Library {
    type Error = LauncherError;

    fn try_from(raw: RawLibrary) -> Result<Self, Self::Error> {
        Library::new(&raw.name, raw.url)
    }
}

impl Library {
    pub fn new(name: &str, base_url: impl Into<String>) -> LauncherResult<Self> {
        Ok(Self {
            coordinate: Coordinate::parse(name)?,
            base_url: base_url.into(),
        })
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Download URL: the base URL followed directly by the repository path.
    /// The base is expected to carry its own trailing `/`.
    pub fn download_url(&self) -> String {
        format!("{}{}", self.base_url, self.coordinate.repository_path())
    }

    /// Path relative to the libraries directory.
    pub fn local_path(&self) -> PathBuf {
        self.coordinate.local_path()
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.coordinate.fmt(f)
    }
}
