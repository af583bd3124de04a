pub mod manifest;
pub mod resolver;
pub mod version_file;

pub use manifest::{VersionEntry, VersionManifest, VERSION_MANIFEST_URL};
pub use resolver::MetadataResolver;
pub use version_file::{ArtifactDescriptor, VersionJson};
