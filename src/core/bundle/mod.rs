pub mod archive;
pub mod server_jar;

pub use archive::{ExtractSummary, MountedArchive};
pub use server_jar::{parse_classpath, ServerJar, BUNDLE_FILE_NAME};
