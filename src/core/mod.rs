// ─── felis server bootstrap ───
// Fetches everything a felis server needs, then starts it.
//
// Architecture:
//   core/
//     config      — server.config.json
//     http        — shared reqwest client + transport seam
//     downloader/ — Concurrent, idempotent downloads
//     integrity   — SHA-1 verification
//     maven/      — Library coordinates and repository layout
//     version/    — Mojang manifest → version JSON → server download
//     bundle/     — Server bundler jar: verify, mount, extract
//     bootstrap   — The download pipeline, producing the classpath
//     launch/     — Class lookup scope + JVM entry point
//     java/       — Java binary selection

pub mod bootstrap;
pub mod bundle;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod integrity;
pub mod java;
pub mod launch;
pub mod maven;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;
