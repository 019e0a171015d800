//! Shader hot-reload core: file timestamp tracking, program bookkeeping and
//! the rebuild-then-swap controller. Graphics calls go through the
//! [`ShaderBackend`] trait so this crate never touches a GL context itself.

pub mod backend;
pub mod controller;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod tracker;

#[cfg(test)]
pub(crate) mod test_support;

pub use backend::{ShaderBackend, ShaderStage};
pub use controller::{HotReloadController, ReloadOutcome, ReloadSummary};
pub use error::HotReloadError;
pub use manifest::{load_manifest_from_path, ManifestProgram, ShaderManifest};
pub use registry::{ProgramEntry, ProgramRegistry};
pub use tracker::{ChangeSet, FileTimestampTracker, WatchedFile};
