//! JSON manifest listing the programs a host wants hot-reloaded.
//!
//! ```json
//! {
//!   "version": "0.1",
//!   "poll_interval_ms": 250,
//!   "programs": [
//!     { "name": "sprite", "vertex": "sprite.vert", "fragment": "sprite.frag" }
//!   ]
//! }
//! ```
//!
//! Relative shader paths are resolved against the manifest's directory.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::ShaderBackend;
use crate::controller::HotReloadController;
use crate::error::HotReloadError;

const SUPPORTED_VERSION: &str = "0.1";

#[derive(Debug, Deserialize, Clone)]
pub struct ShaderManifest {
    pub version: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    pub programs: Vec<ManifestProgram>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ManifestProgram {
    pub name: String,
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl ShaderManifest {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Register every listed program, stopping at the first failure.
    pub fn register_all<B: ShaderBackend>(
        &self,
        controller: &mut HotReloadController<B>,
    ) -> Result<(), HotReloadError> {
        for program in &self.programs {
            controller.register_program(&program.name, &program.vertex, &program.fragment)?;
        }
        Ok(())
    }
}

pub fn load_manifest_from_path(path: &Path) -> Result<ShaderManifest, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read shader manifest {}: {e}", path.display()))?;
    let mut manifest: ShaderManifest = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse shader manifest {}: {e}", path.display()))?;
    validate_manifest(&manifest)?;

    let base_dir = path.parent().unwrap_or(Path::new(""));
    for program in &mut manifest.programs {
        program.vertex = resolve(base_dir, &program.vertex);
        program.fragment = resolve(base_dir, &program.fragment);
    }
    Ok(manifest)
}

fn validate_manifest(manifest: &ShaderManifest) -> Result<(), String> {
    if manifest.version != SUPPORTED_VERSION {
        return Err(format!(
            "Manifest validation failed: unsupported version '{}'",
            manifest.version
        ));
    }
    if manifest.poll_interval_ms == 0 {
        return Err("Manifest validation failed: poll_interval_ms must be positive".to_string());
    }
    if manifest.programs.is_empty() {
        return Err("Manifest validation failed: programs array is empty".to_string());
    }

    let mut names = HashSet::new();
    for program in &manifest.programs {
        if program.name.is_empty() {
            return Err("Manifest validation failed: program with empty name".to_string());
        }
        if !names.insert(program.name.as_str()) {
            return Err(format!(
                "Manifest validation failed: duplicate program name '{}'",
                program.name
            ));
        }
    }
    Ok(())
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

const fn default_poll_interval_ms() -> u64 {
    250
}
