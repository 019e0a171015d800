//! Rebuild-then-swap orchestration.
//!
//! Each call to [`HotReloadController::poll_and_reload`] walks the per-program
//! states Stable → PendingRebuild → Rebuilding → Committed | RolledBack:
//!
//!   1. ask the tracker which watched files changed (no changes: return, no
//!      compile work at all)
//!   2. fan each changed path out to the programs built from it, each program
//!      at most once per poll
//!   3. read both sources fresh, compile, link
//!   4. on success swap the registry handle, then release the old program;
//!      on failure keep the old handle and log the diagnostic
//!
//! The registry handle only ever points at a successfully linked program, so
//! a broken shader edit freezes visuals at the last good build instead of
//! taking the host down.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::{ShaderBackend, ShaderStage};
use crate::error::HotReloadError;
use crate::registry::ProgramRegistry;
use crate::tracker::FileTimestampTracker;

/// How a single program's rebuild ended.
#[derive(Debug)]
pub enum ReloadOutcome {
    /// The new program is live and the old one has been released.
    Committed,
    /// The rebuild failed; the previous program is still live.
    RolledBack(HotReloadError),
}

impl ReloadOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }
}

/// What one poll did. Purely informational; failures in here have already
/// been logged.
#[derive(Debug, Default)]
pub struct ReloadSummary {
    pub changed_files: Vec<PathBuf>,
    pub unreadable_files: Vec<HotReloadError>,
    pub programs: Vec<(String, ReloadOutcome)>,
}

impl ReloadSummary {
    /// True when nothing changed on disk and no program was touched.
    pub fn is_noop(&self) -> bool {
        self.changed_files.is_empty() && self.programs.is_empty()
    }

    pub fn committed(&self) -> impl Iterator<Item = &str> {
        self.programs
            .iter()
            .filter(|(_, outcome)| outcome.is_committed())
            .map(|(name, _)| name.as_str())
    }

    pub fn rolled_back(&self) -> impl Iterator<Item = (&str, &HotReloadError)> {
        self.programs.iter().filter_map(|(name, outcome)| match outcome {
            ReloadOutcome::RolledBack(err) => Some((name.as_str(), err)),
            ReloadOutcome::Committed => None,
        })
    }

    pub fn outcome(&self, name: &str) -> Option<&ReloadOutcome> {
        self.programs
            .iter()
            .find(|(program, _)| program == name)
            .map(|(_, outcome)| outcome)
    }
}

/// Owns the watched files, the program table and the graphics backend.
///
/// Construct one at startup and keep it next to the render loop. The render
/// path looks programs up by name every frame via
/// [`current_handle`](Self::current_handle), so a hot swap is invisible to it.
pub struct HotReloadController<B: ShaderBackend> {
    backend: B,
    tracker: FileTimestampTracker,
    registry: ProgramRegistry<B::Program>,
}

impl<B: ShaderBackend> HotReloadController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            tracker: FileTimestampTracker::new(),
            registry: ProgramRegistry::new(),
        }
    }

    /// Compile and link `name` from two source files and start watching both.
    ///
    /// There is no previous program to fall back to here, so every failure
    /// is returned. Registering a name that already exists replaces it and
    /// releases the old program.
    pub fn register_program(
        &mut self,
        name: &str,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<B::Program, HotReloadError> {
        let vertex_path = vertex_path.as_ref();
        let fragment_path = fragment_path.as_ref();

        let handle = self.build_program(name, vertex_path, fragment_path)?;
        for path in [vertex_path, fragment_path] {
            if let Err(err) = self.tracker.register(path) {
                self.backend.delete_program(handle);
                return Err(err);
            }
        }

        if let Some(previous) = self
            .registry
            .upsert(name, handle, vertex_path, fragment_path)
        {
            self.backend.delete_program(previous);
        }
        log::info!(
            "Program '{}' built from {} + {} ({:?})",
            name,
            vertex_path.display(),
            fragment_path.display(),
            handle
        );
        Ok(handle)
    }

    /// Check watched files and rebuild every program affected by a change.
    ///
    /// Call once per loop iteration from the thread that owns the graphics
    /// context. Never fails: unreadable files and broken shaders are logged
    /// and the affected programs keep their last good build.
    pub fn poll_and_reload(&mut self) -> ReloadSummary {
        let changes = self.tracker.poll_changes();
        for err in &changes.unreadable {
            log::warn!("{err}. Keeping the last good programs.");
        }

        let mut summary = ReloadSummary {
            changed_files: changes.changed,
            unreadable_files: changes.unreadable,
            programs: Vec::new(),
        };
        if summary.changed_files.is_empty() {
            return summary;
        }

        for name in self.affected_programs(&summary.changed_files) {
            if let Some(outcome) = self.rebuild(&name) {
                summary.programs.push((name, outcome));
            }
        }
        summary
    }

    /// Rebuild one program now, whether or not its files changed.
    /// Returns `None` for an unknown name.
    pub fn force_reload(&mut self, name: &str) -> Option<ReloadOutcome> {
        log::info!("Program '{}' force reload", name);
        self.rebuild(name)
    }

    /// Handle to bind for `name`, looked up fresh on every call.
    pub fn current_handle(&self, name: &str) -> Option<B::Program> {
        self.registry.handle(name)
    }

    /// Drop `name` from the table and release its program. Its source files
    /// stay watched.
    pub fn unregister_program(&mut self, name: &str) -> bool {
        match self.registry.remove(name) {
            Some(entry) => {
                self.backend.delete_program(entry.handle);
                log::info!("Program '{}' unregistered", name);
                true
            }
            None => false,
        }
    }

    /// Release every program and hand the backend back. Call before the
    /// graphics context goes away.
    pub fn shutdown(mut self) -> B {
        let names: Vec<String> = self.registry.names().map(str::to_string).collect();
        for name in names {
            if let Some(entry) = self.registry.remove(&name) {
                self.backend.delete_program(entry.handle);
            }
        }
        self.backend
    }

    pub fn registry(&self) -> &ProgramRegistry<B::Program> {
        &self.registry
    }

    pub fn tracker(&self) -> &FileTimestampTracker {
        &self.tracker
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Union of dependents across `changed`, first occurrence wins, so a
    /// program built from two changed files is listed once.
    fn affected_programs(&self, changed: &[PathBuf]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut affected = Vec::new();
        for path in changed {
            for name in self.registry.dependents_of(path) {
                if seen.insert(name.clone()) {
                    affected.push(name);
                }
            }
        }
        affected
    }

    fn rebuild(&mut self, name: &str) -> Option<ReloadOutcome> {
        let entry = self.registry.get(name)?;
        let old_handle = entry.handle;
        let vertex_path = entry.vertex_path.clone();
        let fragment_path = entry.fragment_path.clone();
        log::info!("Program '{}' ({:?}) needs rebuilding", name, old_handle);

        match self.build_program(name, &vertex_path, &fragment_path) {
            Ok(new_handle) => {
                // Commit point: from here on the render path sees the new handle.
                self.registry
                    .upsert(name, new_handle, &vertex_path, &fragment_path);
                self.backend.delete_program(old_handle);
                log::info!(
                    "Program '{}' reloaded: {:?} -> {:?}",
                    name,
                    old_handle,
                    new_handle
                );
                Some(ReloadOutcome::Committed)
            }
            Err(err) => {
                log::error!("{err}");
                log::error!(
                    "Failed to rebuild program '{}', continuing with previous compilation ({:?})",
                    name,
                    old_handle
                );
                Some(ReloadOutcome::RolledBack(err))
            }
        }
    }

    /// Read, compile and link. Intermediate shader objects never outlive
    /// this call.
    fn build_program(
        &mut self,
        name: &str,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<B::Program, HotReloadError> {
        let vertex_source = read_source(vertex_path)?;
        let fragment_source = read_source(fragment_path)?;

        let vertex = self.compile(vertex_path, &vertex_source, ShaderStage::Vertex)?;
        let fragment = match self.compile(fragment_path, &fragment_source, ShaderStage::Fragment)
        {
            Ok(shader) => shader,
            Err(err) => {
                self.backend.delete_shader(vertex);
                return Err(err);
            }
        };

        let linked = self.backend.link_program(vertex, fragment);
        self.backend.delete_shader(vertex);
        self.backend.delete_shader(fragment);
        linked.map_err(|message| HotReloadError::Link {
            name: name.to_string(),
            message,
        })
    }

    fn compile(
        &mut self,
        path: &Path,
        source: &str,
        stage: ShaderStage,
    ) -> Result<B::Shader, HotReloadError> {
        self.backend
            .compile_shader(source, stage)
            .map_err(|message| HotReloadError::Compile {
                path: path.to_path_buf(),
                stage,
                message,
            })
    }
}

fn read_source(path: &Path) -> Result<String, HotReloadError> {
    fs::read_to_string(path).map_err(|e| HotReloadError::filesystem(path, e))
}
