//! Modification-time polling for shader source files.
//!
//! Every distinct path is tracked once, however many programs use it. A poll
//! re-stats every tracked file and reports each one whose mtime differs from
//! the stored value, then stores the fresh value, so a single save is
//! reported exactly once.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::HotReloadError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedFile {
    pub path: PathBuf,
    pub last_modified: SystemTime,
}

/// Result of one full scan.
#[derive(Debug, Default)]
pub struct ChangeSet {
    /// Changed paths, in registration order.
    pub changed: Vec<PathBuf>,
    /// Files that could not be stat'ed this poll. They keep their stored
    /// timestamp and are checked again next poll.
    pub unreadable: Vec<HotReloadError>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.changed.iter().any(|p| p == path)
    }
}

#[derive(Debug, Default)]
pub struct FileTimestampTracker {
    files: Vec<WatchedFile>,
    index: HashMap<PathBuf, usize>,
}

impl FileTimestampTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `path`. Already-tracked paths are left untouched.
    pub fn register(&mut self, path: &Path) -> Result<(), HotReloadError> {
        if self.index.contains_key(path) {
            return Ok(());
        }
        let last_modified = modified_time(path)?;
        self.index.insert(path.to_path_buf(), self.files.len());
        self.files.push(WatchedFile {
            path: path.to_path_buf(),
            last_modified,
        });
        log::debug!("Watching shader file {}", path.display());
        Ok(())
    }

    pub fn poll_changes(&mut self) -> ChangeSet {
        let mut changes = ChangeSet::default();
        for file in &mut self.files {
            let current = match modified_time(&file.path) {
                Ok(time) => time,
                Err(err) => {
                    changes.unreadable.push(err);
                    continue;
                }
            };
            if current != file.last_modified {
                log::info!("Shader file changed: {}", file.path.display());
                file.last_modified = current;
                changes.changed.push(file.path.clone());
            }
        }
        changes
    }

    pub fn is_tracked(&self, path: &Path) -> bool {
        self.index.contains_key(path)
    }

    pub fn last_modified(&self, path: &Path) -> Option<SystemTime> {
        self.index.get(path).map(|&i| self.files[i].last_modified)
    }

    pub fn files(&self) -> &[WatchedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn modified_time(path: &Path) -> Result<SystemTime, HotReloadError> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| HotReloadError::filesystem(path, e))
}
