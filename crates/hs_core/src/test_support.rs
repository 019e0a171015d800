//! Shared helpers for unit tests: scratch files with controlled mtimes and a
//! recording backend that never touches a GPU.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::backend::{ShaderBackend, ShaderStage};

/// Sources containing this fail to compile.
pub const COMPILE_ERROR_MARKER: &str = "#error";
/// Sources containing this compile but fail to link.
pub const LINK_ERROR_MARKER: &str = "// link-fail";

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write temp shader file");
    path
}

/// Pin a file's mtime so change detection does not depend on filesystem
/// timestamp granularity.
pub fn set_mtime(path: &Path, time: SystemTime) {
    let file = fs::OpenOptions::new()
        .write(true)
        .open(path)
        .expect("failed to open temp file for mtime update");
    file.set_modified(time).expect("failed to set mtime");
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    next_id: u32,
    shader_sources: HashMap<u32, String>,
    pub live_shaders: HashSet<u32>,
    pub live_programs: HashSet<u32>,
    pub compile_calls: usize,
    pub link_calls: usize,
    pub deleted_programs: Vec<u32>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backend_calls(&self) -> usize {
        self.compile_calls + self.link_calls
    }

    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl ShaderBackend for FakeBackend {
    type Shader = u32;
    type Program = u32;

    fn compile_shader(&mut self, source: &str, stage: ShaderStage) -> Result<u32, String> {
        self.compile_calls += 1;
        if source.contains(COMPILE_ERROR_MARKER) {
            return Err(format!("0:1({stage}): error: syntax error"));
        }
        let id = self.allocate();
        self.shader_sources.insert(id, source.to_string());
        self.live_shaders.insert(id);
        Ok(id)
    }

    fn link_program(&mut self, vertex: u32, fragment: u32) -> Result<u32, String> {
        self.link_calls += 1;
        let fails = [vertex, fragment].iter().any(|id| {
            self.shader_sources
                .get(id)
                .is_some_and(|src| src.contains(LINK_ERROR_MARKER))
        });
        if fails {
            return Err("error: interface mismatch between stages".to_string());
        }
        let id = self.allocate();
        self.live_programs.insert(id);
        Ok(id)
    }

    fn delete_shader(&mut self, shader: u32) {
        assert!(
            self.live_shaders.remove(&shader),
            "shader {shader} deleted twice or never created"
        );
    }

    fn delete_program(&mut self, program: u32) {
        assert!(
            self.live_programs.remove(&program),
            "program {program} deleted twice or never created"
        );
        self.deleted_programs.push(program);
    }
}
