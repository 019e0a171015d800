//! The graphics-API seam.
//!
//! The hot-reload logic only needs four operations from the graphics API.
//! Everything else (buffers, textures, draw calls) stays with the host.

use std::fmt;

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const ALL: &'static [ShaderStage] = &[ShaderStage::Vertex, ShaderStage::Fragment];

    pub fn label(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Compile/link/delete operations of a graphics API.
///
/// Implementations are bound to whatever context they were created with; all
/// calls happen on the thread that owns it. Error strings are the driver's
/// info log (or an equivalent diagnostic).
pub trait ShaderBackend {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + Eq + fmt::Debug;

    fn compile_shader(&mut self, source: &str, stage: ShaderStage) -> Result<Self::Shader, String>;

    /// Create a program from two compiled stages and link it.
    ///
    /// On failure no program object may be left behind. The shaders are not
    /// consumed; the caller deletes them whatever the outcome.
    fn link_program(
        &mut self,
        vertex: Self::Shader,
        fragment: Self::Shader,
    ) -> Result<Self::Program, String>;

    fn delete_shader(&mut self, shader: Self::Shader);

    fn delete_program(&mut self, program: Self::Program);
}
