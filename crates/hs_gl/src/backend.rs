use std::sync::Arc;

use glow::HasContext;
use hs_core::{ShaderBackend, ShaderStage};

/// [`ShaderBackend`] over a glow OpenGL context.
///
/// Every call issues raw GL commands, so the backend must only be used on
/// the thread where its context is current.
pub struct GlowBackend {
    gl: Arc<glow::Context>,
}

impl GlowBackend {
    /// # Safety
    ///
    /// `gl` must be a valid context that is current on the calling thread,
    /// and stay current on this thread for as long as the backend is used.
    pub unsafe fn new(gl: Arc<glow::Context>) -> Self {
        Self { gl }
    }

    pub fn context(&self) -> &Arc<glow::Context> {
        &self.gl
    }
}

fn gl_stage(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

impl ShaderBackend for GlowBackend {
    type Shader = glow::Shader;
    type Program = glow::Program;

    fn compile_shader(&mut self, source: &str, stage: ShaderStage) -> Result<glow::Shader, String> {
        let gl = &self.gl;
        // SAFETY: the context is current on this thread (contract of `new`).
        unsafe {
            let shader = gl.create_shader(gl_stage(stage))?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(log.trim_end().to_string());
            }
            Ok(shader)
        }
    }

    fn link_program(
        &mut self,
        vertex: glow::Shader,
        fragment: glow::Shader,
    ) -> Result<glow::Program, String> {
        let gl = &self.gl;
        // SAFETY: the context is current on this thread (contract of `new`).
        unsafe {
            let program = gl.create_program()?;
            gl.attach_shader(program, vertex);
            gl.attach_shader(program, fragment);
            gl.link_program(program);

            // A linked program keeps what it needs; detaching lets the
            // caller's delete_shader free the shader objects right away.
            gl.detach_shader(program, vertex);
            gl.detach_shader(program, fragment);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(log.trim_end().to_string());
            }
            Ok(program)
        }
    }

    fn delete_shader(&mut self, shader: glow::Shader) {
        // SAFETY: the context is current on this thread (contract of `new`).
        unsafe { self.gl.delete_shader(shader) }
    }

    fn delete_program(&mut self, program: glow::Program) {
        log::debug!("Deleting GL program {:?}", program);
        // SAFETY: the context is current on this thread (contract of `new`).
        unsafe { self.gl.delete_program(program) }
    }
}
