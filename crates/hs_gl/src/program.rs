//! Draw-path helpers. Programs are always selected by name through the
//! controller so a hot swap takes effect on the next bind.

use glow::HasContext;

use crate::GlHotReloadController;

/// Bind the current build of `name` for drawing.
///
/// Returns `false` (and leaves the bound program alone) for an unknown name.
///
/// # Safety
///
/// Requires the controller's context to be current on this thread.
pub unsafe fn bind_program(controller: &GlHotReloadController, name: &str) -> bool {
    let Some(program) = controller.current_handle(name) else {
        log::warn!("bind_program: no program named '{}'", name);
        return false;
    };
    let gl = controller.backend().context();
    unsafe { gl.use_program(Some(program)) };
    true
}

/// Set a `float` uniform on `program`. Missing uniforms (including ones the
/// driver optimized away) are ignored.
///
/// The program must already be bound.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
pub unsafe fn set_uniform_f32(gl: &glow::Context, program: glow::Program, name: &str, value: f32) {
    unsafe {
        let location = gl.get_uniform_location(program, name);
        gl.uniform_1_f32(location.as_ref(), value);
    }
}

/// The `GL_VERSION` string of the current context.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
pub unsafe fn gl_version(gl: &glow::Context) -> String {
    unsafe { gl.get_parameter_string(glow::VERSION) }
}
