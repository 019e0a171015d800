//! OpenGL implementation of the hot-reload backend, on top of [glow].
//!
//! A host creates one [`GlowBackend`] after its context is current, hands it
//! to [`hs_core::HotReloadController`], and selects programs by name in its
//! draw path with [`bind_program`].
//!
//! [glow]: https://docs.rs/glow

mod backend;
mod program;

pub use backend::GlowBackend;
pub use program::{bind_program, gl_version, set_uniform_f32};

/// Controller type used by GL hosts.
pub type GlHotReloadController = hs_core::HotReloadController<GlowBackend>;
