use std::path::PathBuf;

use crate::backend::ShaderStage;

/// Failures surfaced by the hot-reload subsystem.
///
/// During initial registration these are returned to the caller. During a
/// poll they are logged and collected into the [`ReloadSummary`], never
/// returned.
///
/// [`ReloadSummary`]: crate::controller::ReloadSummary
#[derive(thiserror::Error, Debug)]
pub enum HotReloadError {
    #[error("Failed to access shader file {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to compile {stage} shader {}: {message}", .path.display())]
    Compile {
        path: PathBuf,
        stage: ShaderStage,
        message: String,
    },

    #[error("Failed to link program '{name}': {message}")]
    Link { name: String, message: String },
}

impl HotReloadError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn is_filesystem(&self) -> bool {
        matches!(self, Self::Filesystem { .. })
    }

    pub fn is_compile(&self) -> bool {
        matches!(self, Self::Compile { .. })
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_message_names_stage_and_path() {
        let err = HotReloadError::Compile {
            path: PathBuf::from("shaders/frag.glsl"),
            stage: ShaderStage::Fragment,
            message: "unexpected token".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("fragment"));
        assert!(text.contains("shaders/frag.glsl"));
        assert!(text.contains("unexpected token"));
        assert!(err.is_compile());
        assert!(!err.is_link());
    }

    #[test]
    fn filesystem_error_keeps_io_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = HotReloadError::filesystem("missing.vert", io);
        assert!(err.is_filesystem());
        let source = std::error::Error::source(&err).expect("io source is kept");
        assert_eq!(source.to_string(), "gone");
    }
}
