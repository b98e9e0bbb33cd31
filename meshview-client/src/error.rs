use meshview_core::{catalog::ConfigurationError, mesh::MeshError};

use crate::abs::{GpuError, ShaderCompileError};

/// Anything that stops the viewer from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Shader(#[from] ShaderCompileError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
    #[error("could not load model '{name}': {source}")]
    Model { name: String, source: MeshError },
    #[error("window setup failed: {0}")]
    Window(String),
    #[error("could not start logging: {0}")]
    Logging(#[from] log::SetLoggerError),
}
