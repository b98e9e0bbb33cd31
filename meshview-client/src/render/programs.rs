//! The viewer's shader programs, one per shading style.

use meshview_core::selection::ShadingStyle;

use crate::abs::{GraphicsContext, ShaderCompileError, ShaderProgram, SharedProgram};

/// Builds a [`ShaderProgram`] from `shaders/<name>/vert.glsl` and `shaders/<name>/frag.glsl`.
macro_rules! shader_program {
    ($name:ident) => {
        ShaderProgram::new(
            include_str!(concat!("shaders/", stringify!($name), "/vert.glsl")),
            include_str!(concat!("shaders/", stringify!($name), "/frag.glsl")),
        )
    };
}

/// One shared program per shading style. Every material of a style draws with the same program.
#[derive(Debug, Clone)]
pub struct ShaderLibrary {
    unlit: SharedProgram,
    gouraud: SharedProgram,
    phong: SharedProgram,
}

impl Default for ShaderLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderLibrary {
    /// Creates the programs without compiling them.
    pub fn new() -> Self {
        Self {
            unlit: shader_program!(unlit).shared(),
            gouraud: shader_program!(gouraud).shared(),
            phong: shader_program!(phong).shared(),
        }
    }

    pub fn program(&self, style: ShadingStyle) -> &SharedProgram {
        match style {
            ShadingStyle::Unlit => &self.unlit,
            ShadingStyle::Gouraud => &self.gouraud,
            ShadingStyle::Phong => &self.phong,
        }
    }

    /// Compiles every program, so a broken shader fails at startup rather than on first use.
    pub fn compile_all(&self, gl: &mut dyn GraphicsContext) -> Result<(), ShaderCompileError> {
        for style in ShadingStyle::ALL {
            self.program(style).borrow_mut().initialize(gl).inspect_err(|err| {
                log::error!("Could not build the {} shader: {}", style, err);
            })?;
        }
        log::info!("Compiled {} shader programs", ShadingStyle::ALL.len());
        Ok(())
    }
}
