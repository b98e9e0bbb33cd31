//! The graphics context.
//!
//! This module defines the [`GraphicsContext`] trait, the one object every material draw
//! receives and mutates, and [`GlowContext`], its OpenGL implementation on top of `glow`.
//!
//! Attribute enable state, bound buffers and texture units live in the context and persist
//! from one draw to the next, whichever material issued them.

use std::{num::NonZeroU32, sync::Arc};

use glam::{Mat4, Vec3, Vec4};
use glow::HasContext;
use meshview_core::Side;

use super::shader::{ShaderCompileError, ShaderStage};

/// A linked shader program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramId(pub NonZeroU32);

/// A GPU buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferId(pub NonZeroU32);

/// A GPU texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub NonZeroU32);

/// A resolved uniform location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// A vertex attribute slot.
pub type AttributeSlot = u32;

/// What a buffer holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Vertex,
    Index,
}

/// Errors creating GPU resources.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("could not create {what}: {message}")]
    Create { what: &'static str, message: String },
}

/// The GPU operations the viewer issues.
///
/// Location queries return `None` when the program does not declare the name. Callers treat
/// that as "skip the upload", never as an error.
pub trait GraphicsContext {
    /// Compiles both stages and links them into a program.
    fn create_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramId, ShaderCompileError>;

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation>;
    fn attribute_location(&mut self, program: ProgramId, name: &str) -> Option<AttributeSlot>;

    fn use_program(&mut self, program: ProgramId);
    fn set_cull_side(&mut self, side: Side);

    fn uniform_1_i32(&mut self, location: UniformLocation, value: i32);
    fn uniform_1_f32(&mut self, location: UniformLocation, value: f32);
    fn uniform_3_f32(&mut self, location: UniformLocation, value: Vec3);
    fn uniform_4_f32(&mut self, location: UniformLocation, value: Vec4);
    fn uniform_matrix_4_f32(&mut self, location: UniformLocation, value: &Mat4);

    /// Binds a vertex buffer as the source of the next attribute pointer.
    fn bind_vertex_buffer(&mut self, buffer: BufferId);
    /// Points `slot` at the bound vertex buffer, tightly packed floats.
    fn vertex_attrib_pointer_f32(&mut self, slot: AttributeSlot, components: i32);
    fn enable_vertex_attrib_array(&mut self, slot: AttributeSlot);
    fn disable_vertex_attrib_array(&mut self, slot: AttributeSlot);

    /// Makes `unit` active and binds a 2D texture to it.
    fn bind_texture(&mut self, unit: u32, texture: TextureId);

    fn bind_index_buffer(&mut self, buffer: BufferId);
    /// Draws `index_count` `u32` indices from the bound index buffer as triangles.
    fn draw_triangles(&mut self, index_count: i32);

    fn create_buffer(&mut self, target: BufferTarget, data: &[u8]) -> Result<BufferId, GpuError>;
    /// Uploads tightly packed RGBA8 pixels with mipmaps and repeat wrapping.
    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<TextureId, GpuError>;
}

/// [`GraphicsContext`] over an OpenGL 3.3 core context.
pub struct GlowContext {
    gl: Arc<glow::Context>,
    _vertex_array: glow::VertexArray,
}

impl GlowContext {
    /// Wraps the context and binds the single vertex array object used for every draw, so
    /// attribute state is shared by all materials.
    pub fn new(gl: &Arc<glow::Context>) -> Result<Self, GpuError> {
        unsafe {
            let vertex_array = gl.create_vertex_array().map_err(|message| GpuError::Create {
                what: "vertex array",
                message,
            })?;
            gl.bind_vertex_array(Some(vertex_array));
            gl.enable(glow::DEPTH_TEST);
            gl.front_face(glow::CCW);

            Ok(Self {
                gl: Arc::clone(gl),
                _vertex_array: vertex_array,
            })
        }
    }

    /// The underlying `glow` context.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    fn compile_shader(
        &self,
        stage: ShaderStage,
        source: &str,
    ) -> Result<glow::Shader, ShaderCompileError> {
        let shader_type = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            _ => glow::FRAGMENT_SHADER,
        };
        unsafe {
            let shader = self
                .gl
                .create_shader(shader_type)
                .map_err(|log| ShaderCompileError { stage, log })?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);

            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(ShaderCompileError { stage, log });
            }

            Ok(shader)
        }
    }
}

impl GraphicsContext for GlowContext {
    fn create_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramId, ShaderCompileError> {
        let vertex = self.compile_shader(ShaderStage::Vertex, vertex_source)?;
        let fragment = match self.compile_shader(ShaderStage::Fragment, fragment_source) {
            Ok(fragment) => fragment,
            Err(err) => {
                unsafe { self.gl.delete_shader(vertex) };
                return Err(err);
            }
        };

        unsafe {
            let program = self.gl.create_program().map_err(|log| ShaderCompileError {
                stage: ShaderStage::Link,
                log,
            })?;
            self.gl.attach_shader(program, vertex);
            self.gl.attach_shader(program, fragment);
            self.gl.link_program(program);

            let linked = self.gl.get_program_link_status(program);
            let log = if linked {
                String::new()
            } else {
                self.gl.get_program_info_log(program)
            };

            for shader in [vertex, fragment] {
                self.gl.detach_shader(program, shader);
                self.gl.delete_shader(shader);
            }

            if !linked {
                self.gl.delete_program(program);
                return Err(ShaderCompileError {
                    stage: ShaderStage::Link,
                    log,
                });
            }

            Ok(ProgramId(program.0))
        }
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        unsafe {
            self.gl
                .get_uniform_location(glow::NativeProgram(program.0), name)
                .map(|location| UniformLocation(location.0))
        }
    }

    fn attribute_location(&mut self, program: ProgramId, name: &str) -> Option<AttributeSlot> {
        unsafe { self.gl.get_attrib_location(glow::NativeProgram(program.0), name) }
    }

    fn use_program(&mut self, program: ProgramId) {
        unsafe { self.gl.use_program(Some(glow::NativeProgram(program.0))) }
    }

    fn set_cull_side(&mut self, side: Side) {
        unsafe {
            match side {
                Side::Front => {
                    self.gl.enable(glow::CULL_FACE);
                    self.gl.cull_face(glow::BACK);
                }
                Side::Back => {
                    self.gl.enable(glow::CULL_FACE);
                    self.gl.cull_face(glow::FRONT);
                }
                Side::Double => self.gl.disable(glow::CULL_FACE),
            }
        }
    }

    fn uniform_1_i32(&mut self, location: UniformLocation, value: i32) {
        let location = glow::NativeUniformLocation(location.0);
        unsafe { self.gl.uniform_1_i32(Some(&location), value) }
    }

    fn uniform_1_f32(&mut self, location: UniformLocation, value: f32) {
        let location = glow::NativeUniformLocation(location.0);
        unsafe { self.gl.uniform_1_f32(Some(&location), value) }
    }

    fn uniform_3_f32(&mut self, location: UniformLocation, value: Vec3) {
        let location = glow::NativeUniformLocation(location.0);
        unsafe { self.gl.uniform_3_f32(Some(&location), value.x, value.y, value.z) }
    }

    fn uniform_4_f32(&mut self, location: UniformLocation, value: Vec4) {
        let location = glow::NativeUniformLocation(location.0);
        unsafe {
            self.gl
                .uniform_4_f32(Some(&location), value.x, value.y, value.z, value.w)
        }
    }

    fn uniform_matrix_4_f32(&mut self, location: UniformLocation, value: &Mat4) {
        let location = glow::NativeUniformLocation(location.0);
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(Some(&location), false, &value.to_cols_array())
        }
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferId) {
        unsafe {
            self.gl
                .bind_buffer(glow::ARRAY_BUFFER, Some(glow::NativeBuffer(buffer.0)))
        }
    }

    fn vertex_attrib_pointer_f32(&mut self, slot: AttributeSlot, components: i32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(slot, components, glow::FLOAT, false, 0, 0)
        }
    }

    fn enable_vertex_attrib_array(&mut self, slot: AttributeSlot) {
        unsafe { self.gl.enable_vertex_attrib_array(slot) }
    }

    fn disable_vertex_attrib_array(&mut self, slot: AttributeSlot) {
        unsafe { self.gl.disable_vertex_attrib_array(slot) }
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl
                .bind_texture(glow::TEXTURE_2D, Some(glow::NativeTexture(texture.0)));
        }
    }

    fn bind_index_buffer(&mut self, buffer: BufferId) {
        unsafe {
            self.gl
                .bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(glow::NativeBuffer(buffer.0)))
        }
    }

    fn draw_triangles(&mut self, index_count: i32) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, index_count, glow::UNSIGNED_INT, 0)
        }
    }

    fn create_buffer(&mut self, target: BufferTarget, data: &[u8]) -> Result<BufferId, GpuError> {
        let target = match target {
            BufferTarget::Vertex => glow::ARRAY_BUFFER,
            BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
        };
        unsafe {
            let buffer = self.gl.create_buffer().map_err(|message| GpuError::Create {
                what: "buffer",
                message,
            })?;
            self.gl.bind_buffer(target, Some(buffer));
            self.gl.buffer_data_u8_slice(target, data, glow::STATIC_DRAW);
            Ok(BufferId(buffer.0))
        }
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<TextureId, GpuError> {
        unsafe {
            let texture = self.gl.create_texture().map_err(|message| GpuError::Create {
                what: "texture",
                message,
            })?;
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(rgba)),
            );
            self.gl.generate_mipmap(glow::TEXTURE_2D);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            self.gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(TextureId(texture.0))
        }
    }
}
