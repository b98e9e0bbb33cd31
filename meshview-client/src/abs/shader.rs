//! Shader programs
//!
//! This module defines [`ShaderProgram`], a lazily compiled program with cached uniform and
//! attribute locations, and the [`Uniform`] trait for uploading values to it.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use glam::{Mat4, Vec3, Vec4};

use super::gpu::{AttributeSlot, GraphicsContext, ProgramId, UniformLocation};

/// The step of program creation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Link,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex shader compilation",
            ShaderStage::Fragment => "fragment shader compilation",
            ShaderStage::Link => "program linking",
        })
    }
}

/// A program failed to compile or link. Carries the driver's info log.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{stage} failed: {log}")]
pub struct ShaderCompileError {
    pub stage: ShaderStage,
    pub log: String,
}

/// A value that can be uploaded to a uniform.
pub trait Uniform {
    /// Uploads the value. Does nothing when `location` is `None`.
    fn set_uniform(&self, gl: &mut dyn GraphicsContext, location: Option<UniformLocation>);
}

impl Uniform for bool {
    fn set_uniform(&self, gl: &mut dyn GraphicsContext, location: Option<UniformLocation>) {
        if let Some(loc) = location {
            gl.uniform_1_i32(loc, *self as i32);
        }
    }
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &mut dyn GraphicsContext, location: Option<UniformLocation>) {
        if let Some(loc) = location {
            gl.uniform_1_i32(loc, *self);
        }
    }
}

impl Uniform for f32 {
    fn set_uniform(&self, gl: &mut dyn GraphicsContext, location: Option<UniformLocation>) {
        if let Some(loc) = location {
            gl.uniform_1_f32(loc, *self);
        }
    }
}

impl Uniform for Vec3 {
    fn set_uniform(&self, gl: &mut dyn GraphicsContext, location: Option<UniformLocation>) {
        if let Some(loc) = location {
            gl.uniform_3_f32(loc, *self);
        }
    }
}

impl Uniform for Vec4 {
    fn set_uniform(&self, gl: &mut dyn GraphicsContext, location: Option<UniformLocation>) {
        if let Some(loc) = location {
            gl.uniform_4_f32(loc, *self);
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &mut dyn GraphicsContext, location: Option<UniformLocation>) {
        if let Some(loc) = location {
            gl.uniform_matrix_4_f32(loc, self);
        }
    }
}

/// A shader program shared by every material of one shading style.
pub type SharedProgram = Rc<RefCell<ShaderProgram>>;

/// A vertex and fragment shader pair, compiled on first use.
///
/// Location lookups are cached per name, including names the program does not declare, so
/// each name reaches the GPU at most once.
#[derive(Debug)]
pub struct ShaderProgram {
    vertex_source: &'static str,
    fragment_source: &'static str,
    id: Option<ProgramId>,
    uniforms: HashMap<String, Option<UniformLocation>>,
    attributes: HashMap<String, Option<AttributeSlot>>,
}

impl ShaderProgram {
    pub fn new(vertex_source: &'static str, fragment_source: &'static str) -> Self {
        Self {
            vertex_source,
            fragment_source,
            id: None,
            uniforms: HashMap::new(),
            attributes: HashMap::new(),
        }
    }

    /// Wraps the program for sharing between materials.
    pub fn shared(self) -> SharedProgram {
        Rc::new(RefCell::new(self))
    }

    /// The vertex and fragment sources.
    pub fn sources(&self) -> (&'static str, &'static str) {
        (self.vertex_source, self.fragment_source)
    }

    /// The program handle, once compiled.
    pub fn id(&self) -> Option<ProgramId> {
        self.id
    }

    pub fn is_initialized(&self) -> bool {
        self.id.is_some()
    }

    /// Compiles and links the program. Later calls return the existing handle.
    ///
    /// A failed compile leaves the program uninitialized, so the next call tries again.
    pub fn initialize(
        &mut self,
        gl: &mut dyn GraphicsContext,
    ) -> Result<ProgramId, ShaderCompileError> {
        if let Some(id) = self.id {
            return Ok(id);
        }

        let id = gl.create_program(self.vertex_source, self.fragment_source)?;
        log::debug!("Compiled shader program {:?}", id);
        self.id = Some(id);
        Ok(id)
    }

    /// Location of the uniform `name`, or `None` if the program does not declare it.
    pub fn uniform_location(
        &mut self,
        gl: &mut dyn GraphicsContext,
        name: &str,
    ) -> Result<Option<UniformLocation>, ShaderCompileError> {
        if let Some(location) = self.uniforms.get(name) {
            return Ok(*location);
        }

        let id = self.initialize(gl)?;
        let location = gl.uniform_location(id, name);
        if location.is_none() {
            log::trace!("Program {:?} has no uniform '{}'", id, name);
        }
        self.uniforms.insert(name.to_string(), location);
        Ok(location)
    }

    /// Slot of the vertex attribute `name`, or `None` if the program does not declare it.
    pub fn attribute_location(
        &mut self,
        gl: &mut dyn GraphicsContext,
        name: &str,
    ) -> Result<Option<AttributeSlot>, ShaderCompileError> {
        if let Some(slot) = self.attributes.get(name) {
            return Ok(*slot);
        }

        let id = self.initialize(gl)?;
        let slot = gl.attribute_location(id, name);
        if slot.is_none() {
            log::trace!("Program {:?} has no attribute '{}'", id, name);
        }
        self.attributes.insert(name.to_string(), slot);
        Ok(slot)
    }
}
