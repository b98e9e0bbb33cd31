//! Materials
//!
//! A material pairs a shared [`ShaderProgram`](crate::abs::ShaderProgram) with surface
//! properties and knows how to draw a [`GpuMesh`] with them. There are exactly three:
//! [`UnlitMaterial`], [`GouraudMaterial`] and [`PhongMaterial`]. Mesh entities refer to them
//! through a [`MaterialHandle`], so several meshes can share one instance and see its property
//! changes on the next frame.
//!
//! Attribute enable state survives from one draw to the next, whichever material issued it. A
//! material drawing without a texture therefore always disables the texture coordinate slot
//! instead of leaving it as the previous draw set it.

mod gouraud;
mod lit;
mod phong;
mod unlit;

use std::{cell::RefCell, rc::Rc};

use glam::Mat4;
use meshview_core::{
    camera::Camera, light::LightManager, selection::ShadingStyle, transform::Transform, Side,
};

use crate::abs::{
    AttributeSlot, BufferId, GpuMesh, GraphicsContext, ProgramId, ShaderCompileError,
    ShaderProgram, Texture, Uniform, UniformLocation,
};

pub use gouraud::{GouraudMaterial, PerVertex};
pub use lit::{LightingModel, LitMaterial};
pub use phong::{PerPixel, PhongMaterial};
pub use unlit::UnlitMaterial;

/// A shared reference to one of the three materials.
#[derive(Debug, Clone)]
pub enum MaterialHandle {
    Unlit(Rc<RefCell<UnlitMaterial>>),
    Gouraud(Rc<RefCell<GouraudMaterial>>),
    Phong(Rc<RefCell<PhongMaterial>>),
}

impl MaterialHandle {
    /// The shading style of the referenced material.
    pub fn style(&self) -> ShadingStyle {
        match self {
            MaterialHandle::Unlit(_) => ShadingStyle::Unlit,
            MaterialHandle::Gouraud(_) => ShadingStyle::Gouraud,
            MaterialHandle::Phong(_) => ShadingStyle::Phong,
        }
    }

    /// Draws `mesh` with the referenced material.
    pub fn draw(
        &self,
        gl: &mut dyn GraphicsContext,
        mesh: &GpuMesh,
        transform: &Transform,
        camera: &dyn Camera,
        lights: &dyn LightManager,
    ) {
        match self {
            MaterialHandle::Unlit(material) => {
                material.borrow().draw(gl, mesh, transform, camera, lights)
            }
            MaterialHandle::Gouraud(material) => {
                material.borrow().draw(gl, mesh, transform, camera, lights)
            }
            MaterialHandle::Phong(material) => {
                material.borrow().draw(gl, mesh, transform, camera, lights)
            }
        }
    }

    /// Whether both handles refer to the same instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MaterialHandle::Unlit(a), MaterialHandle::Unlit(b)) => Rc::ptr_eq(a, b),
            (MaterialHandle::Gouraud(a), MaterialHandle::Gouraud(b)) => Rc::ptr_eq(a, b),
            (MaterialHandle::Phong(a), MaterialHandle::Phong(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Rc<RefCell<UnlitMaterial>>> for MaterialHandle {
    fn from(material: Rc<RefCell<UnlitMaterial>>) -> Self {
        MaterialHandle::Unlit(material)
    }
}

impl From<Rc<RefCell<GouraudMaterial>>> for MaterialHandle {
    fn from(material: Rc<RefCell<GouraudMaterial>>) -> Self {
        MaterialHandle::Gouraud(material)
    }
}

impl From<Rc<RefCell<PhongMaterial>>> for MaterialHandle {
    fn from(material: Rc<RefCell<PhongMaterial>>) -> Self {
        MaterialHandle::Phong(material)
    }
}

/// Locations every material uses: transforms, positions, colors and texturing.
#[derive(Debug, Clone, Copy)]
struct CommonLocations {
    program: ProgramId,
    model_view: Option<UniformLocation>,
    projection: Option<UniformLocation>,
    use_texture: Option<UniformLocation>,
    sampler: Option<UniformLocation>,
    position: Option<AttributeSlot>,
    color: Option<AttributeSlot>,
    tex_coord: Option<AttributeSlot>,
}

impl CommonLocations {
    fn resolve(
        program: &mut ShaderProgram,
        gl: &mut dyn GraphicsContext,
    ) -> Result<Self, ShaderCompileError> {
        Ok(Self {
            program: program.initialize(gl)?,
            model_view: program.uniform_location(gl, "modelViewMatrix")?,
            projection: program.uniform_location(gl, "projectionMatrix")?,
            use_texture: program.uniform_location(gl, "useTexture")?,
            sampler: program.uniform_location(gl, "textureImage")?,
            position: program.attribute_location(gl, "position")?,
            color: program.attribute_location(gl, "color")?,
            tex_coord: program.attribute_location(gl, "texCoord")?,
        })
    }

    /// Activates the program, applies the culling side and uploads the model-view and
    /// projection matrices.
    fn begin(
        &self,
        gl: &mut dyn GraphicsContext,
        side: Side,
        transform: &Transform,
        camera: &dyn Camera,
    ) {
        gl.use_program(self.program);
        gl.set_cull_side(side);

        let model_view: Mat4 = camera.view_matrix() * transform.world_matrix();
        model_view.set_uniform(gl, self.model_view);
        camera.projection_matrix().set_uniform(gl, self.projection);
    }

    fn bind_positions(&self, gl: &mut dyn GraphicsContext, mesh: &GpuMesh) {
        bind_attribute(gl, self.position, mesh.positions, 3);
    }

    fn bind_colors(&self, gl: &mut dyn GraphicsContext, mesh: &GpuMesh) {
        bind_attribute(gl, self.color, mesh.colors, 4);
    }

    /// Binds the texture and its coordinates, or switches texturing off and disables the
    /// texture coordinate slot.
    fn bind_texture(
        &self,
        gl: &mut dyn GraphicsContext,
        texture: Option<&Texture>,
        mesh: &GpuMesh,
    ) {
        match texture {
            Some(texture) => {
                1i32.set_uniform(gl, self.use_texture);
                texture.bind(gl);
                (texture.unit() as i32).set_uniform(gl, self.sampler);
                bind_attribute(gl, self.tex_coord, mesh.tex_coords, 2);
            }
            None => {
                0i32.set_uniform(gl, self.use_texture);
                if let Some(slot) = self.tex_coord {
                    gl.disable_vertex_attrib_array(slot);
                }
            }
        }
    }
}

/// Points `slot` at `buffer` and enables it. Does nothing for an absent slot.
fn bind_attribute(
    gl: &mut dyn GraphicsContext,
    slot: Option<AttributeSlot>,
    buffer: BufferId,
    components: i32,
) {
    if let Some(slot) = slot {
        gl.bind_vertex_buffer(buffer);
        gl.vertex_attrib_pointer_f32(slot, components);
        gl.enable_vertex_attrib_array(slot);
    }
}

fn draw_indexed(gl: &mut dyn GraphicsContext, mesh: &GpuMesh) {
    gl.bind_index_buffer(mesh.indices);
    gl.draw_triangles((mesh.triangle_count() * 3) as i32);
}

/// Whether a draw has nothing to do.
fn skip_draw(visible: bool, mesh: &GpuMesh) -> bool {
    !visible || mesh.triangle_count() == 0
}
